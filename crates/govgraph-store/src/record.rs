//! Record and parameter value model for store queries

use serde_json::Value;
use std::collections::BTreeMap;

/// One row of a query result: field name → value.
///
/// Transient — owned by the call that produced it, never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A field as a plain string: string values unquoted, everything else
    /// in its JSON rendering, nulls and absent fields as `None`.
    pub fn get_string(&self, field: &str) -> Option<String> {
        match self.0.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(stringify(v)),
        }
    }

    /// All field values stringified, in field order.
    pub fn stringified_values(&self) -> impl Iterator<Item = String> + '_ {
        self.0.values().map(stringify)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Stringify a field value the way answers are built from it: strings
/// verbatim, everything else in JSON form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A scalar query parameter. The only shapes accepted at the tool-call
/// seam — structured values are rejected there, never evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Convert a JSON value, rejecting arrays, objects and nulls.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Caller-supplied parameter set for a template execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parse a JSON object into a parameter set. Any field whose value is
    /// not a scalar is an error naming the offending field.
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Result<Self, String> {
        let mut params = Params::new();
        for (name, value) in object {
            match ParamValue::from_json(value) {
                Some(scalar) => params.insert(name.clone(), scalar),
                None => {
                    return Err(format!(
                        "parameter '{}' must be a string, number or boolean",
                        name
                    ))
                }
            }
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_unquotes_strings() {
        assert_eq!(stringify(&json!("Child Benefit")), "Child Benefit");
        assert_eq!(stringify(&json!(16)), "16");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(null)), "null");
    }

    #[test]
    fn params_accept_scalars_only() {
        let object = json!({"topic": "eligibility", "age": 16, "weekly": true})
            .as_object()
            .cloned()
            .unwrap();
        let params = Params::from_json_object(&object).unwrap();
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn params_reject_structured_values() {
        let object = json!({"filters": {"nested": true}})
            .as_object()
            .cloned()
            .unwrap();
        let err = Params::from_json_object(&object).unwrap_err();
        assert!(err.contains("filters"));

        let object = json!({"topics": ["a", "b"]}).as_object().cloned().unwrap();
        assert!(Params::from_json_object(&object).is_err());

        let object = json!({"topic": null}).as_object().cloned().unwrap();
        assert!(Params::from_json_object(&object).is_err());
    }

    #[test]
    fn record_string_access() {
        let record: Record = [
            ("description".to_string(), json!("A weekly payment")),
            ("amount".to_string(), json!(25.6)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            record.get_string("description").as_deref(),
            Some("A weekly payment")
        );
        assert_eq!(record.get_string("amount").as_deref(), Some("25.6"));
        assert_eq!(record.get_string("missing"), None);
    }
}
