//! Content-safety gate

/// A guard may veto any response before it reaches the user. Async because
/// real guards are model calls.
#[async_trait::async_trait]
pub trait SafetyGuard: Send + Sync {
    async fn is_safe(&self, response: &str) -> bool;
}

/// Always-pass guard. Stands in until a real classifier is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughGuard;

#[async_trait::async_trait]
impl SafetyGuard for PassthroughGuard {
    async fn is_safe(&self, _response: &str) -> bool {
        true
    }
}
