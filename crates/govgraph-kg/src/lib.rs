//! govgraph-kg — template registry, relationship completion, rendering
//!
//! The knowledge-graph layer between the store and the agent: named query
//! templates resolved at answer time, the fetch-and-complete pipeline that
//! feeds the visualization, and the HTML renderer glue.

pub mod builder;
pub mod fulltext;
pub mod registry;
pub mod render;

pub use builder::{parse_completion, GraphBuilder};
pub use fulltext::{ensure_fulltext_indexes, fulltext_query, sanitize_lucene};
pub use registry::{RegistryError, TemplateRegistry};
pub use render::render_html;
