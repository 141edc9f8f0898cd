// Common helpers
pub mod query;

pub use query::{encode_component, encode_query};
