//! Extractors that reject with the standard JSON error body.

pub mod id_path;
pub mod query;
pub mod validated_json;

pub use id_path::IdPath;
pub use query::RequiredQuery;
pub use validated_json::ValidatedJson;
