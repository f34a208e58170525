pub mod extractor;
pub mod patterns;
pub mod resolver;

pub use extractor::{Extraction, ScriptExtractor};
pub use patterns::Patterns;
pub use resolver::resolve_versions;
