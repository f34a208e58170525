pub mod latest_version;
pub mod project_scanner;
pub mod reference_embedder;

pub use latest_version::LatestVersionAgent;
pub use project_scanner::ProjectScannerAgent;
pub use reference_embedder::ReferenceEmbedder;
