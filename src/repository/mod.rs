use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

/// Source of "latest version" answers for artifacts that were declared without one.
pub trait RepositoryClient {
    fn fetch_latest_version(&self, coordinate: &Coordinate) -> Result<Option<String>>;
}
