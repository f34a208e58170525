use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("TOML parsing failed: {0}")]
    TomlParsing(String),

    #[error("Remote lookup failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
