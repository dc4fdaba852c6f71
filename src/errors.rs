use thiserror::Error;

/// Error type for the fallible edges of the crate (files, settings, CLI input).
///
/// The occurrence engine itself never fails: malformed subscription data
/// degrades to "no occurrences" or a zero amount instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
