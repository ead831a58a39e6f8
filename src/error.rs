// Error types for the Dribbble feed client.
// Distinguishes invalid input, transport failures, HTTP rejections, and parse errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DribbbleError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Transport error ({code}): {message}")]
    Transport { code: u32, message: String },

    #[error("Dribbble API responded with HTTP {0}")]
    Http(u16),

    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("{message}")]
    Settings {
        code: &'static str,
        message: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

impl DribbbleError {
    /// Whether the failure happened before any request was attempted.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DribbbleError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, DribbbleError>;
