use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvelopeError>;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported envelope format: {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },
}
