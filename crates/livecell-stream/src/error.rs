use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors carried by streams and reported by stream handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("stream failed: {message}")]
    Failed { message: String },

    #[error("stream already terminated")]
    Terminated,

    #[error("stream receiver disconnected")]
    Disconnected,
}

impl StreamError {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
