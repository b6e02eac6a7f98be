use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Job-level failures. Every variant carries a message that the service
/// surfaces hand back verbatim in the `error_message` field.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or malformed. Raised before any image
    /// is loaded or any backend is called.
    #[error("{0}")]
    Validation(String),

    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Error from a model backend: unreachable service, non-success
    /// status, or an error envelope in the response body.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("Unknown task_type: {0}")]
    UnknownTask(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
