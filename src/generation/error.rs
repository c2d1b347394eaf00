use thiserror::Error;

/// Failures of a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured; nothing was sent.
    #[error("OpenAI API key not configured")]
    MissingApiKey,

    /// The API answered with a non-success status.
    #[error("API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GenerationError {
    /// HTTP status of an API error.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
