//! Error types for the call report pipeline.

use thiserror::Error;

/// Mail delivery failures.
#[derive(Debug, Error)]
pub enum MailError {
    /// Missing or unusable configuration; no network call was attempted
    #[error("mail configuration error: {0}")]
    Config(String),

    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    /// Network, TLS or protocol failure reported by the transport
    #[error("mail transport error: {0}")]
    Transport(String),

    /// The provider answered but refused the message
    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl MailError {
    /// Whether the failure happened before any network activity.
    pub fn is_config(&self) -> bool {
        matches!(self, MailError::Config(_))
    }
}

/// Failures of a single translation request.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("translation response contained no text")]
    MissingTranslation,
}

/// Report template failure.
#[derive(Debug, Error)]
#[error("report render failed: {0}")]
pub struct RenderError(#[from] pub handlebars::RenderError);

/// Failures of the background webhook pipeline. Only ever logged.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
