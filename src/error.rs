use reqwest::StatusCode;

/// Failure to parse or traverse a field path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty field path")]
    Empty,
    #[error("invalid field path {path:?}: {reason}")]
    Syntax { path: String, reason: &'static str },
    #[error("no container at {at} (expected {expected})")]
    Missing { at: String, expected: &'static str },
    #[error("index {index} out of range at {at} (len {len})")]
    OutOfRange { at: String, index: usize, len: usize },
}

/// Failure crossing the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error: {status}")]
    Status {
        status: StatusCode,
        /// Human readable message carried by the error body, if any.
        message: Option<String>,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl TransportError {
    /// Server supplied message, if the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// A collection operation failed; `banner` is the text shown to the user.
#[derive(Debug, thiserror::Error)]
#[error("{banner}")]
pub struct SyncError {
    pub banner: String,
    #[source]
    pub source: TransportError,
}

impl SyncError {
    /// Surface the server's message, falling back to `generic`.
    pub(crate) fn surface(source: TransportError, generic: String) -> Self {
        let banner = source.server_message().map(str::to_string).unwrap_or(generic);
        Self { banner, source }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("no form is open")]
    NotOpen,
    #[error("a form is already open")]
    AlreadyOpen,
    #[error("a submission is already in flight")]
    Submitting,
    #[error("{0} is required")]
    MissingRequired(String),
    #[error("record has no identifier")]
    MissingId,
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}
