use thiserror::Error;

/// Every way a repository fetch can fail.
///
/// `Validation` is produced locally before any request is made. `Transport`,
/// `Decode`, `Canceled` and `TimedOut` come from the connection itself, and
/// `Api` carries a non-2xx response from the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Transport(String),

    #[error("github api error: {status}: {message}")]
    Api { status: String, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("request canceled")]
    Canceled,

    #[error("request timeout")]
    TimedOut,
}

impl FetchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FetchError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FetchError::Validation(_))
    }

    /// Message shown to the user once a load has failed.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Canceled => "request canceled".to_string(),
            FetchError::TimedOut => "request timeout".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
