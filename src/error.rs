use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the backend cannot be reached at all.
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the server. Make sure the backend is running.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Chat failed: {0}")]
    Chat(String),

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::Config(s) => Self::Config(s.clone()),
            Self::Server { status, message } => Self::Server {
                status: *status,
                message: message.clone(),
            },
            Self::Transport(s) => Self::Transport(s.clone()),
            Self::MalformedResponse { status, reason } => Self::MalformedResponse {
                status: *status,
                reason: reason.clone(),
            },
            Self::InvalidTransition { current, requested } => Self::InvalidTransition {
                current: current.clone(),
                requested: requested.clone(),
            },
            Self::Chat(s) => Self::Chat(s.clone()),
            Self::Url(e) => Self::Url(*e),
            Self::Internal(s) => Self::Internal(s.clone()),
            // For errors that can't be cloned, convert to string representation
            Self::Yaml(e) => Self::Internal(format!("YAML error: {}", e)),
            Self::Io(e) => Self::Internal(format!("IO error: {}", e)),
        }
    }
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Generic message for a failed status when the body carries no usable detail.
    pub fn status_fallback(status: u16) -> String {
        format!("Server error: {}", status)
    }

    /// The single line a chat front end shows for this failure.
    ///
    /// Server errors surface the backend's `detail` (or the status fallback),
    /// transport errors collapse to [`CONNECTIVITY_MESSAGE`], and a success
    /// status with an unreadable body is reported like a server error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            Self::MalformedResponse { status, .. } => Self::status_fallback(*status),
            Self::Chat(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
