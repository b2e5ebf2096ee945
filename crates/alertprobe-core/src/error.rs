//! Error types for AlertProbe

use thiserror::Error;

/// Result type alias using AlertProbe's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for AlertProbe operations
///
/// A call that returns any of these leaves its result set undefined; it is
/// never equivalent to an empty page.
#[derive(Error, Debug)]
pub enum Error {
    /// Connectivity, timeout or authentication failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Fault reported by the alert service
    #[error("Backend error (status {status}, code {code}): {message}")]
    Backend {
        /// HTTP status of the response
        status: u16,
        /// Service-level result code, if one was returned
        code: String,
        /// Diagnostic payload from the service
        message: String,
    },

    /// A successful response whose body could not be understood
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request rejected locally before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a backend error
    pub fn backend(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for connectivity and authentication failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True when the service itself reported the fault
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Stable short name of the variant, for reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Backend { .. } => "backend",
            Self::Decode(_) => "decode",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
