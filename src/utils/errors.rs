//! Error handling for the VIP transfer client
//!
//! This module defines the main error types used throughout the client
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Fallback message when the backend rejects a request without one
pub const DEFAULT_BACKEND_MESSAGE: &str = "An error occurred";

/// Main error type for the VIP transfer client
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A submission is already in progress")]
    SubmitInProgress,
}

/// Client-side form validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Reset token is missing")]
    MissingToken,
}

impl ValidationError {
    /// Translation key for this failure within a page scope (e.g. "drivers")
    pub fn message_key(&self, scope: &str) -> String {
        match self {
            ValidationError::Required { .. } => "forms.required".to_string(),
            ValidationError::PasswordMismatch => format!("{}.passwordMismatch", scope),
            ValidationError::PasswordTooShort { .. } => format!("{}.passwordLength", scope),
            ValidationError::MissingToken => "reset.invalidToken".to_string(),
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, TransferError>;

impl TransferError {
    /// Build an API error from an HTTP status and optional backend message
    pub fn api(status: u16, message: Option<String>) -> Self {
        TransferError::Api {
            status,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_MESSAGE.to_string()),
        }
    }

    /// Message the backend attached to a rejected request, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            TransferError::Api { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the backend answered 401
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransferError::Api { status: 401, .. })
    }

    /// Check if the error is recoverable by trying again later
    pub fn is_recoverable(&self) -> bool {
        match self {
            TransferError::Api { status, .. } => *status >= 500 || *status == 429,
            TransferError::Http(_) => true,
            TransferError::Serialization(_) => false,
            TransferError::Io(_) => true,
            TransferError::UrlParse(_) => false,
            TransferError::Config(_) => false,
            TransferError::Validation(_) => true,
            TransferError::Authentication(_) => false,
            TransferError::UnknownStatus(_) => false,
            TransferError::InvalidStateTransition { .. } => false,
            TransferError::NotFound(_) => false,
            TransferError::SubmitInProgress => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TransferError::Config(_) => ErrorSeverity::Critical,
            TransferError::UrlParse(_) => ErrorSeverity::Critical,
            TransferError::Authentication(_) => ErrorSeverity::Warning,
            TransferError::Api { status: 401 | 403, .. } => ErrorSeverity::Warning,
            TransferError::Validation(_) => ErrorSeverity::Info,
            TransferError::SubmitInProgress => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
