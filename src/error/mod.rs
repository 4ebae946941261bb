//! Error handling for the speed monitor

use thiserror::Error;

/// Custom error types for the speed monitor
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied input violates a field constraint
    #[error("Validation error: {field} {message}")]
    Validation { field: String, message: String },

    /// No measurement has been recorded yet
    #[error("No data: {0}")]
    NoData(String),

    /// A requested row does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (numbers, timestamps, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error for the named field
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new empty-store error
    pub fn no_data<S: Into<String>>(message: S) -> Self {
        Self::NoData(message.into())
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new server error
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation { .. } => "VALIDATION",
            Self::NoData(_) => "NO_DATA",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Server(_) => "SERVER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Name of the offending field for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True for the empty-store condition, which callers render rather than report
    pub fn is_expected_empty(&self) -> bool {
        matches!(self, Self::NoData(_))
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation { .. } | Self::Parse(_) => 1,
            Self::Server(_) => 2,
            Self::NoData(_) => 3,
            Self::NotFound(_) => 4,
            Self::Storage(_) | Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation { .. } | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::NoData(_) | Self::NotFound(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Storage(_) | Self::Io(_) | Self::Server(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::storage(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(error: chrono::ParseError) -> Self {
        Self::parse(format!("Timestamp parse error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::internal(format!("Background task failed: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| with_prefix(e.into(), &f()))
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.map_err(|e| with_prefix(e.into(), message))
    }
}

/// Prepend context to the message while keeping the error kind
fn with_prefix(error: AppError, prefix: &str) -> AppError {
    match error {
        AppError::Config(msg) => AppError::Config(format!("{}: {}", prefix, msg)),
        AppError::Validation { field, message } => AppError::Validation {
            field,
            message: format!("{} ({})", message, prefix),
        },
        AppError::NoData(msg) => AppError::NoData(format!("{}: {}", prefix, msg)),
        AppError::NotFound(msg) => AppError::NotFound(format!("{}: {}", prefix, msg)),
        AppError::Storage(msg) => AppError::Storage(format!("{}: {}", prefix, msg)),
        AppError::Io(msg) => AppError::Io(format!("{}: {}", prefix, msg)),
        AppError::Parse(msg) => AppError::Parse(format!("{}: {}", prefix, msg)),
        AppError::Server(msg) => AppError::Server(format!("{}: {}", prefix, msg)),
        AppError::Internal(msg) => AppError::Internal(format!("{}: {}", prefix, msg)),
    }
}
