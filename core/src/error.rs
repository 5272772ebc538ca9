//! Core error types and utilities

use thiserror::Error;

/// Core-specific error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// An argument list could not be turned into an exec argument vector
    #[error("Argument error: {0}")]
    ArgumentParse(String),

    /// Malformed flag/positional combination in a wait request
    #[error("Usage error: {0}")]
    Usage(String),

    /// A failing OS call; the message carries the OS-provided error text
    #[error("OS error: {0}")]
    Os(String),

    /// A requested wait option has no equivalent on the current platform
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// A signal number outside the known signal table
    #[error("Unknown signal number: {0}")]
    UnknownSignal(i32),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ArgumentParse(_) => "FORK001",
            CoreError::Usage(_) => "FORK002",
            CoreError::Os(_) => "FORK003",
            CoreError::UnsupportedOption(_) => "FORK004",
            CoreError::UnknownSignal(_) => "FORK005",
            CoreError::Configuration(_) => "FORK006",
            CoreError::Io(_) => "FORK007",
        }
    }
}

/// Core-specific result type
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CoreError::ArgumentParse("x".to_string()).code(), "FORK001");
        assert_eq!(CoreError::Usage("x".to_string()).code(), "FORK002");
        assert_eq!(CoreError::Os("x".to_string()).code(), "FORK003");
        assert_eq!(
            CoreError::UnsupportedOption("x".to_string()).code(),
            "FORK004"
        );
        assert_eq!(CoreError::UnknownSignal(99).code(), "FORK005");
        assert_eq!(CoreError::Configuration("x".to_string()).code(), "FORK006");
    }

    #[test]
    fn test_error_display() {
        let error = CoreError::Usage("pid or process group must be greater than zero".to_string());
        assert_eq!(
            error.to_string(),
            "Usage error: pid or process group must be greater than zero"
        );

        let error = CoreError::UnknownSignal(4096);
        assert_eq!(error.to_string(), "Unknown signal number: 4096");
    }
}
