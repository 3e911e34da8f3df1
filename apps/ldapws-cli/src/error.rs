//! CLI error types and exit codes

use ldapws_core::error::DirectoryError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (directory, configuration, I/O)
/// - 4: Validation error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Operation refused: {0}")]
    Refused(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 4,
            CliError::Directory(_)
            | CliError::Config(_)
            | CliError::Refused(_)
            | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr as a single line
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_directory_error() {
        let err = CliError::from(DirectoryError::MultipleEndpoints { count: 2 });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_validation_error() {
        assert_eq!(CliError::Validation("test".to_string()).exit_code(), 4);
    }

    #[test]
    fn test_exit_code_config_error() {
        assert_eq!(CliError::Config("test".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_directory_message_is_single_line() {
        let err = CliError::from(DirectoryError::MultipleEndpoints { count: 3 });
        let message = err.to_string();
        assert!(!message.contains('\n'));
        assert!(message.contains("3 are configured"));
    }

    #[test]
    fn test_io_conversion() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
