// file: src/error.rs
// version: 1.0.0
// guid: 3f1c9a52-7d4e-4b8a-9e21-6c0d5a7b8e14

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, XiToolError>;

/// Error types for the database tool
#[derive(Error, Debug)]
pub enum XiToolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Command '{command}' failed (exit code {exit_code:?}): {stderr}")]
    ProcessError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Fixture error: {0}")]
    FixtureError(String),

    #[error("Git error: {0}")]
    GitError(String),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("MySQL error: {0}")]
    MySqlError(#[from] mysql::Error),
}

impl XiToolError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a new database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create a new fixture error
    pub fn fixture(msg: impl Into<String>) -> Self {
        Self::FixtureError(msg.into())
    }

    /// Create a new git error
    pub fn git(msg: impl Into<String>) -> Self {
        Self::GitError(msg.into())
    }

    /// True when the server rejected the configured credentials
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::MySqlError(mysql::Error::MySqlError(e)) if e.code == 1045
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XiToolError::validation("missing --yes");
        assert_eq!(err.to_string(), "Validation error: missing --yes");

        let err = XiToolError::ProcessError {
            command: "mysqladmin".to_string(),
            exit_code: Some(1),
            stderr: "boom".to_string(),
        };
        assert!(err.to_string().contains("mysqladmin"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: XiToolError = io.into();
        assert!(matches!(err, XiToolError::IoError(_)));
        assert!(!err.is_access_denied());
    }
}
