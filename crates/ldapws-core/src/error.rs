//! Error types
//!
//! One error enum for everything that talks to the directory, classified so
//! callers can tell run-fatal failures from per-item rejections.

use thiserror::Error;

/// LDAP result codes this crate reacts to (RFC 4511, appendix A).
pub mod result_code {
    pub const SUCCESS: u32 = 0;
    pub const NO_SUCH_ATTRIBUTE: u32 = 16;
    pub const CONSTRAINT_VIOLATION: u32 = 19;
    pub const ATTRIBUTE_OR_VALUE_EXISTS: u32 = 20;
    pub const NO_SUCH_OBJECT: u32 = 32;
    pub const INVALID_CREDENTIALS: u32 = 49;
    pub const INSUFFICIENT_ACCESS_RIGHTS: u32 = 50;
    pub const ALREADY_EXISTS: u32 = 68;
}

/// Result alias used across the workspace.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error that can occur while reading from or writing to the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connectivity (fatal for a run)
    /// Failed to reach or bind to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The bind credentials were refused.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    // Configuration (fatal for a run)
    /// Configuration is missing or inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// More than one active endpoint is configured.
    #[error(
        "expected exactly one active LDAP endpoint but {count} are configured; \
         refusing to reconcile against an arbitrary one"
    )]
    MultipleEndpoints { count: usize },

    /// No active endpoint is configured.
    #[error("no active LDAP endpoint configured")]
    NoEndpoint,

    /// The group's association mode cannot express the requested write.
    #[error("cannot {operation} when {mode} is used as membership relation")]
    UnsupportedAssociation { mode: String, operation: String },

    // Resolution
    /// A user or group could not be resolved to a directory entry.
    #[error("{kind} not found in directory: {identifier}")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },

    // Per-item directory errors
    /// The server answered with a non-success result code.
    #[error("directory rejected operation on {dn}: code {rc} ({text})")]
    Rejected { dn: String, rc: u32, text: String },

    /// The request could not be sent or its response could not be read.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A rejection with a message meant for the end user.
    #[error("{message}")]
    Hint { message: String, hint: String },

    // Upstream data
    /// The local administrator roster could not be read.
    #[error("roster unavailable: {message}")]
    Roster {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Settings could not be loaded or stored.
    #[error("settings error: {message}")]
    Settings {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DirectoryError {
    /// Whether this error must abort a whole run rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DirectoryError::ConnectionFailed { .. }
                | DirectoryError::AuthenticationFailed
                | DirectoryError::InvalidConfiguration { .. }
                | DirectoryError::MultipleEndpoints { .. }
                | DirectoryError::NoEndpoint
                | DirectoryError::Roster { .. }
                | DirectoryError::Settings { .. }
        )
    }

    /// LDAP result code carried by a rejection, if any.
    pub fn result_code(&self) -> Option<u32> {
        match self {
            DirectoryError::Rejected { rc, .. } => Some(*rc),
            _ => None,
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::AuthenticationFailed => "AUTH_FAILED",
            DirectoryError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            DirectoryError::MultipleEndpoints { .. } => "MULTIPLE_ENDPOINTS",
            DirectoryError::NoEndpoint => "NO_ENDPOINT",
            DirectoryError::UnsupportedAssociation { .. } => "UNSUPPORTED_ASSOCIATION",
            DirectoryError::NotFound { .. } => "NOT_FOUND",
            DirectoryError::Rejected { .. } => "REJECTED",
            DirectoryError::OperationFailed { .. } => "OPERATION_FAILED",
            DirectoryError::Hint { .. } => "HINT",
            DirectoryError::Roster { .. } => "ROSTER_UNAVAILABLE",
            DirectoryError::Settings { .. } => "SETTINGS_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        DirectoryError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a rejection error from an LDAP result.
    pub fn rejected(dn: impl Into<String>, rc: u32, text: impl Into<String>) -> Self {
        DirectoryError::Rejected {
            dn: dn.into(),
            rc,
            text: text.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(kind: &'static str, identifier: impl Into<String>) -> Self {
        DirectoryError::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }

    /// Create a hint error carrying a user-facing message.
    pub fn hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        DirectoryError::Hint {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create a roster error with source.
    pub fn roster_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::Roster {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a settings error with source.
    pub fn settings_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::Settings {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
