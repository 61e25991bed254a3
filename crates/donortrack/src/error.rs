//! Error types for donortrack.
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! show the underlying message once and abandon the operation.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for donortrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// No donor exists with the given id.
    #[error("donor {0} not found")]
    DonorNotFound(i64),

    /// No donation exists with the given id.
    #[error("donation {0} not found")]
    DonationNotFound(i64),

    /// The operation needs a loaded donor and none is loaded.
    #[error("no donor is loaded")]
    NoDonorLoaded,

    /// An amount cannot be represented in whole cents.
    #[error("amount {amount} cannot be stored in cents")]
    InvalidAmount {
        /// The offending amount, as entered.
        amount: String,
    },

    /// Input rejected before it reached the store.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The form field that failed.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for donortrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for a form field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this error means a record lookup came back empty.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DonorNotFound(_) | Self::DonationNotFound(_))
    }

    /// Check if this error was raised by client-side validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::DonorNotFound(7).to_string(), "donor 7 not found");
        assert_eq!(
            Error::DonationNotFound(3).to_string(),
            "donation 3 not found"
        );
        assert_eq!(Error::NoDonorLoaded.to_string(), "no donor is loaded");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::DonorNotFound(1).is_not_found());
        assert!(Error::DonationNotFound(1).is_not_found());
        assert!(!Error::NoDonorLoaded.is_not_found());
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("email", "not a valid email address");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "invalid email: not a valid email address"
        );
    }

    #[test]
    fn test_invalid_amount_display() {
        let err = Error::InvalidAmount {
            amount: "1e40".to_string(),
        };
        assert!(err.to_string().contains("1e40"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden/letters"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden/letters"));
    }
}
