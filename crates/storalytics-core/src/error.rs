//! Error types for dashboard, auth and upload operations.

use storalytics_api_models::Level;
use thiserror::Error;

/// Failure to obtain or decode leveled dashboard data.
///
/// Always recoverable: the navigation state is left untouched so the same
/// request can be retried.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Transport or server failure.
    #[error("failed to load dashboard data: {message}")]
    FetchFailed {
        /// Detail reported by the transport.
        message: String,
    },
    /// Response body was not a dashboard document.
    #[error("dashboard response is not valid JSON")]
    Malformed {
        /// Parser error.
        source: serde_json::Error,
    },
    /// A record did not match the shape of the echoed level.
    #[error("dashboard record does not match level '{level}'")]
    Decode {
        /// Level the records were decoded for.
        level: Level,
        /// Decoder error.
        source: serde_json::Error,
    },
}

impl DashboardError {
    /// Build a transport failure from any displayable error.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    /// Message shown next to the retry affordance.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } | Self::Malformed { .. } | Self::Decode { .. } => {
                "Failed to load dashboard data"
            }
        }
    }
}

/// Login failure surfaced inline on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username or password left blank.
    #[error("Username and password required")]
    MissingCredentials,
    /// Backend rejected the credentials or was unreachable.
    #[error("{message}")]
    Rejected {
        /// Message for the user.
        message: String,
    },
}

/// Upload failure surfaced inline on the upload panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Submit pressed with no file chosen.
    #[error("Please select a file first")]
    NoFileSelected,
    /// File extension is not `.xlsx` or `.csv`.
    #[error("Unsupported file type '{name}'; choose an Excel (.xlsx) or CSV file")]
    UnsupportedFileType {
        /// Rejected file name.
        name: String,
    },
    /// Account may not upload.
    #[error("Permission denied")]
    NotStaff,
    /// Backend rejected the import or was unreachable.
    #[error("{message}")]
    Rejected {
        /// Message for the user.
        message: String,
    },
}
