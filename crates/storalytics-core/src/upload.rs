//! Upload validation and import reports.

use serde::Serialize;
use storalytics_api_models::{ErrorBody, UploadResponse};

use crate::error::UploadError;
use crate::format::format_amount;

/// Accepted file extensions (lowercase, without the dot).
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "csv"];
/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";
/// Fallback success message.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload successful! Data has been imported.";
/// Fallback failure message.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSelection {
    /// File name as chosen by the user.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl UploadSelection {
    /// Validate a chosen file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedFileType`] unless the name ends in an
    /// accepted extension (case-insensitive).
    pub fn new(name: impl Into<String>, size: u64) -> Result<Self, UploadError> {
        let name = name.into();
        let accepted = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ACCEPTED_EXTENSIONS.iter().any(|ok| ext.eq_ignore_ascii_case(ok)));
        if !accepted {
            return Err(UploadError::UnsupportedFileType { name });
        }
        Ok(Self { name, size })
    }

    /// `"{name} ({size} KB)"` with the size in KiB to two decimals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn label(&self) -> String {
        format!("{} ({:.2} KB)", self.name, self.size as f64 / 1024.0)
    }
}

/// Require a selection before submitting.
///
/// # Errors
///
/// Returns [`UploadError::NoFileSelected`] when nothing is chosen.
pub fn require_selection(selection: Option<&UploadSelection>) -> Result<&UploadSelection, UploadError> {
    selection.ok_or(UploadError::NoFileSelected)
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    /// Message for the user.
    pub message: String,
    /// Rows inserted.
    pub rows: Option<u64>,
    /// Rows dropped by the backend.
    pub rows_removed: Option<u64>,
    /// Sheet total before filtering, in GB.
    pub initial_total_gb: Option<f64>,
    /// Sheet total after filtering, in GB.
    pub filtered_total_gb: Option<f64>,
    /// Persisted total, in GB.
    pub database_total_gb: Option<f64>,
}

impl From<UploadResponse> for UploadReport {
    fn from(response: UploadResponse) -> Self {
        Self {
            message: response
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UPLOAD_SUCCESS_MESSAGE.to_string()),
            rows: response.rows,
            rows_removed: response.rows_removed,
            initial_total_gb: response.initial_total_gb,
            filtered_total_gb: response.filtered_total_gb,
            database_total_gb: response.database_total_gb,
        }
    }
}

impl UploadReport {
    /// Detail lines for the reported totals, skipping absent values.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(rows) = self.rows {
            lines.push(format!("Rows imported: {rows}"));
        }
        if let Some(removed) = self.rows_removed {
            lines.push(format!("Rows removed: {removed}"));
        }
        for (label, value) in [
            ("Initial total", self.initial_total_gb),
            ("Filtered total", self.filtered_total_gb),
            ("Database total", self.database_total_gb),
        ] {
            if let Some(value) = value {
                lines.push(format!("{label}: {} GB", format_amount(value)));
            }
        }
        lines
    }
}

/// Error for a failed `/import/` request, preferring the backend's message.
#[must_use]
pub fn upload_failure(body: Option<ErrorBody>) -> UploadError {
    UploadError::Rejected {
        message: body
            .and_then(|body| body.error)
            .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spreadsheets_are_accepted() {
        assert!(UploadSelection::new("export.XLSX", 10).is_ok());
        assert!(UploadSelection::new("export.csv", 10).is_ok());
        assert_eq!(
            UploadSelection::new("export.pdf", 10),
            Err(UploadError::UnsupportedFileType {
                name: "export.pdf".into()
            })
        );
        assert!(UploadSelection::new("csv", 10).is_err());
        assert_eq!(require_selection(None), Err(UploadError::NoFileSelected));
        assert_eq!(
            UploadError::NoFileSelected.to_string(),
            "Please select a file first"
        );
    }

    #[test]
    fn label_reports_kibibytes() -> Result<(), UploadError> {
        let selection = UploadSelection::new("data.csv", 2_560)?;
        assert_eq!(selection.label(), "data.csv (2.50 KB)");
        Ok(())
    }

    #[test]
    fn report_falls_back_to_the_default_message() {
        let report = UploadReport::from(UploadResponse {
            rows: Some(42),
            database_total_gb: Some(1_234.5),
            ..UploadResponse::default()
        });
        assert_eq!(report.message, UPLOAD_SUCCESS_MESSAGE);
        assert_eq!(
            report.details(),
            vec!["Rows imported: 42", "Database total: 1,234.50 GB"]
        );
        assert_eq!(upload_failure(None).to_string(), UPLOAD_FAILED_MESSAGE);
    }
}
