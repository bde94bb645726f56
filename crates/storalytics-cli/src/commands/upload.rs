use std::path::Path;

use anyhow::anyhow;
use reqwest::multipart::{Form, Part};
use storalytics_api_models::{ErrorBody, UploadResponse};
use storalytics_core::upload::{FILE_FIELD, upload_failure};
use storalytics_core::{Session, UploadError, UploadReport, UploadSelection};
use tracing::info;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_upload_report;

/// Check permissions and the file type before touching the file contents.
fn select_file(session: &Session, file: &Path, size: u64) -> CliResult<UploadSelection> {
    if !session.is_staff {
        return Err(CliError::validation(UploadError::NotStaff.to_string()));
    }
    let name = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::validation(UploadError::NoFileSelected.to_string()))?;
    UploadSelection::new(name, size).map_err(|err| CliError::validation(err.to_string()))
}

/// `POST /import/` with the file as multipart field `file`.
pub(crate) async fn send_upload(
    ctx: &AppContext,
    selection: &UploadSelection,
    contents: Vec<u8>,
) -> CliResult<UploadReport> {
    let url = ctx.endpoint("import/")?;
    let part = Part::bytes(contents).file_name(selection.name.clone());
    let form = Form::new().part(FILE_FIELD, part);

    let response = ctx
        .client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("{}: {err}", upload_failure(None))))?;

    let status = response.status();
    if !status.is_success() {
        let bytes = response.bytes().await.unwrap_or_default();
        let err = upload_failure(serde_json::from_slice::<ErrorBody>(&bytes).ok());
        return Err(if status.is_client_error() {
            CliError::validation(err.to_string())
        } else {
            CliError::failure(anyhow!("{err} (status {status})"))
        });
    }

    let body = response.json::<UploadResponse>().await.unwrap_or_default();
    let report = UploadReport::from(body);
    info!(file = %selection.label(), rows = ?report.rows, "upload accepted");
    Ok(report)
}

pub(crate) async fn handle_upload(
    ctx: &AppContext,
    session: &Session,
    file: &Path,
    format: OutputFormat,
) -> CliResult<()> {
    let metadata = tokio::fs::metadata(file).await.map_err(|err| {
        CliError::validation(format!("cannot read '{}': {err}", file.display()))
    })?;
    let selection = select_file(session, file, metadata.len())?;
    let contents = tokio::fs::read(file)
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read '{}': {err}", file.display())))?;
    let report = send_upload(ctx, &selection, contents).await?;
    render_upload_report(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;
    use uuid::Uuid;

    fn context(server: &MockServer) -> Result<AppContext> {
        Ok(AppContext {
            client: Client::new(),
            base_url: server.url("/api").parse()?,
        })
    }

    fn staff() -> Session {
        Session {
            username: "admin".into(),
            is_staff: true,
        }
    }

    #[test]
    fn viewers_cannot_upload() {
        let viewer = Session {
            username: "viewer".into(),
            is_staff: false,
        };
        let err = select_file(&viewer, Path::new("export.xlsx"), 1);
        assert!(matches!(err, Err(CliError::Validation(message)) if message == "Permission denied"));
    }

    #[test]
    fn unsupported_extensions_are_rejected_before_upload() {
        let err = select_file(&staff(), Path::new("/tmp/report.pdf"), 1);
        assert!(matches!(err, Err(CliError::Validation(message)) if message.contains("report.pdf")));
        let ok = select_file(&staff(), Path::new("/tmp/Export.CSV"), 2048);
        assert_eq!(ok.map(|selection| selection.label()).ok(), Some("Export.CSV (2.00 KB)".into()));
    }

    #[tokio::test]
    async fn upload_posts_multipart_and_reports_totals() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/import/")
                .body_includes("name=\"file\"")
                .body_includes("filename=\"export.csv\"")
                .body_includes("pool,child_pool");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "message": "Imported",
                    "rows": 42,
                    "database_total_gb": 1234.5
                }));
        });

        let path = std::env::temp_dir().join(format!("{}-export.csv", Uuid::new_v4()));
        tokio::fs::write(&path, "pool,child_pool\nP1,C1\n").await?;
        let metadata = tokio::fs::metadata(&path).await?;
        let selection = UploadSelection::new("export.csv", metadata.len())?;
        let contents = tokio::fs::read(&path).await?;
        let report = send_upload(&context(&server)?, &selection, contents).await;
        tokio::fs::remove_file(&path).await?;

        let report = report.map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(report.message, "Imported");
        assert_eq!(
            report.details(),
            vec!["Rows imported: 42".to_string(), "Database total: 1,234.50 GB".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn backend_rejection_is_shown_verbatim() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/import/");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({"error": "Missing column: pool"}));
        });

        let selection = UploadSelection::new("export.xlsx", 3)?;
        let Err(err) = send_upload(&context(&server)?, &selection, vec![1, 2, 3]).await else {
            panic!("upload must fail");
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Missing column: pool");
        Ok(())
    }

    #[tokio::test]
    async fn empty_failure_bodies_fall_back_to_generic_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/import/");
            then.status(500);
        });

        let selection = UploadSelection::new("export.xlsx", 3)?;
        let Err(err) = send_upload(&context(&server)?, &selection, vec![1, 2, 3]).await else {
            panic!("upload must fail");
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("Upload failed. Please try again."));
        Ok(())
    }
}
