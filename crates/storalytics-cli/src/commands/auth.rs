use anyhow::anyhow;
use storalytics_api_models::{ErrorBody, LoginRequest, LoginResponse, SessionInfo};
use storalytics_core::{Session, auth};
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::output::render_session_info;

pub(crate) async fn handle_login(ctx: &AppContext, request: &LoginRequest) -> CliResult<Session> {
    let url = ctx.endpoint("login/")?;
    let response = ctx
        .client
        .post(url)
        .json(request)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("{}: {err}", auth::LOGIN_FAILED_MESSAGE)))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read login response: {err}")))?;

    if !status.is_success() {
        let err = auth::login_failure(serde_json::from_slice::<ErrorBody>(&bytes).ok());
        return Err(CliError::validation(err.to_string()));
    }

    let body = serde_json::from_slice::<LoginResponse>(&bytes).unwrap_or_default();
    let session = auth::login_outcome(request, body)
        .map_err(|err| CliError::validation(err.to_string()))?;
    debug!(username = %session.username, staff = session.is_staff, "logged in");
    Ok(session)
}

/// Fire-and-forget logout; failures are logged and otherwise ignored.
pub(crate) async fn handle_logout(ctx: &AppContext) {
    let url = match ctx.endpoint("logout/") {
        Ok(url) => url,
        Err(err) => {
            warn!(error = %err, "skipping logout");
            return;
        }
    };
    match ctx.client.post(url).send().await {
        Ok(response) if response.status().is_success() => debug!("logged out"),
        Ok(response) => warn!(status = %response.status(), "logout rejected"),
        Err(err) => warn!(error = %err, "logout request failed"),
    }
}

pub(crate) async fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let url = ctx.endpoint("check-auth/")?;
    let response = ctx
        .client
        .get(url)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to /check-auth/ failed: {err}")))?;

    if response.status().is_success() {
        let info = response
            .json::<SessionInfo>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse session info: {err}")))?;
        render_session_info(&info, format)
    } else {
        Err(classify_problem(response).await)
    }
}
