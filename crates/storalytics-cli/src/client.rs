//! Shared client utilities, error types, and the dashboard backend.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use storalytics_api_models::ErrorBody;
use storalytics_core::{DashboardError, DashboardPayload, Filter};
use tracing::debug;
use url::Url;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Dependencies constructed from CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
}

impl CliDependencies {
    /// Construct an HTTP client with a cookie jar for the session cookie.
    pub(crate) fn new(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
}

impl AppContext {
    /// Resolve an endpoint path (e.g. `login/`) under the API base URL.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        joined
            .parse()
            .map_err(|err| CliError::failure(anyhow!("invalid endpoint URL '{joined}': {err}")))
    }

    /// `GET /dashboard/` for a filter and decode the level-shaped response.
    pub(crate) async fn fetch_dashboard(
        &self,
        filter: &Filter,
    ) -> Result<DashboardPayload, DashboardError> {
        let mut url = self
            .endpoint("dashboard/")
            .map_err(|err| DashboardError::fetch(err.display_message()))?;
        {
            let pairs = filter.query_pairs();
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in pairs {
                    query.append_pair(key, value);
                }
            }
        }
        debug!(url = %url, "fetching dashboard");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DashboardError::fetch(format!("request to /dashboard/ failed: {err}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DashboardError::fetch(format!("failed to read dashboard body: {err}")))?;
        if !status.is_success() {
            let message = error_message(body.as_bytes()).unwrap_or_else(|| body.trim().to_string());
            return Err(DashboardError::fetch(format!("{message} (status {status})")));
        }
        DashboardPayload::from_json(&body)
    }
}

/// Source of dashboard payloads for the explorer.
#[async_trait]
pub(crate) trait DashboardBackend: Send + Sync {
    /// Fetch and decode the dashboard for a filter.
    async fn fetch(&self, filter: &Filter) -> Result<DashboardPayload, DashboardError>;
}

#[async_trait]
impl DashboardBackend for AppContext {
    async fn fetch(&self, filter: &Filter) -> Result<DashboardPayload, DashboardError> {
        self.fetch_dashboard(filter).await
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Extract the `{"error": "..."}` message from a response body, if present.
pub(crate) fn error_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

/// Classify an HTTP response into a CLI error.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let message = error_message(&bytes)
        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());

    if matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::UNPROCESSABLE_ENTITY
    ) && !message.is_empty()
    {
        CliError::validation(message)
    } else if !message.is_empty() {
        CliError::failure(anyhow!("{message} (status {status})"))
    } else {
        CliError::failure(anyhow!("request failed with status {status}"))
    }
}
