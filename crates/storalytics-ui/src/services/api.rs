//! HTTP client helpers (REST, cookie session).

use crate::logic::preferences::{dashboard_path, endpoint};
use gloo_net::http::{Request, Response};
use storalytics_api_models::{ErrorBody, LoginRequest, LoginResponse, SessionInfo, UploadResponse};
use storalytics_core::auth::{LOGIN_FAILED_MESSAGE, login_failure, login_outcome, restore};
use storalytics_core::upload::{FILE_FIELD, upload_failure};
use storalytics_core::{
    AuthError, DashboardError, DashboardPayload, Filter, Session, UploadError, UploadReport,
};
use web_sys::{File, FormData, RequestCredentials};

/// Client for the dashboard API; the session cookie rides on every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    async fn error_body(response: Response) -> Option<ErrorBody> {
        response.json::<ErrorBody>().await.ok()
    }

    pub(crate) async fn login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        let failed = |_| AuthError::Rejected {
            message: LOGIN_FAILED_MESSAGE.to_string(),
        };
        let response = Request::post(&self.url("login/"))
            .credentials(RequestCredentials::Include)
            .json(request)
            .map_err(failed)?
            .send()
            .await
            .map_err(failed)?;
        if !response.ok() {
            return Err(login_failure(Self::error_body(response).await));
        }
        let body = response.json::<LoginResponse>().await.unwrap_or_default();
        login_outcome(request, body)
    }

    pub(crate) async fn logout(&self) -> Result<(), gloo_net::Error> {
        Request::post(&self.url("logout/"))
            .credentials(RequestCredentials::Include)
            .send()
            .await?;
        Ok(())
    }

    pub(crate) async fn check_auth(&self) -> Option<Session> {
        let response = Request::get(&self.url("check-auth/"))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .ok()?;
        if !response.ok() {
            return None;
        }
        restore(response.json::<SessionInfo>().await.ok()?)
    }

    pub(crate) async fn fetch_dashboard(
        &self,
        filter: &Filter,
    ) -> Result<DashboardPayload, DashboardError> {
        let response = Request::get(&self.url(&dashboard_path(filter)))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|err| DashboardError::fetch(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DashboardError::fetch(err.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(DashboardError::fetch(format!("status {status}: {body}")));
        }
        DashboardPayload::from_json(&body)
    }

    pub(crate) async fn upload(&self, file: &File) -> Result<UploadReport, UploadError> {
        let form = FormData::new().map_err(|_| upload_failure(None))?;
        form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())
            .map_err(|_| upload_failure(None))?;
        let response = Request::post(&self.url("import/"))
            .credentials(RequestCredentials::Include)
            .body(form)
            .send()
            .await
            .map_err(|_| upload_failure(None))?;
        if !response.ok() {
            return Err(upload_failure(Self::error_body(response).await));
        }
        let body = response.json::<UploadResponse>().await.unwrap_or_default();
        Ok(UploadReport::from(body))
    }
}
