//! Login validation and outcome interpretation.

use serde::Serialize;
use storalytics_api_models::{ErrorBody, LoginRequest, LoginResponse, SessionInfo};

use crate::error::AuthError;

/// Shown when the backend answers without the success message.
pub const LOGIN_REJECTED_MESSAGE: &str = "Login failed. Please check your credentials.";
/// Shown when the request failed without an error body.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Account name.
    pub username: String,
    /// Whether the account may upload data.
    pub is_staff: bool,
}

impl Session {
    /// Role label used in status lines.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        if self.is_staff { "staff" } else { "viewer" }
    }
}

/// Validate form input into a login request.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] when either field is blank.
pub fn credentials(username: &str, password: &str) -> Result<LoginRequest, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Interpret a successful HTTP exchange with `/login/`.
///
/// # Errors
///
/// Returns [`AuthError::Rejected`] when the body does not carry the success
/// message.
pub fn login_outcome(request: &LoginRequest, response: LoginResponse) -> Result<Session, AuthError> {
    if !response.is_success() {
        return Err(AuthError::Rejected {
            message: LOGIN_REJECTED_MESSAGE.to_string(),
        });
    }
    Ok(Session {
        username: response
            .username
            .unwrap_or_else(|| request.username.clone()),
        is_staff: response.is_staff,
    })
}

/// Error for a failed `/login/` request, preferring the backend's message.
#[must_use]
pub fn login_failure(body: Option<ErrorBody>) -> AuthError {
    AuthError::Rejected {
        message: body
            .and_then(|body| body.error)
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
    }
}

/// Session restored from `/check-auth/`, if the cookie is still valid.
#[must_use]
pub fn restore(info: SessionInfo) -> Option<Session> {
    if !info.authenticated {
        return None;
    }
    Some(Session {
        username: info.username.unwrap_or_default(),
        is_staff: info.is_staff,
    })
}
