//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Reducers are plain functions over the store so they can be tested
//!   without a DOM.

use storalytics_core::{
    DashboardSession, DisplayUnit, Session, UploadError, UploadReport, UploadSelection,
};
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Sign-in state.
    pub auth: AuthSlice,
    /// Drill-down session backing the dashboard page.
    pub dashboard: DashboardSession,
    /// Admin upload panel.
    pub upload: UploadSlice,
}

/// Where the app is in the sign-in flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// Restoring a session via `/check-auth/`.
    #[default]
    Checking,
    /// Login form is shown.
    SignedOut,
    /// Dashboard is shown.
    SignedIn(Session),
}

/// Sign-in state and login form feedback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSlice {
    /// Current phase.
    pub phase: AuthPhase,
    /// Login request in flight.
    pub busy: bool,
    /// Message under the login form.
    pub error: Option<String>,
}

impl AuthSlice {
    /// Signed-in account, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match &self.phase {
            AuthPhase::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Feedback shown under the upload form.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadNotice {
    /// Import accepted.
    Success(UploadReport),
    /// Validation or backend failure.
    Error(String),
}

/// Upload panel state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadSlice {
    /// Chosen file, already validated.
    pub selection: Option<UploadSelection>,
    /// Upload in flight.
    pub busy: bool,
    /// Outcome of the last action.
    pub notice: Option<UploadNotice>,
}

/// Restore the preferred unit on boot.
pub fn init_unit(store: &mut AppStore, unit: DisplayUnit) {
    store.dashboard.set_unit(unit);
}

/// Commit a signed-in session and clear stale page state.
pub fn sign_in(store: &mut AppStore, session: Session) {
    store.auth = AuthSlice {
        phase: AuthPhase::SignedIn(session),
        busy: false,
        error: None,
    };
    store.dashboard.reset();
    store.upload = UploadSlice::default();
}

/// Return to the login form, optionally with a message.
pub fn sign_out(store: &mut AppStore, error: Option<String>) {
    store.auth = AuthSlice {
        phase: AuthPhase::SignedOut,
        busy: false,
        error,
    };
    store.dashboard.reset();
    store.upload = UploadSlice::default();
}

/// Record the user's file choice.
pub fn choose_file(store: &mut AppStore, choice: Result<UploadSelection, UploadError>) {
    match choice {
        Ok(selection) => {
            store.upload.selection = Some(selection);
            store.upload.notice = None;
        }
        Err(err) => {
            store.upload.selection = None;
            store.upload.notice = Some(UploadNotice::Error(err.to_string()));
        }
    }
}

/// Record an upload result. Success clears the selection; failure keeps it.
pub fn finish_upload(store: &mut AppStore, result: Result<UploadReport, UploadError>) {
    store.upload.busy = false;
    match result {
        Ok(report) => {
            store.upload.selection = None;
            store.upload.notice = Some(UploadNotice::Success(report));
        }
        Err(err) => {
            store.upload.notice = Some(UploadNotice::Error(err.to_string()));
        }
    }
}
