//! Dashboard session: navigation, fetch bookkeeping and view derivation.
//!
//! # Design
//! - The session performs no IO. Each navigation action hands back a
//!   [`FetchRequest`]; the transport executes it and reports the outcome
//!   through [`DashboardSession::apply`].
//! - Only the most recently issued [`RequestToken`] is authoritative. Results
//!   for older tokens are dropped, so a slow response can never overwrite a
//!   newer one.
//! - The committed [`NavState`] only moves on success. A failed fetch leaves
//!   it untouched and [`DashboardSession::retry`] reissues the same filter.

use std::fmt;

use serde::Serialize;
use storalytics_api_models::Level;
use tracing::{debug, warn};

use crate::aggregate::{Summary, SummaryCells, summarize_for_display, summary_cells};
use crate::chart::{BarChart, DonutChart, build_bar, build_donut};
use crate::error::DashboardError;
use crate::levels::{DrillTarget, descriptor};
use crate::navigation::{Filter, NavState};
use crate::payload::{DashboardPayload, breadcrumb_text};
use crate::table::{DataTable, build_table};
use crate::units::DisplayUnit;

/// Identifier of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `/dashboard/` fetch for the transport to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    /// Token to hand back to [`DashboardSession::apply`].
    pub token: RequestToken,
    /// Query filter.
    pub filter: Filter,
}

/// Whether an applied result was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result belonged to the latest request and updated the session.
    Applied,
    /// A newer request superseded this one; the result was discarded.
    Stale,
}

/// Fetch lifecycle of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Ready,
    /// The latest request failed.
    Failed {
        /// Message for the retry prompt.
        message: String,
    },
}

impl Status {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Failure message, if the latest request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Everything a renderer needs for one dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Level of the data on screen.
    pub level: Level,
    /// Display unit of every magnitude.
    pub unit: DisplayUnit,
    /// Totals in the display unit.
    pub summary: Summary,
    /// Formatted totals.
    pub summary_cells: SummaryCells,
    /// Utilization donut.
    pub donut: DonutChart,
    /// Top-tenant bars; only at the pools level.
    pub bar: Option<BarChart>,
    /// Data table.
    pub table: DataTable,
    /// Breadcrumb line.
    pub breadcrumb: String,
    /// Whether a back transition exists.
    pub can_go_back: bool,
}

/// Drill-down dashboard state shared by the web UI and the CLI explorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSession {
    nav: NavState,
    unit: DisplayUnit,
    status: Status,
    payload: Option<DashboardPayload>,
    issued: u64,
    in_flight: Option<FetchRequest>,
}

impl DashboardSession {
    /// New session at the pools level in `unit`.
    #[must_use]
    pub fn new(unit: DisplayUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    /// Committed navigation state.
    #[must_use]
    pub const fn nav(&self) -> &NavState {
        &self.nav
    }

    /// Display unit.
    #[must_use]
    pub const fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Fetch status.
    #[must_use]
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// Last successfully applied payload.
    #[must_use]
    pub const fn payload(&self) -> Option<&DashboardPayload> {
        self.payload.as_ref()
    }

    /// Latest issued request, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&FetchRequest> {
        self.in_flight.as_ref()
    }

    fn issue(&mut self, filter: Filter) -> FetchRequest {
        self.issued += 1;
        let request = FetchRequest {
            token: RequestToken(self.issued),
            filter,
        };
        debug!(token = %request.token, filter = ?request.filter, "dashboard fetch issued");
        self.status = Status::Loading;
        self.in_flight = Some(request.clone());
        request
    }

    /// Initial fetch for the committed filter.
    pub fn start(&mut self) -> FetchRequest {
        self.issue(self.nav.filter.clone())
    }

    /// Jump straight to `filter`, e.g. a deep link or CLI arguments.
    pub fn open(&mut self, filter: Filter) -> FetchRequest {
        self.issue(filter)
    }

    /// Drill into a selection.
    pub fn drill_down(&mut self, target: &DrillTarget) -> FetchRequest {
        let next = self.nav.drill_down(target);
        self.issue(next.filter)
    }

    /// Drill into the row at `index` of the current table.
    ///
    /// Returns `None` when no payload is loaded, the index is out of range,
    /// or the level has nothing below it. Unnamed rows drill by their
    /// displayed name.
    pub fn drill_row(&mut self, index: usize) -> Option<FetchRequest> {
        let payload = self.payload.as_ref()?;
        let kind = descriptor(payload.records.level()).drill?;
        let row = payload.records.rows().into_iter().nth(index)?;
        Some(self.drill_down(&DrillTarget::new(kind, row.display_name())))
    }

    /// Step back one level; `None` at the top level.
    pub fn back(&mut self) -> Option<FetchRequest> {
        let previous = self.nav.back()?;
        Some(self.issue(previous.filter))
    }

    /// Refetch the committed filter.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue(self.nav.refresh().filter)
    }

    /// Reissue the latest request's filter under a new token.
    pub fn retry(&mut self) -> FetchRequest {
        let filter = self
            .in_flight
            .as_ref()
            .map_or_else(|| self.nav.filter.clone(), |request| request.filter.clone());
        self.issue(filter)
    }

    /// Change the display unit. No fetch is needed.
    pub const fn set_unit(&mut self, unit: DisplayUnit) {
        self.unit = unit;
    }

    /// Drop navigation and data, e.g. on sign-out. Keeps the unit and
    /// invalidates every outstanding token.
    pub fn reset(&mut self) {
        self.nav = NavState::default();
        self.status = Status::Idle;
        self.payload = None;
        self.in_flight = None;
    }

    /// Apply a fetch result.
    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<DashboardPayload, DashboardError>,
    ) -> ApplyOutcome {
        let Some(request) = self.in_flight.as_ref().filter(|request| request.token == token) else {
            debug!(token = %token, "discarding stale dashboard response");
            return ApplyOutcome::Stale;
        };
        match result {
            Ok(payload) => {
                let implied = request.filter.implied_level();
                if payload.level != implied {
                    warn!(
                        token = %token,
                        level = %payload.level,
                        implied = %implied,
                        "server level differs from the filter depth; using the server level"
                    );
                }
                self.nav = NavState {
                    level: payload.level,
                    filter: request.filter.clone(),
                };
                self.payload = Some(payload);
                self.status = Status::Ready;
                debug!(token = %token, level = %self.nav.level, "dashboard payload applied");
            }
            Err(err) => {
                warn!(token = %token, error = %err, "dashboard fetch failed");
                self.status = Status::Failed {
                    message: err.user_message().to_string(),
                };
            }
        }
        ApplyOutcome::Applied
    }

    /// Derive the view for the current payload and unit.
    #[must_use]
    pub fn view(&self) -> Option<DashboardView> {
        let payload = self.payload.as_ref()?;
        let level = payload.level;
        let rows = payload.records.rows();
        let summary = summarize_for_display(level, &rows, self.unit);
        Some(DashboardView {
            level,
            unit: self.unit,
            summary,
            summary_cells: summary_cells(&summary, self.unit),
            donut: build_donut(level, &rows, self.unit),
            bar: (level == Level::Pools).then(|| build_bar(&payload.top_tenants, self.unit)),
            table: build_table(level, &rows, self.unit, payload.breadcrumb.as_ref()),
            breadcrumb: breadcrumb_text(level, payload.breadcrumb.as_ref()),
            can_go_back: self.nav.can_go_back(),
        })
    }
}
