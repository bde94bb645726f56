#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Drill-down aggregation and view-model derivation for Storalytics.
//!
//! The crate is free of IO and DOM dependencies so the same logic drives the
//! Yew dashboard and the CLI explorer. A [`DashboardSession`] hands out
//! [`FetchRequest`]s, the caller performs the HTTP exchange, and decoded
//! [`DashboardPayload`]s flow back in to produce a [`DashboardView`].

pub mod aggregate;
pub mod auth;
pub mod chart;
pub mod error;
pub mod format;
pub mod levels;
pub mod navigation;
pub mod payload;
pub mod session;
pub mod table;
pub mod units;
pub mod upload;

pub use aggregate::{Summary, SummaryCells, summarize, summary_cells};
pub use auth::Session;
pub use chart::{BarChart, DonutChart, build_bar, build_donut};
pub use error::{AuthError, DashboardError, UploadError};
pub use format::{format_amount, format_amount_str, format_percent};
pub use levels::{CapacityRow, DrillKind, DrillTarget, LevelRecords, descriptor};
pub use navigation::{Filter, NavState};
pub use payload::{DashboardPayload, breadcrumb_text};
pub use session::{ApplyOutcome, DashboardSession, DashboardView, FetchRequest, RequestToken, Status};
pub use storalytics_api_models::Level;
pub use table::{DataTable, build_table};
pub use units::{DisplayUnit, UnitParseError, convert};
pub use upload::{UploadReport, UploadSelection};
