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
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Storalytics backend API.
//!
//! These types are re-used by the CLI and the web UI for request/response
//! encoding so both surfaces agree on the wire contract. Every numeric and
//! name field on a capacity record is optional: the backend omits values it
//! cannot compute and consumers apply documented defaults.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Message returned by `/login/` when the credentials were accepted.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Drill-down depth of a dashboard response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Top level: one record per storage pool.
    #[default]
    Pools,
    /// Child pools inside a selected pool.
    ChildPools,
    /// Tenants inside a selected child pool.
    Tenants,
    /// Volumes owned by a selected tenant (leaf level).
    Volumes,
}

impl Level {
    /// All levels in drill-down order.
    pub const ALL: [Self; 4] = [Self::Pools, Self::ChildPools, Self::Tenants, Self::Volumes];

    /// Wire representation of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pools => "pools",
            Self::ChildPools => "child_pools",
            Self::Tenants => "tenants",
            Self::Volumes => "volumes",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated capacity of one storage pool (`level = pools`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoolRecord {
    /// Pool name.
    #[serde(default)]
    pub pool: Option<String>,
    /// Allocated capacity in TB.
    #[serde(default)]
    pub allocated_tb: Option<f64>,
    /// Utilized capacity in TB.
    #[serde(default)]
    pub utilized_tb: Option<f64>,
    /// Remaining capacity in TB.
    #[serde(default)]
    pub left_tb: Option<f64>,
    /// Utilization ratio in `[0, 1]`.
    #[serde(default)]
    pub avg_util: Option<f64>,
    /// Number of volumes rolled into the pool, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_count: Option<u64>,
}

/// Aggregated capacity of one child pool (`level = child_pools`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChildPoolRecord {
    /// Child pool name.
    #[serde(default)]
    pub child_pool: Option<String>,
    /// Allocated capacity in TB.
    #[serde(default)]
    pub allocated_tb: Option<f64>,
    /// Utilized capacity in TB.
    #[serde(default)]
    pub utilized_tb: Option<f64>,
    /// Remaining capacity in TB.
    #[serde(default)]
    pub left_tb: Option<f64>,
    /// Utilization ratio in `[0, 1]`.
    #[serde(default)]
    pub avg_util: Option<f64>,
    /// Number of volumes rolled into the child pool, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_count: Option<u64>,
}

/// Aggregated capacity of one tenant (`level = tenants`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TenantRecord {
    /// Tenant name (volume name prefix).
    #[serde(default)]
    pub name: Option<String>,
    /// Allocated capacity in GB.
    #[serde(default)]
    pub allocated_gb: Option<f64>,
    /// Utilized capacity in GB.
    #[serde(default)]
    pub utilized_gb: Option<f64>,
    /// Remaining capacity in GB.
    #[serde(default)]
    pub left_gb: Option<f64>,
    /// Utilization ratio in `[0, 1]`.
    #[serde(default)]
    pub avg_utilization: Option<f64>,
    /// Number of volumes owned by the tenant, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_count: Option<u64>,
}

/// A single volume (`level = volumes`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VolumeRecord {
    /// Volume name.
    #[serde(default)]
    pub volume: Option<String>,
    /// Storage system hosting the volume.
    #[serde(default)]
    pub system: Option<String>,
    /// Provisioned size in GB.
    #[serde(default)]
    pub volume_size_gb: Option<f64>,
    /// Utilized capacity in GB.
    #[serde(default)]
    pub utilized_gb: Option<f64>,
    /// Remaining capacity in GB.
    #[serde(default)]
    pub left_gb: Option<f64>,
    /// Share of the volume written by the host, in `[0, 1]`.
    #[serde(default)]
    pub written_by_host_percent: Option<f64>,
}

/// Entry of the top-tenant ranking returned alongside the pools level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopTenant {
    /// Tenant name.
    #[serde(default)]
    pub name: Option<String>,
    /// Utilized capacity in GB.
    #[serde(default)]
    pub utilized_gb: Option<f64>,
}

/// Server-echoed trail of the active drill-down selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Selected pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    /// Selected child pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_pool: Option<String>,
    /// Selected tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

/// Raw `/dashboard/` response body.
///
/// `pools` is populated at the top level; every other level carries its
/// records in `data`, whose element shape depends on `level`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardResponse {
    /// Level echoed by the server; absent means `pools`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Pool records (`level = pools`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolRecord>>,
    /// Level-shaped records for the deeper levels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<serde_json::Value>>,
    /// Top tenants by utilization (`level = pools`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_tenants: Option<Vec<TopTenant>>,
    /// Active selection trail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<Breadcrumb>,
}

/// Error body returned by the backend on validation or runtime failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub error: Option<String>,
}

/// Credentials submitted to `/login/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Response body of `/login/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Outcome message; equals [`LOGIN_SUCCESS_MESSAGE`] on success.
    #[serde(default)]
    pub message: Option<String>,
    /// Authenticated account name.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the account may upload data.
    #[serde(default)]
    pub is_staff: bool,
}

impl LoginResponse {
    /// Whether the response signals an accepted login.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.message.as_deref() == Some(LOGIN_SUCCESS_MESSAGE)
    }
}

/// Response body of `/check-auth/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionInfo {
    /// Whether the session cookie maps to a signed-in account.
    #[serde(default)]
    pub authenticated: bool,
    /// Signed-in account name.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the account may upload data.
    #[serde(default)]
    pub is_staff: bool,
}

/// Response body of `/logout/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutResponse {
    /// Outcome message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Import report returned by `/import/` after a successful upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    /// Outcome message.
    #[serde(default)]
    pub message: Option<String>,
    /// Rows inserted.
    #[serde(default)]
    pub rows: Option<u64>,
    /// Total provisioned size in the uploaded sheet before filtering, in GB.
    #[serde(default)]
    pub initial_total_gb: Option<f64>,
    /// Total provisioned size after dropping invalid rows, in GB.
    #[serde(default)]
    pub filtered_total_gb: Option<f64>,
    /// Total provisioned size persisted by the backend, in GB.
    #[serde(default)]
    pub database_total_gb: Option<f64>,
    /// Rows dropped because of negative sizes.
    #[serde(default)]
    pub rows_removed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_round_trips_snake_case() -> serde_json::Result<()> {
        let level: Level = serde_json::from_value(json!("child_pools"))?;
        assert_eq!(level, Level::ChildPools);
        assert_eq!(serde_json::to_value(Level::Volumes)?, json!("volumes"));
        Ok(())
    }

    #[test]
    fn level_order_follows_drill_depth() {
        assert!(Level::Pools < Level::ChildPools);
        assert!(Level::Tenants < Level::Volumes);
        assert_eq!(Level::ALL.first(), Some(&Level::Pools));
        assert_eq!(Level::ALL.last(), Some(&Level::Volumes));
    }

    #[test]
    fn records_tolerate_missing_fields() -> serde_json::Result<()> {
        let pool: PoolRecord = serde_json::from_value(json!({"pool": "A", "extra": 1}))?;
        assert_eq!(pool.pool.as_deref(), Some("A"));
        assert!(pool.allocated_tb.is_none());

        let volume: VolumeRecord = serde_json::from_value(json!({}))?;
        assert_eq!(volume, VolumeRecord::default());
        Ok(())
    }

    #[test]
    fn dashboard_response_parses_pools_level() -> serde_json::Result<()> {
        let response: DashboardResponse = serde_json::from_value(json!({
            "level": "pools",
            "pools": [{"pool": "A", "allocated_tb": 100.0, "utilized_tb": 40.0}],
            "top_tenants": [{"name": "acme", "utilized_gb": 1200.0}]
        }))?;
        assert_eq!(response.level, Some(Level::Pools));
        assert_eq!(response.pools.map(|pools| pools.len()), Some(1));
        assert!(response.data.is_none());
        assert!(response.breadcrumb.is_none());
        Ok(())
    }

    #[test]
    fn login_success_requires_exact_message() {
        let ok = LoginResponse {
            message: Some("Login successful".to_string()),
            username: Some("admin".to_string()),
            is_staff: true,
        };
        assert!(ok.is_success());
        let other = LoginResponse {
            message: Some("Welcome".to_string()),
            ..LoginResponse::default()
        };
        assert!(!other.is_success());
        assert!(!LoginResponse::default().is_success());
    }
}
