//! Decoding of level-shaped `/dashboard/` responses.

use storalytics_api_models::{Breadcrumb, DashboardResponse, Level, TopTenant};

use crate::error::DashboardError;
use crate::levels::LevelRecords;

/// A decoded dashboard response. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPayload {
    /// Level echoed by the server (`pools` when absent).
    pub level: Level,
    /// Records for `level`.
    pub records: LevelRecords,
    /// Top tenants by utilization; only meaningful at the pools level.
    pub top_tenants: Vec<TopTenant>,
    /// Server-echoed selection trail.
    pub breadcrumb: Option<Breadcrumb>,
}

impl DashboardPayload {
    /// Decode a raw response into level-typed records.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Decode`] when a `data` entry does not match
    /// the record shape of the echoed level.
    pub fn from_response(response: DashboardResponse) -> Result<Self, DashboardError> {
        let level = response.level.unwrap_or_default();
        let records = match level {
            Level::Pools => LevelRecords::Pools(response.pools.unwrap_or_default()),
            Level::ChildPools => LevelRecords::ChildPools(decode_data(level, response.data)?),
            Level::Tenants => LevelRecords::Tenants(decode_data(level, response.data)?),
            Level::Volumes => LevelRecords::Volumes(decode_data(level, response.data)?),
        };
        Ok(Self {
            level,
            records,
            top_tenants: response.top_tenants.unwrap_or_default(),
            breadcrumb: response.breadcrumb,
        })
    }

    /// Parse and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Malformed`] when the body is not a dashboard
    /// document, or [`DashboardError::Decode`] as for [`Self::from_response`].
    pub fn from_json(body: &str) -> Result<Self, DashboardError> {
        let response: DashboardResponse =
            serde_json::from_str(body).map_err(|source| DashboardError::Malformed { source })?;
        Self::from_response(response)
    }
}

fn decode_data<T>(level: Level, data: Option<Vec<serde_json::Value>>) -> Result<Vec<T>, DashboardError>
where
    T: serde::de::DeserializeOwned,
{
    data.unwrap_or_default()
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|source| DashboardError::Decode { level, source })
        })
        .collect()
}

/// Render the breadcrumb trail shown above the dashboard.
///
/// Produces `Level: {level}` followed by `| Pool: ...` and `> ...` segments for
/// whichever selections the server echoed.
#[must_use]
pub fn breadcrumb_text(level: Level, breadcrumb: Option<&Breadcrumb>) -> String {
    let mut text = format!("Level: {level}");
    if let Some(crumb) = breadcrumb {
        text.push_str(" | Pool: ");
        text.push_str(crumb.pool.as_deref().unwrap_or_default());
        if let Some(child_pool) = &crumb.child_pool {
            text.push_str(" > ");
            text.push_str(child_pool);
        }
        if let Some(tenant) = &crumb.tenant {
            text.push_str(" > ");
            text.push_str(tenant);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_level_defaults_to_pools() -> Result<(), DashboardError> {
        let payload = DashboardPayload::from_json(r#"{"pools": [{"pool": "A"}]}"#)?;
        assert_eq!(payload.level, Level::Pools);
        assert_eq!(payload.records.len(), 1);
        assert!(payload.top_tenants.is_empty());
        Ok(())
    }

    #[test]
    fn deeper_levels_decode_data_by_level() -> Result<(), DashboardError> {
        let payload = DashboardPayload::from_json(
            &json!({
                "level": "tenants",
                "data": [{"name": "acme", "allocated_gb": 10.0, "utilized_gb": 4.0}],
                "breadcrumb": {"pool": "P1", "child_pool": "C1"}
            })
            .to_string(),
        )?;
        assert_eq!(payload.records.level(), Level::Tenants);
        assert_eq!(payload.records.rows()[0].display_name(), "acme");
        Ok(())
    }

    #[test]
    fn missing_collection_is_empty() -> Result<(), DashboardError> {
        let payload = DashboardPayload::from_json(r#"{"level": "volumes"}"#)?;
        assert!(payload.records.is_empty());
        assert_eq!(payload.records.level(), Level::Volumes);
        Ok(())
    }

    #[test]
    fn mismatched_record_shape_is_a_decode_error() {
        let result = DashboardPayload::from_json(
            &json!({"level": "child_pools", "data": [{"child_pool": 42}]}).to_string(),
        );
        assert!(matches!(
            result,
            Err(DashboardError::Decode {
                level: Level::ChildPools,
                ..
            })
        ));
        assert!(matches!(
            DashboardPayload::from_json("not json"),
            Err(DashboardError::Malformed { .. })
        ));
    }

    #[test]
    fn breadcrumb_lists_present_segments() {
        let crumb = Breadcrumb {
            pool: Some("P1".into()),
            child_pool: Some("C1".into()),
            tenant: None,
        };
        assert_eq!(
            breadcrumb_text(Level::Tenants, Some(&crumb)),
            "Level: tenants | Pool: P1 > C1"
        );
        assert_eq!(breadcrumb_text(Level::Pools, None), "Level: pools");
    }
}
