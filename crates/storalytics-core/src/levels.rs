//! Per-level field mapping and record normalisation.
//!
//! # Design
//! - Each drill-down level is described once by a [`LevelDescriptor`].
//! - Level-shaped wire records are normalised into [`CapacityRow`] so the
//!   aggregation, chart and table builders share a single code path.
//! - Missing values are defaulted here and nowhere else:
//!   numerics to [`NUMERIC_DEFAULT`], names to [`UNKNOWN_NAME`] at display time.

use serde::{Deserialize, Serialize};
use storalytics_api_models::{ChildPoolRecord, Level, PoolRecord, TenantRecord, VolumeRecord};

use crate::units::DisplayUnit;

/// Value used for any missing numeric field.
pub const NUMERIC_DEFAULT: f64 = 0.0;
/// Label used for any missing name field.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Filter key a drill-down click applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    /// Select a pool (resets deeper selections).
    Pool,
    /// Select a child pool within the current pool.
    ChildPool,
    /// Select a tenant within the current child pool.
    Tenant,
}

impl DrillKind {
    /// Wire name of the filter key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pool => "pool",
            Self::ChildPool => "child_pool",
            Self::Tenant => "tenant",
        }
    }

    /// Parse a filter key name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pool" => Some(Self::Pool),
            "child_pool" => Some(Self::ChildPool),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }
}

/// A drill-down request: which filter key to set and to what.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillTarget {
    /// Filter key.
    #[serde(rename = "type")]
    pub kind: DrillKind,
    /// Filter value (the row's natural key).
    pub value: String,
}

impl DrillTarget {
    /// Build a drill target.
    #[must_use]
    pub fn new(kind: DrillKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Static description of how one level's records map onto shared concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDescriptor {
    /// Level described.
    pub level: Level,
    /// Unit the backend reports magnitudes in for this level.
    pub native_unit: DisplayUnit,
    /// Table key of the name column.
    pub name_key: &'static str,
    /// Header text of the name column.
    pub name_header: &'static str,
    /// Whether a `system` column follows the name column.
    pub has_system: bool,
    /// Table key of the utilization ratio column.
    pub ratio_key: &'static str,
    /// Filter key applied when a row is clicked; `None` at the leaf level.
    pub drill: Option<DrillKind>,
    /// Singular entity label used in chart titles ("Pool", "Tenant", ...).
    pub entity: &'static str,
}

static POOLS: LevelDescriptor = LevelDescriptor {
    level: Level::Pools,
    native_unit: DisplayUnit::Tb,
    name_key: "pool",
    name_header: "Pool",
    has_system: false,
    ratio_key: "avg_util",
    drill: Some(DrillKind::Pool),
    entity: "Pool",
};

static CHILD_POOLS: LevelDescriptor = LevelDescriptor {
    level: Level::ChildPools,
    native_unit: DisplayUnit::Tb,
    name_key: "child_pool",
    name_header: "Child Pool",
    has_system: false,
    ratio_key: "avg_util",
    drill: Some(DrillKind::ChildPool),
    entity: "Child Pool",
};

static TENANTS: LevelDescriptor = LevelDescriptor {
    level: Level::Tenants,
    native_unit: DisplayUnit::Gb,
    name_key: "name",
    name_header: "Tenant",
    has_system: false,
    ratio_key: "avg_utilization",
    drill: Some(DrillKind::Tenant),
    entity: "Tenant",
};

static VOLUMES: LevelDescriptor = LevelDescriptor {
    level: Level::Volumes,
    native_unit: DisplayUnit::Gb,
    name_key: "volume",
    name_header: "Volume",
    has_system: true,
    ratio_key: "avg_utilization",
    drill: None,
    entity: "Volume",
};

/// Look up the descriptor for a level.
#[must_use]
pub fn descriptor(level: Level) -> &'static LevelDescriptor {
    match level {
        Level::Pools => &POOLS,
        Level::ChildPools => &CHILD_POOLS,
        Level::Tenants => &TENANTS,
        Level::Volumes => &VOLUMES,
    }
}

/// Level-independent view of one record, in the level's native unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRow {
    /// Natural key of the record, when reported.
    pub name: Option<String>,
    /// Hosting system (volumes only).
    pub system: Option<String>,
    /// Allocated capacity.
    pub allocated: f64,
    /// Utilized capacity.
    pub utilized: f64,
    /// Remaining capacity.
    pub left: f64,
    /// Utilization ratio in `[0, 1]`.
    pub ratio: f64,
}

impl CapacityRow {
    /// Display name, defaulting to [`UNKNOWN_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Display system, defaulting to [`UNKNOWN_NAME`].
    #[must_use]
    pub fn display_system(&self) -> &str {
        self.system.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

fn number(value: Option<f64>) -> f64 {
    value.unwrap_or(NUMERIC_DEFAULT)
}

impl From<&PoolRecord> for CapacityRow {
    fn from(record: &PoolRecord) -> Self {
        Self {
            name: record.pool.clone(),
            system: None,
            allocated: number(record.allocated_tb),
            utilized: number(record.utilized_tb),
            left: number(record.left_tb),
            ratio: number(record.avg_util),
        }
    }
}

impl From<&ChildPoolRecord> for CapacityRow {
    fn from(record: &ChildPoolRecord) -> Self {
        Self {
            name: record.child_pool.clone(),
            system: None,
            allocated: number(record.allocated_tb),
            utilized: number(record.utilized_tb),
            left: number(record.left_tb),
            ratio: number(record.avg_util),
        }
    }
}

impl From<&TenantRecord> for CapacityRow {
    fn from(record: &TenantRecord) -> Self {
        Self {
            name: record.name.clone(),
            system: None,
            allocated: number(record.allocated_gb),
            utilized: number(record.utilized_gb),
            left: number(record.left_gb),
            ratio: number(record.avg_utilization),
        }
    }
}

impl From<&VolumeRecord> for CapacityRow {
    fn from(record: &VolumeRecord) -> Self {
        Self {
            name: record.volume.clone(),
            system: record.system.clone(),
            allocated: number(record.volume_size_gb),
            utilized: number(record.utilized_gb),
            left: number(record.left_gb),
            ratio: number(record.written_by_host_percent),
        }
    }
}

/// Level-typed record collection from one dashboard response.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelRecords {
    /// Pool records.
    Pools(Vec<PoolRecord>),
    /// Child pool records.
    ChildPools(Vec<ChildPoolRecord>),
    /// Tenant records.
    Tenants(Vec<TenantRecord>),
    /// Volume records.
    Volumes(Vec<VolumeRecord>),
}

impl LevelRecords {
    /// Empty collection for a level.
    #[must_use]
    pub const fn empty(level: Level) -> Self {
        match level {
            Level::Pools => Self::Pools(Vec::new()),
            Level::ChildPools => Self::ChildPools(Vec::new()),
            Level::Tenants => Self::Tenants(Vec::new()),
            Level::Volumes => Self::Volumes(Vec::new()),
        }
    }

    /// Level the records belong to.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::Pools(_) => Level::Pools,
            Self::ChildPools(_) => Level::ChildPools,
            Self::Tenants(_) => Level::Tenants,
            Self::Volumes(_) => Level::Volumes,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Pools(records) => records.len(),
            Self::ChildPools(records) => records.len(),
            Self::Tenants(records) => records.len(),
            Self::Volumes(records) => records.len(),
        }
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalise every record into a [`CapacityRow`], preserving order.
    #[must_use]
    pub fn rows(&self) -> Vec<CapacityRow> {
        match self {
            Self::Pools(records) => records.iter().map(CapacityRow::from).collect(),
            Self::ChildPools(records) => records.iter().map(CapacityRow::from).collect(),
            Self::Tenants(records) => records.iter().map(CapacityRow::from).collect(),
            Self::Volumes(records) => records.iter().map(CapacityRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_match_levels() {
        for level in Level::ALL {
            assert_eq!(descriptor(level).level, level);
        }
        assert_eq!(descriptor(Level::Pools).native_unit, DisplayUnit::Tb);
        assert_eq!(descriptor(Level::ChildPools).native_unit, DisplayUnit::Tb);
        assert_eq!(descriptor(Level::Tenants).native_unit, DisplayUnit::Gb);
        assert_eq!(descriptor(Level::Volumes).native_unit, DisplayUnit::Gb);
        assert!(descriptor(Level::Volumes).drill.is_none());
    }

    #[test]
    fn missing_fields_default_explicitly() {
        let row = CapacityRow::from(&VolumeRecord::default());
        assert_eq!(row.display_name(), UNKNOWN_NAME);
        assert_eq!(row.display_system(), UNKNOWN_NAME);
        assert!(row.allocated.abs() < f64::EPSILON);
        assert!(row.ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn volume_rows_map_size_and_written_ratio() {
        let record = VolumeRecord {
            volume: Some("acme_vol1".into()),
            system: Some("sys-a".into()),
            volume_size_gb: Some(200.0),
            utilized_gb: Some(50.0),
            left_gb: Some(150.0),
            written_by_host_percent: Some(0.25),
        };
        let rows = LevelRecords::Volumes(vec![record]).rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name(), "acme_vol1");
        assert_eq!(rows[0].display_system(), "sys-a");
        assert!((rows[0].allocated - 200.0).abs() < f64::EPSILON);
        assert!((rows[0].ratio - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn drill_kind_names_round_trip() {
        for kind in [DrillKind::Pool, DrillKind::ChildPool, DrillKind::Tenant] {
            assert_eq!(DrillKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DrillKind::parse("volume"), None);
    }
}
