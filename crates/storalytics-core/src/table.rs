//! Data-table view-model.

use serde::Serialize;
use storalytics_api_models::{Breadcrumb, Level};

use crate::format::{format_amount, format_percent};
use crate::levels::{CapacityRow, DrillTarget, UNKNOWN_NAME, descriptor};
use crate::units::{DisplayUnit, convert};

/// Column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Stable column key.
    pub key: &'static str,
    /// Header text, unit-suffixed for magnitude columns.
    pub text: String,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Row id (input index).
    pub id: String,
    /// Cell text in header order.
    pub cells: Vec<String>,
    /// Filter to apply when the row is clicked.
    pub drill: Option<DrillTarget>,
}

impl TableRow {
    /// Whether clicking the row drills down.
    #[must_use]
    pub const fn clickable(&self) -> bool {
        self.drill.is_some()
    }
}

/// Table view-model for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTable {
    /// Table title.
    pub title: String,
    /// Column headers.
    pub headers: Vec<Header>,
    /// Rows in input order.
    pub rows: Vec<TableRow>,
}

/// Headers for a level in a display unit.
#[must_use]
pub fn headers(level: Level, unit: DisplayUnit) -> Vec<Header> {
    let desc = descriptor(level);
    let mut headers = vec![Header {
        key: desc.name_key,
        text: desc.name_header.to_string(),
    }];
    if desc.has_system {
        headers.push(Header {
            key: "system",
            text: "System".to_string(),
        });
    }
    headers.extend([
        Header {
            key: "allocated",
            text: format!("Allocated {unit}"),
        },
        Header {
            key: "utilized",
            text: format!("Utilized {unit}"),
        },
        Header {
            key: "left",
            text: format!("Left {unit}"),
        },
        Header {
            key: desc.ratio_key,
            text: "Avg Utilization %".to_string(),
        },
    ]);
    headers
}

/// Table title for a level, naming the parent selection.
#[must_use]
pub fn table_title(level: Level, breadcrumb: Option<&Breadcrumb>) -> String {
    let crumb = breadcrumb.cloned().unwrap_or_default();
    let name = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN_NAME.to_string());
    match level {
        Level::Pools => "Pools".to_string(),
        Level::ChildPools => format!("Child Pools in {}", name(crumb.pool)),
        Level::Tenants => format!("Tenants in {}", name(crumb.child_pool)),
        Level::Volumes => format!("Volumes for {}", name(crumb.tenant)),
    }
}

/// Build the table for a level's rows, converting magnitudes into `unit`.
#[must_use]
pub fn build_table(
    level: Level,
    rows: &[CapacityRow],
    unit: DisplayUnit,
    breadcrumb: Option<&Breadcrumb>,
) -> DataTable {
    let desc = descriptor(level);
    let native = desc.native_unit;
    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut cells = vec![row.display_name().to_string()];
            if desc.has_system {
                cells.push(row.display_system().to_string());
            }
            cells.extend(
                [row.allocated, row.utilized, row.left]
                    .into_iter()
                    .map(|value| format_amount(convert(value, native, unit))),
            );
            cells.push(format_percent(row.ratio));
            let drill = desc
                .drill
                .map(|kind| DrillTarget::new(kind, row.display_name()));
            TableRow {
                id: index.to_string(),
                cells,
                drill,
            }
        })
        .collect();
    DataTable {
        title: table_title(level, breadcrumb),
        headers: headers(level, unit),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{DrillKind, LevelRecords};
    use storalytics_api_models::{ChildPoolRecord, PoolRecord, TenantRecord, VolumeRecord};

    #[test]
    fn pool_rows_are_clickable_and_converted() {
        let rows = LevelRecords::Pools(vec![
            PoolRecord {
                pool: Some("A".into()),
                allocated_tb: Some(100.0),
                utilized_tb: Some(40.0),
                left_tb: Some(60.0),
                avg_util: Some(0.4),
                volume_count: Some(3),
            },
            PoolRecord::default(),
        ])
        .rows();
        let table = build_table(Level::Pools, &rows, DisplayUnit::Gb, None);
        assert_eq!(table.title, "Pools");
        let texts: Vec<&str> = table.headers.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Pool", "Allocated GB", "Utilized GB", "Left GB", "Avg Utilization %"]
        );
        assert_eq!(table.headers[4].key, "avg_util");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].cells,
            vec!["A", "100,000.00", "40,000.00", "60,000.00", "40.00"]
        );
        assert_eq!(
            table.rows[0].drill,
            Some(DrillTarget::new(DrillKind::Pool, "A"))
        );
        assert_eq!(table.rows[1].id, "1");
        assert_eq!(table.rows[1].cells[0], UNKNOWN_NAME);
        assert_eq!(
            table.rows[1].drill,
            Some(DrillTarget::new(DrillKind::Pool, UNKNOWN_NAME))
        );
    }

    #[test]
    fn clickability_depends_only_on_level() {
        let unnamed = [
            LevelRecords::Pools(vec![PoolRecord::default()]),
            LevelRecords::ChildPools(vec![ChildPoolRecord::default()]),
            LevelRecords::Tenants(vec![TenantRecord::default()]),
            LevelRecords::Volumes(vec![VolumeRecord::default()]),
        ];
        for records in unnamed {
            let level = records.level();
            let table = build_table(level, &records.rows(), DisplayUnit::Tb, None);
            assert_eq!(
                table.rows[0].clickable(),
                level != Level::Volumes,
                "unexpected clickability for an unnamed {level} row"
            );
        }
        let tenants = LevelRecords::Tenants(vec![TenantRecord::default()]).rows();
        let table = build_table(Level::Tenants, &tenants, DisplayUnit::Tb, None);
        assert_eq!(
            table.rows[0].drill,
            Some(DrillTarget::new(DrillKind::Tenant, UNKNOWN_NAME))
        );
    }

    #[test]
    fn volume_rows_carry_system_and_never_drill() {
        let rows = LevelRecords::Volumes(vec![VolumeRecord {
            volume: Some("v1".into()),
            system: None,
            volume_size_gb: Some(1_500.0),
            utilized_gb: Some(500.0),
            left_gb: Some(1_000.0),
            written_by_host_percent: Some(0.5),
        }])
        .rows();
        let crumb = Breadcrumb {
            pool: Some("P1".into()),
            child_pool: Some("C1".into()),
            tenant: Some("T1".into()),
        };
        let table = build_table(Level::Volumes, &rows, DisplayUnit::Tb, Some(&crumb));
        assert_eq!(table.title, "Volumes for T1");
        assert_eq!(table.headers[1].key, "system");
        assert_eq!(table.headers[5].key, "avg_utilization");
        assert_eq!(
            table.rows[0].cells,
            vec!["v1", "Unknown", "1.50", "0.50", "1.00", "50.00"]
        );
        assert!(!table.rows[0].clickable());
    }

    #[test]
    fn titles_name_the_parent_selection() {
        let crumb = Breadcrumb {
            pool: Some("P1".into()),
            child_pool: Some("C1".into()),
            tenant: None,
        };
        assert_eq!(
            table_title(Level::ChildPools, Some(&crumb)),
            "Child Pools in P1"
        );
        assert_eq!(table_title(Level::Tenants, Some(&crumb)), "Tenants in C1");
        assert_eq!(table_title(Level::Tenants, None), "Tenants in Unknown");
    }

    #[test]
    fn headers_follow_the_unit() {
        for unit in DisplayUnit::ALL {
            let headers = headers(Level::Tenants, unit);
            assert_eq!(headers[0].text, "Tenant");
            assert_eq!(headers[1].text, format!("Allocated {unit}"));
        }
    }
}
