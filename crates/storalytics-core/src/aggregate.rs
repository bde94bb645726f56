//! Level summaries.

use serde::Serialize;
use storalytics_api_models::Level;

use crate::format::{format_amount, format_percent};
use crate::levels::{CapacityRow, LevelRecords, descriptor};
use crate::units::{DisplayUnit, convert};

/// Capacity totals for the records on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Total allocated capacity.
    pub allocated: f64,
    /// Total utilized capacity.
    pub utilized: f64,
    /// Total remaining capacity.
    pub left: f64,
    /// `utilized / allocated`, or `0` when nothing is allocated.
    pub avg_util: f64,
}

impl Summary {
    /// Convert the magnitudes from `from` into `to`; the ratio is unit-free.
    #[must_use]
    pub fn converted(self, from: DisplayUnit, to: DisplayUnit) -> Self {
        Self {
            allocated: convert(self.allocated, from, to),
            utilized: convert(self.utilized, from, to),
            left: convert(self.left, from, to),
            avg_util: self.avg_util,
        }
    }
}

/// Summary cells ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCells {
    /// `"{allocated} {unit}"`.
    pub allocated: String,
    /// `"{utilized} {unit}"`.
    pub utilized: String,
    /// `"{left} {unit}"`, shown under "Available".
    pub available: String,
    /// `"{avg}%"`.
    pub avg_utilization: String,
}

/// Summarize a level's records in the level's native unit.
#[must_use]
pub fn summarize(records: &LevelRecords) -> Summary {
    summarize_rows(&records.rows())
}

/// Sum normalised rows; units are whatever the rows are expressed in.
#[must_use]
pub fn summarize_rows(rows: &[CapacityRow]) -> Summary {
    let (allocated, utilized, left) = rows.iter().fold((0.0, 0.0, 0.0), |acc, row| {
        (acc.0 + row.allocated, acc.1 + row.utilized, acc.2 + row.left)
    });
    let avg_util = if allocated > 0.0 { utilized / allocated } else { 0.0 };
    Summary {
        allocated,
        utilized,
        left,
        avg_util,
    }
}

/// Summarize a level and convert the result into the display unit.
#[must_use]
pub fn summarize_for_display(level: Level, rows: &[CapacityRow], unit: DisplayUnit) -> Summary {
    summarize_rows(rows).converted(descriptor(level).native_unit, unit)
}

/// Format an already-converted summary.
#[must_use]
pub fn summary_cells(summary: &Summary, unit: DisplayUnit) -> SummaryCells {
    SummaryCells {
        allocated: format!("{} {unit}", format_amount(summary.allocated)),
        utilized: format!("{} {unit}", format_amount(summary.utilized)),
        available: format!("{} {unit}", format_amount(summary.left)),
        avg_utilization: format!("{}%", format_percent(summary.avg_util)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storalytics_api_models::PoolRecord;

    fn pool(name: &str, allocated: f64, utilized: f64) -> PoolRecord {
        PoolRecord {
            pool: Some(name.to_string()),
            allocated_tb: Some(allocated),
            utilized_tb: Some(utilized),
            left_tb: Some(allocated - utilized),
            avg_util: Some(utilized / allocated),
            volume_count: None,
        }
    }

    #[test]
    fn empty_levels_summarize_to_zero() {
        assert_eq!(summarize_rows(&[]), Summary::default());
        for level in Level::ALL {
            assert_eq!(summarize(&LevelRecords::empty(level)), Summary::default());
        }
    }

    #[test]
    fn pools_example_totals() {
        let records = LevelRecords::Pools(vec![pool("A", 100.0, 40.0), pool("B", 50.0, 10.0)]);
        let summary = summarize(&records);
        assert!((summary.allocated - 150.0).abs() < 1e-9);
        assert!((summary.utilized - 50.0).abs() < 1e-9);
        assert!((summary.left - 100.0).abs() < 1e-9);
        assert!((summary.avg_util - 50.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn display_conversion_uses_native_unit() {
        let rows = LevelRecords::Pools(vec![pool("A", 2.0, 1.0)]).rows();
        let summary = summarize_for_display(Level::Pools, &rows, DisplayUnit::Gb);
        assert!((summary.allocated - 2_000.0).abs() < 1e-9);
        assert!((summary.avg_util - 0.5).abs() < 1e-9);

        let cells = summary_cells(&summary, DisplayUnit::Gb);
        assert_eq!(cells.allocated, "2,000.00 GB");
        assert_eq!(cells.available, "1,000.00 GB");
        assert_eq!(cells.avg_utilization, "50.00%");
    }

    #[test]
    fn zero_allocation_has_zero_ratio() {
        let records = LevelRecords::Pools(vec![PoolRecord {
            utilized_tb: Some(5.0),
            ..PoolRecord::default()
        }]);
        assert!(summarize(&records).avg_util.abs() < f64::EPSILON);
    }
}
