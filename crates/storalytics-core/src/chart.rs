//! Chart view-models: the two-ring utilization donut and the top-tenant bars.
//!
//! # Design
//! - Builders are pure; every value is already converted into the display unit.
//! - Renderers (Yew canvas-free markup, CLI legend) consume these structures
//!   without re-deriving percentages.

use serde::Serialize;
use storalytics_api_models::{Level, TopTenant};

use crate::aggregate::summarize_rows;
use crate::format::{format_amount, format_share, share_percent};
use crate::levels::{CapacityRow, UNKNOWN_NAME, descriptor};
use crate::units::{DisplayUnit, convert};

/// Colors cycled over inner-ring segments.
pub const PALETTE: [&str; 10] = [
    "#0f62fe", "#8a3ffc", "#33b1ff", "#007d79", "#ff7eb6", "#fa4d56", "#24a148", "#f1c21b",
    "#d12771", "#8a3800",
];
/// Outer ring color of the utilized segment.
pub const UTILIZED_COLOR: &str = "#0f62fe";
/// Outer ring color of the available segment.
pub const AVAILABLE_COLOR: &str = "#e0e0e0";
/// Bar chart title.
pub const BAR_TITLE: &str = "Top 10 Tenants by Utilization";
/// Inner segments at or below this share (percent) carry no label.
pub const INNER_LABEL_MIN_SHARE: f64 = 5.0;

const OUTER_LABEL: &str = "Overall";
const UTILIZED_LABEL: &str = "Utilized";
const AVAILABLE_LABEL: &str = "Available";
const TB_PER_GB: f64 = 1_000.0;

/// One segment of a donut ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Legend label.
    pub label: String,
    /// Magnitude in the display unit.
    pub value: f64,
    /// Fill color.
    pub color: &'static str,
    /// Share of the ring sum, in percent.
    pub percent: f64,
    /// Text drawn on the segment; may be empty.
    pub display_label: String,
    /// Hover text.
    pub tooltip: String,
}

/// One ring of the donut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingDataset {
    /// Dataset label ("Overall", "Pool Breakdown", ...).
    pub label: String,
    /// Segments in draw order.
    pub segments: Vec<Segment>,
}

impl RingDataset {
    /// Sum of the segment values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|segment| segment.value).sum()
    }
}

/// Two-ring utilization donut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    /// Chart title.
    pub title: String,
    /// `Utilized`, `Available`, then one label per record.
    pub labels: Vec<String>,
    /// Outer ring (utilized vs. available).
    pub outer: RingDataset,
    /// Inner ring (per-record utilization).
    pub inner: RingDataset,
    /// Display unit of every value.
    pub unit: DisplayUnit,
}

/// One bar of the top-tenant chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Tenant name.
    pub label: String,
    /// Utilized capacity in the display unit.
    pub value: f64,
}

/// Top-tenant utilization bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    /// Chart title.
    pub title: String,
    /// Dataset label (`Utilized {unit}`).
    pub dataset_label: String,
    /// Bar fill color.
    pub color: &'static str,
    /// Bars in input order.
    pub bars: Vec<Bar>,
    /// Display unit of every value.
    pub unit: DisplayUnit,
}

impl BarChart {
    /// Largest bar value, used to scale proportional renderings.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|bar| bar.value).fold(0.0, f64::max)
    }
}

fn segment(label: String, value: f64, color: &'static str, ring_total: f64, unit: DisplayUnit) -> Segment {
    let percent = share_percent(value, ring_total);
    let share = format_share(percent);
    let tooltip = format!("{label}: {} {unit} ({share}%)", format_amount(value));
    Segment {
        label,
        value,
        color,
        percent,
        display_label: share,
        tooltip,
    }
}

/// Build the donut for a level's rows, converting into `unit`.
#[must_use]
pub fn build_donut(level: Level, rows: &[CapacityRow], unit: DisplayUnit) -> DonutChart {
    let level_desc = descriptor(level);
    let native = level_desc.native_unit;
    let summary = summarize_rows(rows).converted(native, unit);

    let utilized = summary.utilized;
    let available = summary.allocated - summary.utilized;
    let outer_total = utilized + available;
    let outer_segments = [
        (UTILIZED_LABEL, utilized, UTILIZED_COLOR),
        (AVAILABLE_LABEL, available, AVAILABLE_COLOR),
    ]
    .into_iter()
    .map(|(label, value, color)| {
        let mut seg = segment(label.to_string(), value, color, outer_total, unit);
        seg.display_label = format!("{label} {}%", seg.display_label);
        seg
    })
    .collect();

    let inner_values: Vec<(String, f64)> = rows
        .iter()
        .map(|row| {
            (
                row.display_name().to_string(),
                convert(row.utilized, native, unit),
            )
        })
        .collect();
    let inner_total: f64 = inner_values.iter().map(|(_, value)| value).sum();
    let inner_segments = inner_values
        .into_iter()
        .enumerate()
        .map(|(index, (label, value))| {
            let mut seg = segment(label, value, PALETTE[index % PALETTE.len()], inner_total, unit);
            seg.display_label = if seg.percent > INNER_LABEL_MIN_SHARE {
                format!("{}%", seg.display_label)
            } else {
                String::new()
            };
            seg
        })
        .collect::<Vec<_>>();

    let mut labels = vec![UTILIZED_LABEL.to_string(), AVAILABLE_LABEL.to_string()];
    labels.extend(inner_segments.iter().map(|seg| seg.label.clone()));

    DonutChart {
        title: format!("{} Utilization Distribution", level_desc.entity),
        labels,
        outer: RingDataset {
            label: OUTER_LABEL.to_string(),
            segments: outer_segments,
        },
        inner: RingDataset {
            label: format!("{} Breakdown", level_desc.entity),
            segments: inner_segments,
        },
        unit,
    }
}

/// Build the top-tenant bar chart.
///
/// Tenant utilization arrives in GB and is scaled to TB before converting
/// into the display unit.
#[must_use]
pub fn build_bar(top_tenants: &[TopTenant], unit: DisplayUnit) -> BarChart {
    let bars = top_tenants
        .iter()
        .map(|tenant| Bar {
            label: tenant
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            value: convert(
                tenant.utilized_gb.unwrap_or_default() / TB_PER_GB,
                DisplayUnit::Tb,
                unit,
            ),
        })
        .collect();
    BarChart {
        title: BAR_TITLE.to_string(),
        dataset_label: format!("Utilized {unit}"),
        color: UTILIZED_COLOR,
        bars,
        unit,
    }
}
