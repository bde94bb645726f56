//! Markup helpers that turn chart view-models into CSS values.

use storalytics_core::chart::RingDataset;

/// `conic-gradient(...)` for a ring; an empty ring renders as a neutral track.
#[must_use]
pub fn ring_gradient(ring: &RingDataset) -> String {
    const EMPTY: &str = "conic-gradient(#e0e0e0 0% 100%)";
    let total = ring.total();
    if total <= 0.0 || !total.is_finite() {
        return EMPTY.to_string();
    }
    let mut start = 0.0_f64;
    let stops: Vec<String> = ring
        .segments
        .iter()
        .filter(|segment| segment.value > 0.0)
        .map(|segment| {
            let end = (start + segment.value / total * 100.0).min(100.0);
            let stop = format!("{} {start:.2}% {end:.2}%", segment.color);
            start = end;
            stop
        })
        .collect();
    if stops.is_empty() {
        return EMPTY.to_string();
    }
    format!("conic-gradient({})", stops.join(", "))
}

/// Width of a bar as a percentage of the widest one.
#[must_use]
pub fn bar_width(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storalytics_core::chart::build_donut;
    use storalytics_core::{CapacityRow, DisplayUnit, Level};

    fn row(name: &str, allocated: f64, utilized: f64) -> CapacityRow {
        CapacityRow {
            name: Some(name.into()),
            system: None,
            allocated,
            utilized,
            left: allocated - utilized,
            ratio: utilized / allocated,
        }
    }

    #[test]
    fn outer_ring_gradient_covers_utilized_then_available() {
        let chart = build_donut(Level::Pools, &[row("A", 100.0, 25.0)], DisplayUnit::Tb);
        assert_eq!(
            ring_gradient(&chart.outer),
            "conic-gradient(#0f62fe 0.00% 25.00%, #e0e0e0 25.00% 100.00%)"
        );
    }

    #[test]
    fn empty_rings_render_a_track() {
        let chart = build_donut(Level::Pools, &[], DisplayUnit::Tb);
        assert_eq!(ring_gradient(&chart.inner), "conic-gradient(#e0e0e0 0% 100%)");
    }

    #[test]
    fn bars_scale_to_the_widest() {
        assert!((bar_width(5.0, 20.0) - 25.0).abs() < f64::EPSILON);
        assert!(bar_width(1.0, 0.0).abs() < f64::EPSILON);
        assert!((bar_width(30.0, 20.0) - 100.0).abs() < f64::EPSILON);
    }
}
