//! Output renderers and formatting helpers for CLI commands.

use std::io::{self, Write};

use anyhow::anyhow;
use serde::Serialize;
use storalytics_api_models::SessionInfo;
use storalytics_core::chart::RingDataset;
use storalytics_core::{BarChart, DashboardView, DataTable, UploadReport, format_amount};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const BAR_WIDTH: usize = 40;

fn write_failed(err: &io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

fn render_json<T: Serialize>(value: &T, out: &mut impl Write) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(|err| write_failed(&err))
}

pub(crate) fn render_session_info(info: &SessionInfo, format: OutputFormat) -> CliResult<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => render_json(info, &mut out),
        OutputFormat::Table => {
            let role = if info.is_staff { "staff" } else { "viewer" };
            let line = if info.authenticated {
                format!(
                    "authenticated: {} ({role})",
                    info.username.as_deref().unwrap_or("<unknown>")
                )
            } else {
                "not authenticated".to_string()
            };
            writeln!(out, "{line}").map_err(|err| write_failed(&err))
        }
    }
}

pub(crate) fn render_upload_report(report: &UploadReport, format: OutputFormat) -> CliResult<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => render_json(report, &mut out),
        OutputFormat::Table => {
            let mut text = report.message.clone();
            for line in report.details() {
                text.push_str("\n  ");
                text.push_str(&line);
            }
            writeln!(out, "{text}").map_err(|err| write_failed(&err))
        }
    }
}

pub(crate) fn render_view(
    view: &DashboardView,
    format: OutputFormat,
    out: &mut impl Write,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(view, out),
        OutputFormat::Table => write_view(view, out).map_err(|err| write_failed(&err)),
    }
}

fn write_view(view: &DashboardView, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", view.breadcrumb)?;
    writeln!(out)?;
    let cells = &view.summary_cells;
    writeln!(out, "  Allocated        {}", cells.allocated)?;
    writeln!(out, "  Utilized         {}", cells.utilized)?;
    writeln!(out, "  Available        {}", cells.available)?;
    writeln!(out, "  Avg Utilization  {}", cells.avg_utilization)?;
    writeln!(out)?;

    writeln!(out, "{}", view.donut.title)?;
    write_ring(&view.donut.outer, out)?;
    write_ring(&view.donut.inner, out)?;
    writeln!(out)?;

    if let Some(bar) = &view.bar {
        write_bars(bar, out)?;
        writeln!(out)?;
    }

    write_table(&view.table, out)
}

fn write_ring(ring: &RingDataset, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  {}", ring.label)?;
    for segment in &ring.segments {
        writeln!(out, "    [{}] {}", segment.color, segment.tooltip)?;
    }
    Ok(())
}

fn write_bars(chart: &BarChart, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{} ({})", chart.title, chart.dataset_label)?;
    let max = chart.max_value();
    let label_width = chart
        .bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0);
    for bar in &chart.bars {
        let filled = bar_cells(bar.value, max);
        writeln!(
            out,
            "  {:<label_width$} {:<BAR_WIDTH$} {} {}",
            bar.label,
            "#".repeat(filled),
            format_amount(bar.value),
            chart.unit
        )?;
    }
    Ok(())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_cells(value: f64, max: f64) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / max) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
}

fn write_table(table: &DataTable, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", table.title)?;
    let mut widths: Vec<usize> = table
        .headers
        .iter()
        .map(|header| header.text.chars().count())
        .collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let number_width = table.rows.len().to_string().len();
    let left_aligned: Vec<bool> = table
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| index == 0 || header.key == "system")
        .collect();

    let header_line = join_cells(
        table.headers.iter().map(|header| header.text.as_str()),
        &widths,
        &left_aligned,
    );
    writeln!(out, "  {:>number_width$}  {}", "#", header_line.trim_end())?;

    for (position, row) in table.rows.iter().enumerate() {
        let marker = if row.clickable() {
            (position + 1).to_string()
        } else {
            String::from("-")
        };
        let row_line = join_cells(row.cells.iter().map(String::as_str), &widths, &left_aligned);
        writeln!(out, "  {marker:>number_width$}  {}", row_line.trim_end())?;
    }
    if table.rows.is_empty() {
        writeln!(out, "  (no records)")?;
    }
    Ok(())
}

fn join_cells<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    left_aligned: &[bool],
) -> String {
    let mut line = String::new();
    let columns = widths.iter().copied().zip(left_aligned.iter().copied());
    for (index, (cell, (width, left))) in cells.zip(columns).enumerate() {
        let sep = if index == 0 { "" } else { "  " };
        if left {
            line.push_str(&format!("{sep}{cell:<width$}"));
        } else {
            line.push_str(&format!("{sep}{cell:>width$}"));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use storalytics_core::{DashboardPayload, DashboardSession, DisplayUnit};

    fn pools_view() -> Result<DashboardView> {
        let payload = DashboardPayload::from_json(
            &json!({
                "level": "pools",
                "pools": [
                    {"pool": "A", "allocated_tb": 100.0, "utilized_tb": 40.0, "left_tb": 60.0, "avg_util": 0.4},
                    {"pool": "B", "allocated_tb": 50.0, "utilized_tb": 10.0, "left_tb": 40.0, "avg_util": 0.2}
                ],
                "top_tenants": [{"name": "acme", "utilized_gb": 30000.0}, {"name": "beta", "utilized_gb": 15000.0}]
            })
            .to_string(),
        )?;
        let mut session = DashboardSession::new(DisplayUnit::Tb);
        let request = session.start();
        session.apply(request.token, Ok(payload));
        session.view().ok_or_else(|| anyhow!("view expected"))
    }

    #[test]
    fn table_output_lists_summary_charts_and_rows() -> Result<()> {
        let view = pools_view()?;
        let mut out = Vec::new();
        render_view(&view, OutputFormat::Table, &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.starts_with("Level: pools\n"));
        assert!(text.contains("Allocated        150.00 TB"));
        assert!(text.contains("Avg Utilization  33.33%"));
        assert!(text.contains("[#0f62fe] Utilized: 50.00 TB (33.3%)"));
        assert!(text.contains("Top 10 Tenants by Utilization (Utilized TB)"));
        assert!(text.contains(&format!("acme {} 30.00 TB", "#".repeat(BAR_WIDTH))));
        assert!(text.contains("  1  A"));
        assert!(text.contains("Avg Utilization %"));
        Ok(())
    }

    #[test]
    fn json_output_serialises_the_view() -> Result<()> {
        let view = pools_view()?;
        let mut out = Vec::new();
        render_view(&view, OutputFormat::Json, &mut out)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["level"], "pools");
        assert_eq!(value["unit"], "TB");
        assert_eq!(value["table"]["rows"][0]["drill"]["type"], "pool");
        Ok(())
    }

    #[test]
    fn bar_cells_scale_to_width() {
        assert_eq!(bar_cells(5.0, 10.0), BAR_WIDTH / 2);
        assert_eq!(bar_cells(1.0, 0.0), 0);
        assert_eq!(bar_cells(10.0, 10.0), BAR_WIDTH);
    }
}
