//! Interactive drill-down over stdin.

use std::io::{self, Write};

use anyhow::anyhow;
use storalytics_core::{DashboardSession, DisplayUnit, FetchRequest, Status};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::{OutputFormat, parse_unit};
use crate::client::{CliError, CliResult, DashboardBackend};
use crate::output::render_view;

const HELP: &str =
    "commands: <row number> drill down | b back | r refresh/retry | u <GB|TB|PB> unit | q quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExploreInput {
    Drill(usize),
    Back,
    Refresh,
    Unit(DisplayUnit),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ExploreInput {
    fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Self::Empty;
        };
        match head.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Self::Quit,
            "b" | "back" => Self::Back,
            "r" | "refresh" | "retry" => Self::Refresh,
            "h" | "help" | "?" => Self::Help,
            "u" | "unit" => match words.next().map(parse_unit) {
                Some(Ok(unit)) => Self::Unit(unit),
                Some(Err(message)) => Self::Invalid(message),
                None => Self::Invalid("usage: u <GB|TB|PB>".to_string()),
            },
            other => other
                .parse::<usize>()
                .map_or_else(|_| Self::Invalid(format!("unknown command '{head}'")), Self::Drill),
        }
    }
}

fn write_failed(err: &io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

async fn execute<B: DashboardBackend + ?Sized>(
    backend: &B,
    session: &mut DashboardSession,
    request: FetchRequest,
) {
    let result = backend.fetch(&request.filter).await;
    let outcome = session.apply(request.token, result);
    debug!(token = %request.token, ?outcome, "explorer fetch applied");
}

fn render_screen(session: &DashboardSession, out: &mut impl Write) -> CliResult<()> {
    if let Some(view) = session.view() {
        render_view(&view, OutputFormat::Table, out)?;
    }
    if let Status::Failed { message } = session.status() {
        writeln!(out, "{message}. Type 'r' to retry.").map_err(|err| write_failed(&err))?;
    }
    Ok(())
}

/// Drive a dashboard session from line-oriented input until `q` or EOF.
pub(crate) async fn explore<B, R, W>(
    backend: &B,
    unit: DisplayUnit,
    input: R,
    out: &mut W,
) -> CliResult<DashboardSession>
where
    B: DashboardBackend + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut session = DashboardSession::new(unit);
    let request = session.start();
    execute(backend, &mut session, request).await;
    render_screen(&session, out)?;

    loop {
        write!(out, "> ").and_then(|()| out.flush()).map_err(|err| write_failed(&err))?;
        let Some(line) = lines
            .next_line()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?
        else {
            break;
        };

        let request = match ExploreInput::parse(&line) {
            ExploreInput::Quit => break,
            ExploreInput::Empty => continue,
            ExploreInput::Help => {
                writeln!(out, "{HELP}").map_err(|err| write_failed(&err))?;
                continue;
            }
            ExploreInput::Invalid(message) => {
                writeln!(out, "{message}").map_err(|err| write_failed(&err))?;
                continue;
            }
            ExploreInput::Unit(next) => {
                session.set_unit(next);
                None
            }
            ExploreInput::Back => {
                let request = session.back();
                if request.is_none() {
                    writeln!(out, "Already at the top level.").map_err(|err| write_failed(&err))?;
                    continue;
                }
                request
            }
            ExploreInput::Refresh => Some(if session.status().error().is_some() {
                session.retry()
            } else {
                session.refresh()
            }),
            ExploreInput::Drill(row) => {
                let request = row.checked_sub(1).and_then(|index| session.drill_row(index));
                if request.is_none() {
                    writeln!(out, "Row {row} cannot be drilled into.")
                        .map_err(|err| write_failed(&err))?;
                    continue;
                }
                request
            }
        };

        if let Some(request) = request {
            execute(backend, &mut session, request).await;
        }
        render_screen(&session, out)?;
    }
    Ok(session)
}

pub(crate) async fn handle_explore<B: DashboardBackend + ?Sized>(
    backend: &B,
    unit: DisplayUnit,
) -> CliResult<()> {
    let mut out = io::stdout();
    writeln!(out, "{HELP}").map_err(|err| write_failed(&err))?;
    explore(backend, unit, BufReader::new(tokio::io::stdin()), &mut out).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use storalytics_core::{DashboardError, DashboardPayload, Filter, Level};

    /// Serves canned payloads keyed by filter depth and records every filter.
    /// `failing_drills` fetches with a non-empty filter fail first.
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Filter>>,
        failing_drills: Mutex<u32>,
    }

    #[async_trait]
    impl DashboardBackend for FakeBackend {
        async fn fetch(&self, filter: &Filter) -> Result<DashboardPayload, DashboardError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(filter.clone());
            }
            if !filter.is_empty()
                && let Ok(mut remaining) = self.failing_drills.lock()
                && *remaining > 0
            {
                *remaining -= 1;
                return Err(DashboardError::fetch("connection reset"));
            }
            let body = match filter.implied_level() {
                Level::Pools => json!({
                    "level": "pools",
                    "pools": [{"pool": "P1", "allocated_tb": 10.0, "utilized_tb": 5.0}]
                }),
                Level::ChildPools => json!({
                    "level": "child_pools",
                    "data": [{"child_pool": "C1", "allocated_tb": 10.0, "utilized_tb": 5.0}],
                    "breadcrumb": {"pool": filter.pool}
                }),
                Level::Tenants => json!({
                    "level": "tenants",
                    "data": [{"name": "T1", "allocated_gb": 10000.0, "utilized_gb": 5000.0}],
                    "breadcrumb": {"pool": filter.pool, "child_pool": filter.child_pool}
                }),
                Level::Volumes => json!({
                    "level": "volumes",
                    "data": [{"volume": "v1", "system": "s1", "volume_size_gb": 100.0}],
                    "breadcrumb": {"pool": filter.pool, "child_pool": filter.child_pool, "tenant": filter.tenant}
                }),
            };
            DashboardPayload::from_json(&body.to_string())
        }
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<Filter> {
            self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }
    }

    #[test]
    fn input_parsing() {
        assert_eq!(ExploreInput::parse(" 3 "), ExploreInput::Drill(3));
        assert_eq!(ExploreInput::parse("B"), ExploreInput::Back);
        assert_eq!(ExploreInput::parse("u pb"), ExploreInput::Unit(DisplayUnit::Pb));
        assert_eq!(ExploreInput::parse(""), ExploreInput::Empty);
        assert!(matches!(ExploreInput::parse("u xb"), ExploreInput::Invalid(_)));
        assert!(matches!(ExploreInput::parse("zoom"), ExploreInput::Invalid(_)));
    }

    #[tokio::test]
    async fn drill_to_volumes_and_back_to_the_top() -> Result<()> {
        let backend = FakeBackend::default();
        let script = "1\n1\n1\n9\nb\nb\nb\nb\nq\n";
        let mut out = Vec::new();
        let session = explore(&backend, DisplayUnit::Tb, script.as_bytes(), &mut out).await?;

        assert_eq!(session.nav().level, Level::Pools);
        let calls = backend.calls();
        let depths: Vec<usize> = calls.iter().map(Filter::depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3, 2, 1, 0]);

        let text = String::from_utf8(out)?;
        assert!(text.contains("Volumes for T1"));
        assert!(text.contains("Row 9 cannot be drilled into."));
        assert!(text.contains("Already at the top level."));
        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_can_be_retried() -> Result<()> {
        let backend = FakeBackend {
            failing_drills: Mutex::new(1),
            ..FakeBackend::default()
        };
        let mut out = Vec::new();
        let session = explore(&backend, DisplayUnit::Tb, "1\nr\nu gb\n".as_bytes(), &mut out).await?;

        assert_eq!(session.nav().level, Level::ChildPools);
        assert_eq!(session.unit(), DisplayUnit::Gb);
        assert_eq!(backend.calls()[1..], [Filter::pool("P1"), Filter::pool("P1")]);
        let text = String::from_utf8(out)?;
        assert!(text.contains("Failed to load dashboard data. Type 'r' to retry."));
        assert!(text.contains("Allocated GB"));
        Ok(())
    }
}
