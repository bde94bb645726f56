use std::io;

use anyhow::anyhow;
use storalytics_core::{DashboardSession, DisplayUnit, Filter};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult, DashboardBackend};
use crate::output::render_view;

/// Fetch one level through a fresh session and return it, failing on error.
pub(crate) async fn load_level<B: DashboardBackend + ?Sized>(
    backend: &B,
    filter: Filter,
    unit: DisplayUnit,
) -> CliResult<DashboardSession> {
    let mut session = DashboardSession::new(unit);
    let request = session.open(filter);
    let result = backend.fetch(&request.filter).await;
    if let Err(err) = &result {
        return Err(CliError::failure(anyhow!("{}: {err}", err.user_message())));
    }
    session.apply(request.token, result);
    Ok(session)
}

pub(crate) async fn handle_dashboard<B: DashboardBackend + ?Sized>(
    backend: &B,
    filter: Filter,
    unit: DisplayUnit,
    format: OutputFormat,
) -> CliResult<()> {
    let session = load_level(backend, filter, unit).await?;
    let view = session
        .view()
        .ok_or_else(|| CliError::failure(anyhow!("dashboard response was not applied")))?;
    render_view(&view, format, &mut io::stdout().lock())
}
