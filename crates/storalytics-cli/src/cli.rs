//! Argument parsing and command dispatch.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use storalytics_api_models::LoginRequest;
use storalytics_core::{DisplayUnit, Filter, auth};
use storalytics_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::client::{
    AppContext, CliDependencies, CliError, CliResult, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
    parse_url,
};
use crate::commands::auth::{handle_login, handle_logout, handle_whoami};
use crate::commands::dashboard::handle_dashboard;
use crate::commands::explore::handle_explore;
use crate::commands::upload::handle_upload;

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_cli_logging(&cli);

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let deps = match CliDependencies::new(cli.timeout, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let result = dispatch(cli, &deps).await;

    match result {
        Ok(()) => {
            info!(command = command_name, trace_id = %trace_id, "command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            eprintln!("error: {}", err.display_message());
            info!(command = command_name, trace_id = %trace_id, exit_code, "command failed");
            exit_code
        }
    }
}

fn init_cli_logging(cli: &Cli) {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: LogFormat::from_name(cli.log_format.as_deref()),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: {err:#}");
    }
}

async fn dispatch(cli: Cli, deps: &CliDependencies) -> CliResult<()> {
    let ctx = AppContext {
        client: deps.client.clone(),
        base_url: cli.api_url,
    };
    let credentials = resolve_credentials(cli.username.as_deref(), cli.password)?;

    let session = handle_login(&ctx, &credentials).await?;
    let result = match cli.command {
        Command::Login => {
            println!("Logged in as {} ({})", session.username, session.role());
            Ok(())
        }
        Command::Whoami => handle_whoami(&ctx, cli.output).await,
        Command::Upload(args) => handle_upload(&ctx, &session, &args.file, cli.output).await,
        Command::Dashboard(args) => handle_dashboard(&ctx, args.filter(), cli.unit, cli.output).await,
        Command::Explore => handle_explore(&ctx, cli.unit).await,
    };
    handle_logout(&ctx).await;
    result
}

/// Validate credentials, prompting for the password on a terminal.
fn resolve_credentials(username: Option<&str>, password: Option<String>) -> CliResult<LoginRequest> {
    let username = username.unwrap_or_default();
    let password = match password {
        Some(password) => password,
        None if !username.trim().is_empty() && io::stdin().is_terminal() => {
            rpassword::prompt_password(format!("Password for {}: ", username.trim())).map_err(
                |err| CliError::failure(anyhow!("failed to read password from stdin: {err}")),
            )?
        }
        None => String::new(),
    };
    auth::credentials(username, &password).map_err(|err| {
        CliError::validation(format!(
            "{err} (pass --username/--password or set STORALYTICS_USERNAME/STORALYTICS_PASSWORD)"
        ))
    })
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login => "login",
        Command::Whoami => "whoami",
        Command::Upload(_) => "upload",
        Command::Dashboard(_) => "dashboard",
        Command::Explore => "explore",
    }
}

pub(crate) fn parse_unit(input: &str) -> Result<DisplayUnit, String> {
    input.parse::<DisplayUnit>().map_err(|err| err.to_string())
}

#[derive(Parser)]
#[command(
    name = "storalytics",
    about = "Explore storage capacity analytics from the command line"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "STORALYTICS_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(long, global = true, env = "STORALYTICS_USERNAME")]
    username: Option<String>,
    #[arg(long, global = true, env = "STORALYTICS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(
        long,
        global = true,
        env = "STORALYTICS_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long,
        global = true,
        env = "STORALYTICS_UNIT",
        value_parser = parse_unit,
        default_value = "TB",
        help = "Display unit for capacities (GB, TB or PB)"
    )]
    unit: DisplayUnit,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "STORALYTICS_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "STORALYTICS_LOG_FORMAT",
        help = "Log format (pretty or json); defaults to pretty in debug builds and json in release"
    )]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate credentials against the backend.
    Login,
    /// Show the signed-in account.
    Whoami,
    /// Upload an Excel (.xlsx) or CSV export (staff only).
    Upload(UploadArgs),
    /// Render one dashboard level.
    Dashboard(DashboardArgs),
    /// Interactively drill through the hierarchy.
    Explore,
}

#[derive(Args)]
pub(crate) struct UploadArgs {
    #[arg(help = "Path to the .xlsx or .csv file")]
    pub(crate) file: PathBuf,
}

#[derive(Args, Default)]
pub(crate) struct DashboardArgs {
    #[arg(long)]
    pub(crate) pool: Option<String>,
    #[arg(long, requires = "pool")]
    pub(crate) child_pool: Option<String>,
    #[arg(long, requires = "child_pool")]
    pub(crate) tenant: Option<String>,
}

impl DashboardArgs {
    pub(crate) fn filter(self) -> Filter {
        Filter {
            pool: self.pool,
            child_pool: self.child_pool,
            tenant: self.tenant,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
