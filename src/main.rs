//! Employee Directory - list and add employees through a GraphQL API.
//!
//! The tool keeps a local view of the directory in sync with the server:
//! it loads the list, submits new employees from a draft, and reloads after
//! every successful create.
//!
//!   employee-directory list
//!   employee-directory add --name Ada --email ada@x.com --position Engineer
//!   employee-directory interactive
//!   employee-directory config init

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_banner, format_employees_json, format_employees_table, format_status_line,
    EmployeeDirectorySync, LoadOutcome, OutputFormat,
};
use cli::{Cli, Commands, ConfigAction};
use domain::{AppConfig, AppError, DraftEmployee, DraftField, SyncState};
use infrastructure::HttpTransport;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if e.is_transport() {
            eprintln!(
                "{} Is the API running? Check the endpoint with `employee-directory config show`.",
                "hint:".yellow()
            );
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;

    let config =
        infrastructure::resolve_config(cli.config.as_deref(), cli.endpoint.as_deref())?;
    tracing::debug!(endpoint = %config.api.endpoint, "Configuration resolved");

    match cli.command {
        Commands::List => cmd_list(config, format).await,
        Commands::Add {
            name,
            email,
            position,
        } => cmd_add(config, format, DraftEmployee::new(name, email, position)).await,
        Commands::Interactive => cmd_interactive(config, format).await,
        Commands::Config { action } => cmd_config(&config, cli.config.as_deref(), action),
    }
}

/// Build the sync component over HTTP.
fn connect(config: AppConfig) -> domain::Result<EmployeeDirectorySync> {
    let transport = HttpTransport::new(&config.api)?;
    tracing::info!(endpoint = %transport.endpoint(), "Using GraphQL endpoint");
    Ok(EmployeeDirectorySync::new(config, Arc::new(transport)))
}

/// List employees command.
async fn cmd_list(config: AppConfig, format: OutputFormat) -> domain::Result<()> {
    let sync = connect(config)?;

    match sync.load().await {
        LoadOutcome::Applied { count } => tracing::debug!(count, "Directory loaded"),
        LoadOutcome::Superseded => {}
        LoadOutcome::Failed(err) => return Err(err),
    }

    render(&sync.snapshot(), format)
}

/// Add a single employee command.
async fn cmd_add(
    config: AppConfig,
    format: OutputFormat,
    draft: DraftEmployee,
) -> domain::Result<()> {
    let sync = connect(config)?;

    for field in DraftField::ALL {
        sync.update_draft_field(field, draft.get(field));
    }

    let outcome = sync.submit().await;
    let state = sync.snapshot();
    let created = outcome.into_result()?;
    tracing::debug!(id = %created.id, "Server assigned id");

    render(&state, format)
}

/// Interactive add loop.
async fn cmd_interactive(config: AppConfig, format: OutputFormat) -> domain::Result<()> {
    let sync = connect(config)?;
    let mut rx = sync.subscribe();

    sync.load().await;
    let state = rx.borrow_and_update().clone();
    render(&state, format)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        println!();
        println!("{}", "➕ Add Employee (empty name to quit)".bold());

        let Some(name) = prompt(&mut input, DraftField::Name, true)? else {
            break;
        };
        sync.update_draft_field(DraftField::Name, name);

        for field in [DraftField::Email, DraftField::Position] {
            let Some(value) = prompt(&mut input, field, false)? else {
                return Ok(());
            };
            sync.update_draft_field(field, value);
        }

        sync.submit().await;
        let state = rx.borrow_and_update().clone();
        render(&state, format)?;
    }

    println!("👋 Bye");
    Ok(())
}

/// Read one required field. Returns `None` on EOF, or on an empty answer when
/// `empty_quits` is set; otherwise blank answers re-prompt.
fn prompt(
    input: &mut impl BufRead,
    field: DraftField,
    empty_quits: bool,
) -> domain::Result<Option<String>> {
    loop {
        print!("  {}: ", field.as_str().cyan());
        std::io::stdout()
            .flush()
            .map_err(|e| AppError::io("Failed to write prompt", e))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| AppError::io("Failed to read input", e))?;
        if read == 0 {
            return Ok(None);
        }

        let value = line.trim();
        if !value.is_empty() {
            return Ok(Some(value.to_string()));
        }
        if empty_quits {
            return Ok(None);
        }
        println!("  {} {} is required", "!".yellow().bold(), field);
    }
}

/// Print the banner, the employee list and the status line.
fn render(state: &SyncState, format: OutputFormat) -> domain::Result<()> {
    match format {
        OutputFormat::Json => {
            let out = format_employees_json(&state.employees).map_err(AppError::json_parse)?;
            println!("{out}");
        }
        OutputFormat::Table => {
            if let Some(banner) = format_banner(state) {
                println!("{banner}");
            }
            println!("{}", format_employees_table(&state.employees));
            println!("{}", format_status_line(state));
        }
    }

    Ok(())
}

/// Configuration command.
fn cmd_config(
    config: &AppConfig,
    explicit_path: Option<&std::path::Path>,
    action: ConfigAction,
) -> domain::Result<()> {
    let path = explicit_path
        .map_or_else(infrastructure::config_file_path, std::path::Path::to_path_buf);

    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
                message: format!("Failed to serialize config: {e}"),
            })?;
            println!("{content}");
        }
        ConfigAction::Init => {
            if infrastructure::ensure_config_exists(&path)? {
                println!("{} Created {}", "✓".green().bold(), path.display());
            } else {
                println!("Config already exists at {}", path.display());
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::SetEndpoint { url } => {
            let mut updated = if path.exists() {
                infrastructure::config::load_config_from_file(&path)?
            } else {
                AppConfig::default()
            };
            updated.api.endpoint = url;
            HttpTransport::new(&updated.api)?;

            infrastructure::save_config(&path, &updated)?;
            println!(
                "{} Endpoint set to {}",
                "✓".green().bold(),
                updated.api.endpoint.cyan()
            );
        }
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
