//! Todo Server
//!
//! HTTP service for a personal to-do list with categories, date filters and
//! completion reports.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use todo_server::cli::report::{ReportArgs, ReportFormat};
use todo_server::cli::{Cli, Command};
use todo_server::config::{Config, ConfigLoader};
use todo_server::dates::parse_due_date;
use todo_server::db::Database;
use todo_server::logging::init_logging;
use todo_server::report::{check_summary_range, daily_completed_counts, format_table};
use todo_server::server;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, cli.verbose)?;

    let mut loader = ConfigLoader::load(cli.config.as_deref().map(Path::new))?;
    if let Some(path) = loader.config_path() {
        debug!(path = ?path, "Using config file");
    }

    // CLI overrides sit above every config tier
    let config = loader.config_mut();
    if let Some(db_path) = &cli.database {
        config.server.db_path = PathBuf::from(db_path);
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let config = loader.into_config();
    config.validate()?;
    config
        .ensure_db_dir()
        .with_context(|| format!("creating directory for {:?}", config.server.db_path))?;

    let db = Arc::new(Database::open(&config.server.db_path)?);
    debug!(path = ?config.server.db_path, "Database opened");

    match cli.command {
        None | Some(Command::Serve) => serve(db, &config).await,
        Some(Command::Report(args)) => run_report(&db, &args),
    }
}

async fn serve(db: Arc<Database>, config: &Config) -> Result<()> {
    let (shutdown_tx, addr) =
        server::start_server(db, &config.server.host, config.server.port, config.server.cors)
            .await
            .with_context(|| format!("binding {}", config.bind_address()))?;

    info!("Serving procedures at http://{}/api/todo/{{procedure}}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    let _ = shutdown_tx.send(());
    Ok(())
}

fn run_report(db: &Database, args: &ReportArgs) -> Result<()> {
    let Some(start) = parse_due_date(&args.start) else {
        bail!("--start is not a valid date: {}", args.start);
    };
    let Some(end) = parse_due_date(&args.end) else {
        bail!("--end is not a valid date: {}", args.end);
    };

    check_summary_range(start, end)?;
    let tasks = db.generate_report(start, end)?;
    let summary = daily_completed_counts(start, end, &tasks);

    match args.format {
        ReportFormat::Table => print!("{}", format_table(&summary)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
