use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tally_config::{TallyConfig, WorkspacePaths};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod bootstrap;
mod cli;
mod commands;
mod context;
mod files;
mod output;
mod progress;
mod ui;

#[cfg(test)]
mod test_support;

const LOG_FILE: &str = "tally.log";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tally error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    let is_init = matches!(cli.command, cli::Commands::Init(_));
    let database_file = bootstrap::database_marker()?;
    let root = context::resolve_workspace_root(flags.root.as_deref(), is_init, &database_file)?;
    let config = bootstrap::load_config(&root)?;
    let paths = config
        .paths
        .resolve(&root)
        .context("invalid path settings")?;

    init_tracing(&flags, &config, &paths)?;
    ui::init(&flags);
    tracing::debug!(root = %root.display(), "resolved workspace root");

    if let cli::Commands::Init(args) = &cli.command {
        return commands::init::handle(args, &config, &paths, &flags).await;
    }

    let ctx = context::AppContext::init(paths)
        .await
        .context("failed to initialize tally workspace context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(
    flags: &cli::GlobalFlags,
    config: &TallyConfig,
    paths: &WorkspacePaths,
) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    let log_file = open_log_file(config, paths)?.map(file_layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_file)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

type FileLayer<S> = fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>;

fn file_layer<S>(file: File) -> FileLayer<S> {
    fmt::layer().with_ansi(false).with_writer(Mutex::new(file))
}

/// Append handle on `<logs>/tally.log`. `None` when file logging is off or
/// `tally init` has not created the log folder yet.
fn open_log_file(config: &TallyConfig, paths: &WorkspacePaths) -> anyhow::Result<Option<File>> {
    if !config.logging.file || !paths.logs.is_dir() {
        return Ok(None);
    }
    let path = paths.logs.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(Some(file))
}
