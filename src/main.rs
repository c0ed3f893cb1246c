use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use csv_report_watcher::config::{Config, DEFAULT_CONFIG_PATH};
use csv_report_watcher::pipeline::Pipeline;
use csv_report_watcher::prompt::DialoguerPrompt;
use csv_report_watcher::watcher::{Dispatcher, FolderWatcher};

/// Turn CSV files dropped into a folder into formatted .xlsx reports.
#[derive(Debug, Parser)]
#[command(name = "csv-report-watcher", version, about)]
struct Cli {
    /// Path to the JSON settings file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the settle delay (milliseconds) from the settings file.
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Log debug detail.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("csv-report-watcher error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(ms) = cli.settle_ms {
        config.settle_delay_ms = ms;
    }
    config
        .ensure_directories()
        .context("failed to create working folders")?;
    info!(
        watch = %config.watch_folder.display(),
        output = %config.output_folder.display(),
        archive = %config.archive_folder.display(),
        "file automation system started"
    );

    let settle_delay = config.settle_delay();
    let watch_folder = config.watch_folder.clone();
    let mut pipeline = Pipeline::new(config);
    if pipeline.config().ask_user_for_totals {
        pipeline = pipeline.with_prompt(Arc::new(DialoguerPrompt));
    }

    let dispatcher = Dispatcher::spawn(Arc::new(pipeline), settle_delay)
        .context("failed to start dispatch worker")?;
    let watcher = FolderWatcher::start(&watch_folder, dispatcher.handle())
        .with_context(|| format!("failed to watch {}", watch_folder.display()))?;

    let stop = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&stop))
            .context("failed to install signal handler")?;
    }
    while !stop.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(200));
    }

    info!("interrupt received; finishing queued files");
    watcher.stop();
    dispatcher.shutdown();
    info!("shut down");
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("REPORT_WATCHER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
