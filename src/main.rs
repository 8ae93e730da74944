//! CLI entry point for the bikeshare explorer.
//!
//! Everything after start-up is interactive: the user picks a city and
//! filters, and the tool prints statistics for the matching trips.

use anyhow::{Context, Result};
use bikeshare_stats::prompt::Session;
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data interactively", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr, plus a JSON rolling log file when LOG_FILE_PATH is set.
    // Stdout belongs to the prompts, so stderr stays quiet by default.
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_file = match std::env::var("LOG_FILE_PATH") {
        Ok(path) => Some(json_log_writer(Path::new(&path))?),
        Err(_) => None,
    };
    let (json_writer, _file_guard) = json_file.unzip();
    let json_filter = EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?);
    let json_layer = json_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(writer)
            .with_filter(json_filter)
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    info!(data_dir = %cli.data_dir.display(), "Starting bikeshare explorer");

    let stdin = std::io::stdin();
    let mut session = Session::new(stdin.lock(), std::io::stdout());
    session.run(&cli.data_dir)?;

    Ok(())
}

/// Opens a daily-rotated log file at `path`, creating its directory if needed.
fn json_log_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prefix = path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix.to_string_lossy())
        .build(dir)
        .with_context(|| format!("opening log directory {}", dir.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}
