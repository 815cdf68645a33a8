//! CLI entry point: merges the Okhotsk sea ice extent with station
//! temperatures into a single daily CSV.

use anyhow::Result;
use clap::Parser;
use okhotsk_clean::pipeline::{Layout, run};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "clean")]
#[command(about = "Join sea ice and station CSVs into one daily dataset", long_about = None)]
struct Cli {
    /// Directory holding okhotsk.csv, danshui.csv, katsuura.csv, nemuro.csv and yelizovo.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// CSV file to write the merged rows to
    #[arg(short, long, default_value = "data.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/okhotsk_clean.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("okhotsk_clean.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let layout = Layout {
        data_dir: cli.data_dir,
        output: cli.output,
    };

    let stats = run(&layout)?;
    info!(joined = stats.joined, dropped = stats.dropped(), "Done");

    Ok(())
}
