//! triagedash binary entrypoint kept minimal. The full runtime lives in `app`.

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;
use triagedash::args::{Args, determine_log_level};

struct TriagedashTimer;

impl tracing_subscriber::fmt::time::FormatTime for TriagedashTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Local::now()
            .format("%Y-%m-%d-T %H:%M:%S")
            .to_string();
        w.write_str(&ts)
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Install the tracing subscriber.
///
/// Inputs:
/// - `level`: Fallback filter used when `RUST_LOG` is unset.
///
/// Details:
/// - Logs go to `<config>/logs/triagedash.log`; stderr is used when the file cannot be opened.
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    let mut log_path = triagedash::config::logs_dir();
    log_path.push("triagedash.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(TriagedashTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(TriagedashTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&determine_log_level(&args));

    tracing::info!(report = args.report, "triagedash starting");
    if let Err(err) = triagedash::app::run(args).await {
        tracing::error!(error = %err, "Application error");
        eprintln!("triagedash: {err}");
        std::process::exit(1);
    }
    tracing::info!("triagedash exited");
}
