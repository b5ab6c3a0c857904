use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppResult;

pub fn get_log_dir(data_dir: &Path) -> AppResult<PathBuf> {
    let log_dir = data_dir.join("logs");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

/// Initialize logger system
///
/// `default_filter` applies when `RUST_LOG` is unset.
pub fn init_logger(data_dir: &Path, default_filter: &str) {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    let log_dir = match get_log_dir(data_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to initialize log directory: {}", e);
            return;
        }
    };

    // 1. File appender, rolled daily
    let file_appender = tracing_appender::rolling::daily(log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // 2. Console output layer; stderr so client output on stdout stays clean
    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // 3. File output layer (disable ANSI formatting)
    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // 4. Filter layer
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 5. Initialize global subscriber (try_init tolerates re-initialization)
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    // The guard must outlive every log call; the process owns it until exit
    std::mem::forget(_guard);

    info!("Logger system initialized (Console + File Persistence)");
}
