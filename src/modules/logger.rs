use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppResult;

/// Initialize logger system: console + daily rolling file under `log_dir`.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logger(log_dir: &Path) -> AppResult<()> {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    super::config::ensure_dir(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "proxy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: a second call is a no-op rather than a panic
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    // The guard must outlive every log call; the process owns it until exit
    std::mem::forget(guard);

    info!("Logger system initialized (Console + File Persistence)");
    Ok(())
}
