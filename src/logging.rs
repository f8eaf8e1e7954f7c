use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives, e.g. `debug` or `java_opts=trace`.
pub const LOG_LEVEL_ENV: &str = "JAVA_OPTS_LOG_LEVEL";

/// When set, logs go to a file derived from this path instead of stderr.
pub const LOG_FILE_ENV: &str = "JAVA_OPTS_LOG_FILE";

/// Initialize tracing.
///
/// Stdout carries the assembled option string, so logs go to stderr
/// (default level `warn`). Set `JAVA_OPTS_LOG_FILE` to a path to log to
/// `{path}.{timestamp}.{pid}` instead; staging plugins running in parallel
/// each get their own file.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok() else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339()),
            )
            .init();
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
