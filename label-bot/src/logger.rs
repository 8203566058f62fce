//! Logging setup
//!
//! Console output by default; daily rolling files when a log directory is
//! configured.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "label-bot.log";

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `log_level` when set. The returned guard flushes the
/// file writer and must live as long as the process.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("label_bot={log_level},label_sheet={log_level},tower_http=info"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            subscriber.with_ansi(false).with_writer(writer).init();
            return Some(guard);
        }
    }

    subscriber.init();
    None
}
