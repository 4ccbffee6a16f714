use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "FLIGHTGLOBE_LOG";

/// Where log events go
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    /// Interactive runs own the terminal, so they log to a file
    File(PathBuf),
    Stderr,
    Off,
}

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("flightglobe")
        .join("flightglobe.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Falls back to no logging if the log
/// file cannot be created.
pub fn init(target: &LogTarget) {
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(true)
                .with_writer(std::io::stderr)
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogTarget::File(path) => {
            let file = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| File::create(path));
            let Ok(file) = file else {
                return;
            };
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
            tracing::info!(path = %path.display(), "logging to file");
        }
    }
}
