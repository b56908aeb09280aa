//! Logging setup for sgt.
//!
//! sgt owns the terminal while running and prints the chosen directory on stdout when it
//! exits, so log output can go to neither stream. Everything is written to a daily rolling
//! file under the state directory instead.
//!
//! The filter is read from `SGT_LOG` (same syntax as `RUST_LOG`) and defaults to `info`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "SGT_LOG";
const LOG_FILE_PREFIX: &str = "sgt.log";

/// Returns the directory that log files are written to.
///
/// `$XDG_STATE_HOME/sgt`, falling back to the platform data dir.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("sgt"))
}

/// Installs the global subscriber.
///
/// Returns the appender guard which must be held for the lifetime of the process, or `None`
/// when logging could not be set up. A failure here never stops sgt from running.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    if fs::create_dir_all(log_dir).is_err() {
        return None;
    }

    let appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;

    Some(guard)
}
