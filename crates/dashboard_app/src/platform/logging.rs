//! Logger bootstrap for the dashboard binary.
//!
//! File output goes to `./dashboard.log` in the current working directory.

use std::path::Path;

use dashboard_logging::LogDestination;
use log::LevelFilter;

use super::config::LogTarget;

const LOG_FILE: &str = "./dashboard.log";

/// `--log-to-file` adds the file sink to whatever the config asks for.
pub(crate) fn destination(configured: LogTarget, log_to_file: bool) -> LogDestination {
    match (configured, log_to_file) {
        (LogTarget::Terminal, true) => LogDestination::Both,
        (target, _) => target.into(),
    }
}

pub(crate) fn initialize(destination: LogDestination) {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    dashboard_logging::initialize(destination, level, Path::new(LOG_FILE));
}
