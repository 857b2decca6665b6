// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Global `tracing` subscriber installation (§10.1): an env-filter bounded
//! by `--log-level`, writing to stderr or, when `--log-file` is given, to a
//! daily-rolling file via `tracing-appender`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The returned [`WorkerGuard`] must be
/// held for the process lifetime when file logging is enabled — dropping
/// it early truncates buffered log lines.
pub fn install(log_level: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "ggdeploymentd.log".to_string());
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
