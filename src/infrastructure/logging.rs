//! Logging system configuration and initialization
//!
//! Console output goes to stderr so stdout stays clean for JSON output.
//! An optional file layer writes through a non-blocking appender to a file
//! rotated daily (`<prefix>.YYYY-MM-DD.log`); old log files beyond
//! `max_files` are pruned at startup.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use tracing::{debug, info, warn};
use tracing_appender::{
    non_blocking,
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Dependency targets quieted unless TRACE is requested
const DEPENDENCY_DIRECTIVES: [&str; 5] = [
    "reqwest=info",
    "hyper=warn",
    "hyper_util=warn",
    "html5ever=warn",
    "selectors=warn",
];

/// Local wall-clock timestamps
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory: configured, or `logs/` next to the executable
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("logs")
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level with
/// dependency noise suppressed and per-module overrides applied.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    if !config.level.eq_ignore_ascii_case("trace") {
        for directive in DEPENDENCY_DIRECTIVES {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    for (module, level) in &config.module_filters {
        let directive = format!("{module}={level}");
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("Invalid module filter '{directive}'"))?,
        );
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails if no output is enabled or if a global subscriber is already set.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(config)?;

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .boxed()
    });

    let mut log_dir = None;
    let file_layer = if config.file_output {
        let dir = get_log_directory(config);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = file_appender(&dir, config)?;
        cleanup_old_logs(&dir, config.max_files)?;

        let (writer, guard) = non_blocking(appender);
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry is poisoned"))?
            .push(guard);
        log_dir = Some(dir);

        let layer = fmt::Layer::new()
            .with_writer(writer)
            .with_timer(LocalTimeFormatter)
            .with_ansi(false);
        Some(if config.json_format {
            layer
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            layer.with_target(false).boxed()
        })
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    debug!("Logging initialized (level: {}, json: {})", config.level, config.json_format);
    if let Some(dir) = log_dir {
        info!("Log directory: {}", dir.display());
    }

    Ok(())
}

/// Daily rotating appender writing `<file_prefix>.YYYY-MM-DD.log` into `dir`
pub fn file_appender(dir: &Path, config: &LoggingConfig) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_prefix.as_str())
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))
}

/// Remove the oldest `.log` files so at most `max_files` remain
pub fn cleanup_old_logs(log_dir: &Path, max_files: u32) -> Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let mut log_files = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path.extension().is_some_and(|ext| ext == "log");
        if path.is_file() && is_log {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                log_files.push((path, modified));
            }
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let keep = max_files as usize;
    let mut removed = 0;
    for (path, _) in log_files.iter().skip(keep) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old log file {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory() {
        let config = LoggingConfig::default();
        assert!(get_log_directory(&config).ends_with("logs"));

        let config = LoggingConfig {
            log_dir: Some(PathBuf::from("/tmp/energy-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(get_log_directory(&config), PathBuf::from("/tmp/energy-logs"));
    }

    #[test]
    fn test_invalid_module_filter_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let mut config = LoggingConfig::default();
        config
            .module_filters
            .insert("energy_plan_scraper".to_string(), "very-loud".to_string());
        assert!(build_env_filter(&config).is_err());
    }

    #[test]
    fn test_no_output_is_an_error() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn test_rotated_files_are_subject_to_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::default();
        let _appender = file_appender(dir.path(), &config).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("energy-plans."));
        assert!(names[0].ends_with(".log"));

        // An older rotation beyond the limit is pruned, today's file stays
        std::fs::write(dir.path().join("energy-plans.2020-01-01.log"), "old").unwrap();
        let old = std::fs::File::options()
            .write(true)
            .open(dir.path().join("energy-plans.2020-01-01.log"))
            .unwrap();
        old.set_modified(SystemTime::now() - Duration::from_secs(86_400))
            .unwrap();
        assert_eq!(cleanup_old_logs(dir.path(), 1).unwrap(), 1);
        assert!(dir.path().join(&names[0]).exists());
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        for (i, name) in ["a.log", "b.log", "c.log"].iter().enumerate() {
            let path = dir.path().join(name);
            std::fs::write(&path, "x").unwrap();
            let file = std::fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(now - Duration::from_secs(60 * (3 - i as u64)))
                .unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let removed = cleanup_old_logs(dir.path(), 2).unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("a.log").exists());
        assert!(dir.path().join("c.log").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
