//! Process-wide logging for TaskMaster binaries.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process, writing either rolling
//!   files or stderr.
//! - Route panics through the logger with a bounded, single-line payload.
//!
//! # Invariants
//! - Starting twice with the same level and target is a no-op.
//! - Starting with a different level or target fails instead of switching.
//! - Nothing here panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FILE_BASENAME: &str = "taskmaster";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Rolling files under an absolute directory.
    Directory(PathBuf),
    Stderr,
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

struct ActiveLogger {
    level: LevelFilter,
    target: LogTarget,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: LevelFilter, target: &LogTarget) -> Result<(), String> {
        if self.target != *target {
            return Err(format!(
                "logging already writes to `{}`; refusing to switch to `{target}`",
                self.target
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already runs at `{}`; refusing to switch to `{}`",
                level_name(self.level),
                level_name(level)
            ));
        }
        Ok(())
    }
}

/// Starts rolling file logs under `log_dir`.
///
/// # Errors
/// - Unknown `level`.
/// - `log_dir` empty, relative, or not creatable.
/// - Logging already active with another level or target.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let dir = absolute_dir(log_dir)?;
    activate(level, LogTarget::Directory(dir))
}

/// Starts logging to stderr.
pub fn init_console_logging(level: &str) -> Result<(), String> {
    activate(parse_level(level)?, LogTarget::Stderr)
}

/// Returns the active `(level, target)`, if logging was started.
pub fn logging_status() -> Option<(&'static str, LogTarget)> {
    ACTIVE
        .get()
        .map(|active| (level_name(active.level), active.target.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn activate(level: LevelFilter, target: LogTarget) -> Result<(), String> {
    let active = ACTIVE.get_or_try_init(|| {
        let handle = start_backend(level, &target)?;
        install_panic_hook();
        info!(
            "event=logging_init module=core status=ok level={} target={} os={} version={}",
            level_name(level),
            target,
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION")
        );
        Ok::<_, String>(ActiveLogger {
            level,
            target: target.clone(),
            _handle: handle,
        })
    })?;
    active.ensure_matches(level, &target)
}

fn start_backend(level: LevelFilter, target: &LogTarget) -> Result<LoggerHandle, String> {
    let spec = LogSpecification::builder().default(level).build();
    let logger = match target {
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;
            Logger::with(spec)
                .log_to_file(FileSpec::default().directory(dir).basename(FILE_BASENAME))
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_FILES),
                )
                .append()
                .write_mode(WriteMode::BufferAndFlush)
                .format_for_files(flexi_logger::detailed_format)
        }
        LogTarget::Stderr => Logger::with(spec)
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };
    logger
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let raw = raw.trim();
    let candidate = if raw.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        raw
    };
    match LevelFilter::from_str(candidate) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{raw}`; expected trace|debug|info|warn|error"
        )),
        Ok(level) => Ok(level),
    }
}

fn level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

fn absolute_dir(raw: &str) -> Result<PathBuf, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    let path = Path::new(raw);
    if !path.is_absolute() {
        return Err(format!("log directory must be absolute, got `{raw}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        // Payloads can echo request input.
        error!(
            "event=panic module=core status=error location={} payload={}",
            location,
            one_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

fn one_line(value: &str, max_chars: usize) -> String {
    let mut flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        flat.push_str("...");
    }
    flat
}
