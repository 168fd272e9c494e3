//! Logger initialization.
//!
//! Scan progress goes to stderr through `env_logger`, either as coloured
//! lines for terminals or as one JSON object per line for log shippers.
//! Stdout is left to the scan results.

use std::io::{self, Write};

use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependency targets and the most verbose level let through for each.
const DEPENDENCY_LEVELS: &[(&str, LevelFilter)] = &[
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hickory_resolver", LevelFilter::Warn),
    // Truncated or malformed UDP answers are retried by hickory itself
    ("hickory_proto", LevelFilter::Error),
];

/// Installs the global logger.
///
/// `RUST_LOG` is read first, so per-module directives still work, but
/// `level` always decides the scanner's own verbosity.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Debug output for the scanner, quieter resolver internals
/// domain_security_scanner example.com --log-level debug
///
/// # JSON lines for a log pipeline
/// domain_security_scanner -f domains.txt --log-format json 2> scan.log
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (target, cap) in DEPENDENCY_LEVELS {
        builder.filter_module(target, (*cap).min(level));
    }
    builder.filter_module("domain_security_scanner", level);

    match format {
        LogFormat::Json => builder.format(write_json),
        LogFormat::Plain => builder.format(write_plain),
    };

    builder.try_init()?;
    Ok(())
}

fn write_json(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{line}")
}

fn write_plain(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let level = record.level().as_str();
    let level = match record.level() {
        Level::Error => level.red().bold(),
        Level::Warn => level.yellow(),
        Level::Info => level.green(),
        Level::Debug => level.blue(),
        Level::Trace => level.purple(),
    };

    writeln!(
        buf,
        "{} {} {} {}",
        chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
        level,
        record.target().cyan(),
        record.args()
    )
}
