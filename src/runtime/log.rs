use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use log::LevelFilter;

use crate::runtime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel(pub LevelFilter);
impl std::str::FromStr for LogLevel {
    type Err = runtime::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" | "warning" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" | "none" => LevelFilter::Off,
            _ => {
                return Err(runtime::Error::parse_error(
                    "log level",
                    Some(format!("unknown level '{}'", s)),
                ))
            }
        };
        Ok(LogLevel(level))
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogMode {
    Path,
    Terminal,
    Discard,
}
impl std::str::FromStr for LogMode {
    type Err = runtime::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_lowercase().as_str() {
            "path" | "file" => LogMode::Path,
            "terminal" | "term" | "cli" => LogMode::Terminal,
            "discard" | "none" => LogMode::Discard,
            _ => {
                return Err(runtime::Error::parse_error(
                    "log mode",
                    Some(format!("unknown mode '{}'", s)),
                ))
            }
        };
        Ok(mode)
    }
}

///////////////////////////////
/// Install the process-wide logger. Library code only talks to the `log` facade
pub fn setup_global_logger(
    log_level: LogLevel,
    log_mode: LogMode,
    log_path: &Path,
) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.format_timestamp_millis();

    match log_mode {
        LogMode::Discard => {
            builder.filter_level(LevelFilter::Off);
        }

        LogMode::Terminal => {
            builder
                .filter_level(log_level.into())
                .target(env_logger::Target::Stderr);
        }

        LogMode::Path => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

            // File drain, no colors
            builder
                .filter_level(log_level.into())
                .write_style(env_logger::WriteStyle::Never)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
    }

    builder.try_init().context("Logger was already initialized")?;
    Ok(())
}
