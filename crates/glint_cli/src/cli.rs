use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render a JSON scene description to a PNG image.
#[derive(Debug, Parser)]
#[command(name = "glint", version)]
pub struct Args {
    /// Scene description (JSON)
    pub scene: PathBuf,

    /// Output image (PNG)
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Worker threads, all cores when omitted
    #[arg(long)]
    pub threads: Option<usize>,
}
