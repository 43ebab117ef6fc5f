//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for
//! the Elton interpreter.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for Elton.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The path to the Elton source file.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,

    /// Specify the log level of the interpreter.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,

    /// Whether to dump the lexed token stream (for debugging).
    #[arg(long)]
    pub dump_tokens: bool,

    /// Whether to dump the parsed AST (for debugging).
    #[arg(long)]
    pub dump_ast: bool,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the interpreter.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// A log level, where also warnings are logged.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the interpreter,
    /// e.g., token and AST dumps.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the interpreter.
    #[value(alias("3"))]
    Debug,

    /// Log extra information. This can include more precise debug output or
    /// even non-important errors.
    #[value(alias("4"))]
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
