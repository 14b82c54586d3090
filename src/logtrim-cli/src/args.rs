//! CLI argument structures and parsing.
//!
//! Defines the command-line surface using clap and converts it into a
//! validated [`RetentionPolicy`].

use clap::Parser;
use std::path::PathBuf;

use logtrim_core::{RetentionLimit, RetentionPolicy, parse_age, parse_size};

/// Environment variable consulted for the log level when no flag is given.
pub const LOG_LEVEL_ENV: &str = "LOGTRIM_LOG_LEVEL";

/// How chatty logtrim is on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Fatal problems only (bad arguments, unreadable directory)
    Error,
    /// Also report files that could not be stat'ed or deleted
    Warn,
    /// Also report keep-all notices and the pruning summary (default)
    #[default]
    Info,
    /// Also report every exclusion and each step of the size search
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Read a level from `LOGTRIM_LOG_LEVEL`, ignoring case; `warning` is
    /// accepted for `warn`.
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Delete files matching a pattern to keep a certain maximum number and
/// maintain a logarithmic spacing of copies in time.
///
/// One (and only one) of --max-no and --max-size must be given.
#[derive(Debug, Parser)]
#[command(name = "logtrim")]
#[command(author, version)]
#[command(about = "Keep a logarithmically spaced subset of rotated files", long_about = None)]
pub struct Cli {
    /// The regular expression that matches files you want to process
    pub pattern: String,

    /// Directory to look for files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Number of files to keep
    #[arg(long)]
    pub max_no: Option<usize>,

    /// Maximum disc usage, uses suffix B/K/M/G/T (e.g. 500M)
    #[arg(long)]
    pub max_size: Option<String>,

    /// Maximum age of file to keep, uses suffix s/m/h/d/M/y (e.g. 30d)
    #[arg(long)]
    pub max_age: Option<String>,

    /// Treat files as if they were equally spaced in time. This preserves
    /// files closely spaced in time which would otherwise be discarded
    #[arg(long = "fake-equal-time-spacing")]
    pub equally_spaced: bool,

    /// Proceed even if the requirements given result in every file being deleted
    #[arg(long)]
    pub allow_delete_all: bool,

    /// Run everything, but don't actually delete anything
    #[arg(long)]
    pub dry_run: bool,

    /// Report every kept and killed file (also enables debug logging)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Output the plan and outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level: error, warn, info (default), debug, trace
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// Validate the limit options and build the retention policy.
    ///
    /// Runs before any filesystem access.
    pub fn retention_policy(&self) -> logtrim_core::Result<RetentionPolicy> {
        let max_size = self.max_size.as_deref().map(parse_size).transpose()?;
        let limit = RetentionLimit::from_options(self.max_no, max_size)?;
        let max_age = self.max_age.as_deref().map(parse_age).transpose()?;

        Ok(RetentionPolicy::new(limit)
            .with_max_age(max_age)
            .with_equal_spacing(self.equally_spaced)
            .with_allow_delete_all(self.allow_delete_all))
    }

    /// Resolve the tracing filter directives for this invocation.
    ///
    /// Precedence: `--verbose`, `--log-level`, `LOGTRIM_LOG_LEVEL`,
    /// `RUST_LOG`, then info.
    pub fn log_filter(&self, env: impl Fn(&str) -> Option<String>) -> String {
        if self.verbose {
            return LogLevel::Debug.as_filter_str().to_string();
        }
        if let Some(level) = self.log_level {
            return level.as_filter_str().to_string();
        }
        if let Some(level) = env(LOG_LEVEL_ENV).and_then(|v| LogLevel::from_str_loose(&v)) {
            return level.as_filter_str().to_string();
        }
        if let Some(directives) = env("RUST_LOG").filter(|v| !v.is_empty()) {
            return directives;
        }
        LogLevel::default().as_filter_str().to_string()
    }
}
