//! Retention policy configuration and quantity parsing.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::error::{Result, TrimError};

// ============================================================================
// Constants
// ============================================================================

/// Seconds per age unit suffix accepted by `--max-age`.
pub const AGE_UNITS: &[(char, f64)] = &[
    ('s', 1.0),
    ('m', 60.0),
    ('h', 3_600.0),
    ('d', 86_400.0),
    ('M', 2_592_000.0),
    ('y', 31_536_000.0),
];

/// Bytes per size unit suffix accepted by `--max-size`.
pub const SIZE_UNITS: &[(char, f64)] = &[
    ('B', 1.0),
    ('K', 1_024.0),
    ('M', 1_048_576.0),
    ('G', 1_073_741_824.0),
    ('T', 1_099_511_627_776.0),
];

/// Smallest age the selector works with, in seconds.
///
/// Files modified in the same instant as the scan have age zero, which would
/// make the geometric ratio undefined.
pub const MIN_SELECTION_AGE_SECS: f64 = 1e-3;

// ============================================================================
// Configuration
// ============================================================================

/// How many files survive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RetentionLimit {
    /// Keep at most this many files.
    ByCount(NonZeroUsize),
    /// Keep files whose combined size fits in this many bytes.
    BySize(u64),
}

impl RetentionLimit {
    /// Build a limit from the two mutually exclusive options.
    pub fn from_options(max_no: Option<usize>, max_size: Option<u64>) -> Result<Self> {
        match (max_no, max_size) {
            (Some(_), Some(_)) | (None, None) => Err(TrimError::Configuration(
                "Must use only one of max_no or max_size.".to_string(),
            )),
            (Some(n), None) => NonZeroUsize::new(n).map(Self::ByCount).ok_or_else(|| {
                TrimError::Configuration("max_no must be at least 1".to_string())
            }),
            (None, Some(0)) => Err(TrimError::Configuration(
                "max_size must be greater than zero".to_string(),
            )),
            (None, Some(bytes)) => Ok(Self::BySize(bytes)),
        }
    }

    /// Per-file size ceiling implied by the limit, if any.
    pub fn max_file_size(&self) -> Option<u64> {
        match self {
            Self::ByCount(_) => None,
            Self::BySize(bytes) => Some(*bytes),
        }
    }
}

/// Everything the planner needs to decide which files survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Count or size limit.
    pub limit: RetentionLimit,

    /// Files older than this many seconds are always deleted.
    #[serde(default)]
    pub max_age_secs: Option<f64>,

    /// Treat files as equally spaced in time.
    #[serde(default)]
    pub equal_spacing: bool,

    /// Proceed even when nothing would be kept.
    #[serde(default)]
    pub allow_delete_all: bool,
}

impl RetentionPolicy {
    pub fn new(limit: RetentionLimit) -> Self {
        Self {
            limit,
            max_age_secs: None,
            equal_spacing: false,
            allow_delete_all: false,
        }
    }

    pub fn with_max_age(mut self, max_age_secs: Option<f64>) -> Self {
        self.max_age_secs = max_age_secs;
        self
    }

    pub fn with_equal_spacing(mut self, equal_spacing: bool) -> Self {
        self.equal_spacing = equal_spacing;
        self
    }

    pub fn with_allow_delete_all(mut self, allow_delete_all: bool) -> Self {
        self.allow_delete_all = allow_delete_all;
        self
    }
}

// ============================================================================
// Quantity parsing
// ============================================================================

/// Parse an age such as `30m`, `7d` or `1.5y` into seconds.
pub fn parse_age(input: &str) -> Result<f64> {
    parse_quantity(input, AGE_UNITS)
}

/// Parse a size such as `512K`, `10M` or `1.5G` into bytes.
pub fn parse_size(input: &str) -> Result<u64> {
    // Truncation to whole bytes is intended.
    parse_quantity(input, SIZE_UNITS).map(|bytes| bytes as u64)
}

/// Format bytes as a short human-readable string (`512B`, `1.5K`, `2.0G`).
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1}T", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}B")
    }
}

fn parse_quantity(input: &str, units: &[(char, f64)]) -> Result<f64> {
    let trimmed = input.trim();
    let Some(unit) = trimmed.chars().last() else {
        return Err(TrimError::invalid_quantity(input, "empty value"));
    };

    let Some(&(_, factor)) = units.iter().find(|(suffix, _)| *suffix == unit) else {
        let known: String = units.iter().map(|(suffix, _)| *suffix).collect();
        return Err(TrimError::invalid_quantity(
            input,
            format!("unit must be one of {known}"),
        ));
    };

    let number = &trimmed[..trimmed.len() - unit.len_utf8()];
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| TrimError::invalid_quantity(input, "not a number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(TrimError::invalid_quantity(
            input,
            "must be a non-negative finite number",
        ));
    }

    Ok(value * factor)
}
