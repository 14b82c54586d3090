//! Human-readable and JSON reporting of a retention run.

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use logtrim_core::{
    FileRecord, KillReason, PruneOutcome, RetentionPlan, RetentionPolicy, format_size,
};

/// Format an age in seconds relative to now (`3 minutes ago`, `a day ago`).
pub fn format_age(age_secs: f64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    // Whole seconds are enough for display.
    let secs = age_secs.max(0.0) as u64;
    match secs {
        0 => "now".to_string(),
        s if s < MINUTE => ago(s, "a second", "seconds"),
        s if s < HOUR => ago(s / MINUTE, "a minute", "minutes"),
        s if s < DAY => ago(s / HOUR, "an hour", "hours"),
        s if s < MONTH => ago(s / DAY, "a day", "days"),
        s if s < YEAR => ago(s / MONTH, "a month", "months"),
        s => ago(s / YEAR, "a year", "years"),
    }
}

fn ago(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{one} ago")
    } else {
        format!("{count} {many} ago")
    }
}

fn describe(record: &FileRecord) -> String {
    format!(
        "{} last modified {} with size {}",
        record.name,
        format_age(record.age_secs),
        format_size(record.size)
    )
}

/// Write the per-file report shown with `--verbose`.
///
/// Candidates are listed youngest first, followed by the files removed by the
/// hard age or size limits.
pub fn write_text_report(out: &mut impl Write, plan: &RetentionPlan) -> io::Result<()> {
    writeln!(
        out,
        "We are keeping {} files and killing {} of them.",
        plan.kept.len(),
        plan.killed.len()
    )?;

    let mut candidates: Vec<(&FileRecord, bool)> = plan
        .kept
        .iter()
        .map(|r| (r, true))
        .chain(plan.thinned().map(|d| (&d.record, false)))
        .collect();
    candidates.sort_by(|a, b| a.0.candidate_cmp(b.0));

    for (record, kept) in candidates {
        let status = if kept { "kept" } else { "killed" };
        writeln!(out, "{} is being {}", describe(record), status)?;
    }

    for doomed in plan.excluded() {
        let why = match doomed.reason {
            KillReason::TooOld => "too old",
            KillReason::TooLarge => "too large",
            KillReason::Thinned => continue,
        };
        writeln!(
            out,
            "{} is being killed because it is {}",
            describe(&doomed.record),
            why
        )?;
    }

    Ok(())
}

/// Write the list of files a dry run would delete.
pub fn write_dry_run(out: &mut impl Write, plan: &RetentionPlan) -> io::Result<()> {
    for doomed in &plan.killed {
        writeln!(out, "would delete {}", doomed.record.name)?;
    }
    writeln!(
        out,
        "Dry run: {} files ({}) would be deleted, {} kept",
        plan.killed.len(),
        format_size(plan.killed_bytes()),
        plan.kept.len()
    )
}

/// Everything `--json` prints.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub directory: &'a Path,
    pub pattern: &'a str,
    pub policy: &'a RetentionPolicy,
    pub kept_bytes: u64,
    pub killed_bytes: u64,
    pub plan: &'a RetentionPlan,
    pub outcome: &'a PruneOutcome,
}
