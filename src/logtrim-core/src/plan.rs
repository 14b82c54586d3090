//! Retention planning.
//!
//! Turns the scanned records and a [`RetentionPolicy`] into a keep/kill
//! decision without touching the filesystem.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{RetentionLimit, RetentionPolicy};
use crate::error::{Result, TrimError};
use crate::record::{FileRecord, sort_candidates, total_size};
use crate::selector::{keep_all_notice, select_by_count, select_by_size};

/// Why a file is scheduled for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KillReason {
    /// Older than the maximum age.
    TooOld,
    /// Larger than the size budget on its own.
    TooLarge,
    /// Not picked by the selector.
    Thinned,
}

impl KillReason {
    /// Whether the file was removed before selection ran.
    pub fn is_exclusion(&self) -> bool {
        matches!(self, Self::TooOld | Self::TooLarge)
    }
}

/// A file in the kill set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoomedFile {
    #[serde(flatten)]
    pub record: FileRecord,
    pub reason: KillReason,
}

/// Outcome of planning: which files stay and which go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPlan {
    /// Surviving files, ascending by age.
    pub kept: Vec<FileRecord>,
    /// Files to delete: hard exclusions first, then thinned candidates.
    pub killed: Vec<DoomedFile>,
    /// Limit the plan was computed under.
    pub limit: RetentionLimit,
    /// Set when the limit left every candidate in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl RetentionPlan {
    pub fn kept_bytes(&self) -> u64 {
        total_size(&self.kept)
    }

    pub fn killed_bytes(&self) -> u64 {
        self.killed.iter().map(|d| d.record.size).sum()
    }

    pub fn is_kept(&self, name: &str) -> bool {
        self.kept.iter().any(|r| r.name == name)
    }

    /// Files removed by the age or size ceiling.
    pub fn excluded(&self) -> impl Iterator<Item = &DoomedFile> {
        self.killed.iter().filter(|d| d.reason.is_exclusion())
    }

    /// Candidates the selector passed over.
    pub fn thinned(&self) -> impl Iterator<Item = &DoomedFile> {
        self.killed.iter().filter(|d| !d.reason.is_exclusion())
    }
}

/// Replace ages with `1, 2, ..., L` following candidate order.
pub fn apply_equal_spacing(records: &mut [FileRecord]) {
    for (idx, record) in records.iter_mut().enumerate() {
        record.age_secs = (idx + 1) as f64;
    }
}

/// Split records into candidates and hard exclusions.
///
/// Age is checked before size, so a file that is both too old and too large
/// is reported as too old.
pub fn exclude(
    records: Vec<FileRecord>,
    policy: &RetentionPolicy,
) -> (Vec<FileRecord>, Vec<DoomedFile>) {
    let max_size = policy.limit.max_file_size();
    let mut candidates = Vec::with_capacity(records.len());
    let mut excluded = Vec::new();

    for record in records {
        let reason = if policy.max_age_secs.is_some_and(|max| record.age_secs > max) {
            Some(KillReason::TooOld)
        } else if max_size.is_some_and(|max| record.size > max) {
            Some(KillReason::TooLarge)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!(name = %record.name, ?reason, "Excluded before selection");
                excluded.push(DoomedFile { record, reason });
            }
            None => candidates.push(record),
        }
    }

    (candidates, excluded)
}

/// Decide which records to keep under `policy`.
///
/// Steps, in order: sort into candidate order, optionally flatten ages to
/// equal spacing, drop hard exclusions, then thin the rest by count or size.
/// Fails with [`TrimError::NoViableRetention`] when nothing survives the
/// exclusions unless the policy allows deleting everything.
pub fn select_retained(
    mut records: Vec<FileRecord>,
    policy: &RetentionPolicy,
) -> Result<RetentionPlan> {
    sort_candidates(&mut records);
    if policy.equal_spacing {
        apply_equal_spacing(&mut records);
    }

    let (candidates, mut killed) = exclude(records, policy);

    if candidates.is_empty() {
        if !policy.allow_delete_all {
            return Err(TrimError::NoViableRetention);
        }
        info!(killed = killed.len(), "Nothing left to keep; deleting all files");
        return Ok(RetentionPlan {
            kept: Vec::new(),
            killed,
            limit: policy.limit,
            notice: None,
        });
    }

    let notice = keep_all_notice(&candidates, policy.limit);
    let picked = match policy.limit {
        RetentionLimit::ByCount(max_no) => select_by_count(&candidates, max_no),
        RetentionLimit::BySize(budget) => select_by_size(&candidates, budget),
    };

    let mut kept = Vec::with_capacity(picked.len());
    let mut picked = picked.into_iter().peekable();
    for (idx, record) in candidates.into_iter().enumerate() {
        if picked.next_if_eq(&idx).is_some() {
            kept.push(record);
        } else {
            killed.push(DoomedFile {
                record,
                reason: KillReason::Thinned,
            });
        }
    }

    info!(
        kept = kept.len(),
        killed = killed.len(),
        "We are keeping {} files and killing {} of them.",
        kept.len(),
        killed.len()
    );

    Ok(RetentionPlan {
        kept,
        killed,
        limit: policy.limit,
        notice,
    })
}
