//! Retention selector.
//!
//! Picks which candidates survive so that their ages are roughly
//! logarithmically spaced: many recent files, few old ones. All functions
//! take candidates in ascending age order (see [`crate::sort_candidates`]) and
//! return positions into that slice, ascending.

use std::num::NonZeroUsize;
use tracing::{debug, info};

use crate::config::{MIN_SELECTION_AGE_SECS, RetentionLimit, format_size};
use crate::record::{FileRecord, total_size};

/// Age used for spacing decisions, floored so the geometric ratio stays finite.
fn selection_age(record: &FileRecord) -> f64 {
    record.age_secs.max(MIN_SELECTION_AGE_SECS)
}

/// Choose `n` records whose ages approximate a geometric progression.
///
/// The youngest and the oldest record are always kept (for `n >= 2`). The scan
/// walks left to right once; a record is taken when its age reaches the
/// current target, or when the remaining records are exactly enough to fill
/// the quota. Earlier records therefore win ties.
///
/// Returns every position when `n` is at least the number of records.
pub fn keep_which_n(records: &[FileRecord], n: usize) -> Vec<usize> {
    let len = records.len();
    if n >= len {
        return (0..len).collect();
    }
    if n == 0 {
        return Vec::new();
    }

    let first = selection_age(&records[0]);
    let last = selection_age(&records[len - 1]);
    let ratio = last / first;
    let efac = if n == 1 {
        ratio
    } else {
        ratio.powf(1.0 / (n - 1) as f64)
    };

    let mut keep = Vec::with_capacity(n);
    let mut target = first;
    for (idx, record) in records.iter().enumerate() {
        if keep.len() == n {
            break;
        }
        let remaining = len - idx;
        let still_needed = n - keep.len();
        if selection_age(record) >= target || remaining == still_needed {
            keep.push(idx);
            target *= efac;
        }
    }

    keep
}

/// Message explaining why `limit` leaves `records` untouched, if it does.
pub fn keep_all_notice(records: &[FileRecord], limit: RetentionLimit) -> Option<String> {
    match limit {
        RetentionLimit::ByCount(max_no) if records.len() <= max_no.get() => Some(format!(
            "Keeping {} files and found only {}. Hence keeping them all.",
            max_no,
            records.len()
        )),
        RetentionLimit::BySize(budget) => {
            let total = total_size(records);
            (total <= budget).then(|| {
                format!(
                    "Max size is {} and files only take up {}. Hence keeping them all.",
                    format_size(budget),
                    format_size(total)
                )
            })
        }
        RetentionLimit::ByCount(_) => None,
    }
}

/// Keep at most `max_no` candidates.
pub fn select_by_count(records: &[FileRecord], max_no: NonZeroUsize) -> Vec<usize> {
    if let Some(notice) = keep_all_notice(records, RetentionLimit::ByCount(max_no)) {
        info!("{notice}");
        return (0..records.len()).collect();
    }
    keep_which_n(records, max_no.get())
}

/// Keep the largest thinned set whose combined size fits in `budget` bytes.
///
/// Tries `n = 1, 2, ...` and stops at the first count that overflows the
/// budget, returning the previous selection. If even a single file does not
/// fit, nothing is kept.
pub fn select_by_size(records: &[FileRecord], budget: u64) -> Vec<usize> {
    if let Some(notice) = keep_all_notice(records, RetentionLimit::BySize(budget)) {
        info!("{notice}");
        return (0..records.len()).collect();
    }

    let mut best = Vec::new();
    for n in 1..records.len() {
        let picked = keep_which_n(records, n);
        let size: u64 = picked.iter().map(|&idx| records[idx].size).sum();
        debug!(n, size_bytes = size, "For n={} size is {}", n, format_size(size));
        if size > budget {
            break;
        }
        best = picked;
    }

    best
}
