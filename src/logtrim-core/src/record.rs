//! File records collected from the target directory.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single file considered for retention.
///
/// Ages are measured in seconds before the moment the directory was scanned,
/// so a smaller age means a more recently modified file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name relative to the scanned directory.
    pub name: String,
    /// Seconds since last modification, never negative.
    pub age_secs: f64,
    /// Size in bytes.
    pub size: u64,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, age_secs: f64, size: u64) -> Self {
        Self {
            name: name.into(),
            age_secs: age_secs.max(0.0),
            size,
        }
    }

    /// Candidate ordering: age, then size, then name.
    pub fn candidate_cmp(&self, other: &Self) -> Ordering {
        self.age_secs
            .total_cmp(&other.age_secs)
            .then(self.size.cmp(&other.size))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Sort records into candidate order (ascending age).
pub fn sort_candidates(records: &mut [FileRecord]) {
    records.sort_by(FileRecord::candidate_cmp);
}

/// Total size in bytes of a set of records.
pub fn total_size(records: &[FileRecord]) -> u64 {
    records.iter().map(|r| r.size).sum()
}
