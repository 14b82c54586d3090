//! Directory scanning.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use crate::error::{Result, TrimError};
use crate::record::{FileRecord, sort_candidates};

/// Compile a file name pattern that must match from the start of the name.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{pattern})"))?)
}

/// Collect every regular file directly inside `dir` whose name matches
/// `pattern`, with ages measured relative to `now`.
///
/// Files with a modification time in the future get age zero. The result is
/// in candidate order. Fails with [`TrimError::EmptyCandidateSet`] when
/// nothing matches.
pub fn scan_directory(dir: &Path, pattern: &Regex, now: SystemTime) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();

    for entry in fs::read_dir(dir)?.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!(name = ?file_name, "Skipping non UTF-8 file name");
            continue;
        };
        if !pattern.is_match(name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(name, error = %e, "Could not stat file; skipping");
                continue;
            }
        };
        let modified = metadata.modified()?;
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);

        records.push(FileRecord::new(name, age.as_secs_f64(), metadata.len()));
    }

    if records.is_empty() {
        return Err(TrimError::EmptyCandidateSet {
            dir: dir.to_path_buf(),
        });
    }

    sort_candidates(&mut records);
    debug!(dir = %dir.display(), matched = records.len(), "Scanned directory");
    Ok(records)
}
