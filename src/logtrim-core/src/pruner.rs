//! Executes a retention plan against the filesystem.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::plan::RetentionPlan;

/// A deletion that did not go through.
#[derive(Debug, Clone, Serialize)]
pub struct PruneFailure {
    pub name: String,
    pub error: String,
}

/// Result of executing a plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneOutcome {
    /// Number of files deleted (or that would be, in a dry run).
    pub files_deleted: usize,
    /// Total bytes freed (or that would be, in a dry run).
    pub bytes_freed: u64,
    /// Whether the filesystem was left untouched.
    pub dry_run: bool,
    /// Per-file failures; the remaining files were still attempted.
    pub errors: Vec<PruneFailure>,
}

impl PruneOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Deletes the kill set of a [`RetentionPlan`].
pub struct Pruner {
    dir: PathBuf,
    dry_run: bool,
}

impl Pruner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Delete every file in the plan's kill set, best effort.
    pub fn execute(&self, plan: &RetentionPlan) -> PruneOutcome {
        let mut outcome = PruneOutcome {
            dry_run: self.dry_run,
            ..Default::default()
        };

        for doomed in &plan.killed {
            let path = self.dir.join(&doomed.record.name);

            if self.dry_run {
                debug!(path = %path.display(), reason = ?doomed.reason, "Would delete");
                outcome.files_deleted += 1;
                outcome.bytes_freed += doomed.record.size;
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), reason = ?doomed.reason, "Deleted file");
                    outcome.files_deleted += 1;
                    outcome.bytes_freed += doomed.record.size;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to delete file");
                    outcome.errors.push(PruneFailure {
                        name: doomed.record.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            files_deleted = outcome.files_deleted,
            bytes_freed = outcome.bytes_freed,
            failures = outcome.errors.len(),
            dry_run = self.dry_run,
            "Pruning completed"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetentionLimit;
    use crate::plan::{DoomedFile, KillReason};
    use crate::record::FileRecord;
    use std::path::Path;
    use tempfile::TempDir;

    fn plan_for(dir: &Path, keep: &[&str], kill: &[&str]) -> RetentionPlan {
        let mut plan = RetentionPlan {
            kept: Vec::new(),
            killed: Vec::new(),
            limit: RetentionLimit::BySize(1_024),
            notice: None,
        };
        for name in keep {
            fs::write(dir.join(name), "keep").unwrap();
            plan.kept.push(FileRecord::new(*name, 1.0, 4));
        }
        for name in kill {
            fs::write(dir.join(name), "kill").unwrap();
            plan.killed.push(DoomedFile {
                record: FileRecord::new(*name, 2.0, 4),
                reason: KillReason::Thinned,
            });
        }
        plan
    }

    #[test]
    fn test_execute_deletes_kill_set_only() {
        let temp = TempDir::new().unwrap();
        let plan = plan_for(temp.path(), &["a.log"], &["b.log", "c.log"]);

        let outcome = Pruner::new(temp.path()).execute(&plan);

        assert!(outcome.is_success());
        assert_eq!(outcome.files_deleted, 2);
        assert_eq!(outcome.bytes_freed, 8);
        assert!(temp.path().join("a.log").exists());
        assert!(!temp.path().join("b.log").exists());
        assert!(!temp.path().join("c.log").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let plan = plan_for(temp.path(), &["a.log"], &["b.log"]);

        let outcome = Pruner::new(temp.path()).dry_run(true).execute(&plan);

        assert!(outcome.dry_run);
        assert_eq!(outcome.files_deleted, 1);
        assert!(temp.path().join("b.log").exists());
    }

    #[test]
    fn test_failures_are_collected_and_rest_attempted() {
        let temp = TempDir::new().unwrap();
        let plan = plan_for(temp.path(), &[], &["gone.log", "here.log"]);
        fs::remove_file(temp.path().join("gone.log")).unwrap();

        let outcome = Pruner::new(temp.path()).execute(&plan);

        assert!(!outcome.is_success());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].name, "gone.log");
        assert_eq!(outcome.files_deleted, 1);
        assert!(!temp.path().join("here.log").exists());
    }
}
