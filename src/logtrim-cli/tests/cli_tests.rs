//! End-to-end tests for the logtrim binary.

use std::fs::{self, File, FileTimes};
use std::path::Path;
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn write_aged(dir: &Path, name: &str, bytes: usize, age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; bytes]).unwrap();
    let modified = SystemTime::now() - Duration::from_secs(age_secs);
    let file = File::options().write(true).open(&path).unwrap();
    file.set_times(FileTimes::new().set_modified(modified))
        .unwrap();
}

/// Four 100-byte backups aged 10, 20, 30 and 40 minutes.
fn four_backups() -> TempDir {
    let temp = TempDir::new().unwrap();
    for (i, name) in ["backup-a", "backup-b", "backup-c", "backup-d"]
        .iter()
        .enumerate()
    {
        write_aged(temp.path(), name, 100, (i as u64 + 1) * 600);
    }
    fs::write(temp.path().join("README"), "not a backup").unwrap();
    temp
}

fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn logtrim() -> Command {
    let mut cmd = Command::cargo_bin("logtrim").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("LOGTRIM_LOG_LEVEL");
    cmd
}

// ============================================================================
// Argument validation
// ============================================================================

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_neither_limit_fails() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Must use only one of max_no or max_size"));
        assert_eq!(remaining(temp.path()).len(), 5);
    }

    #[test]
    fn test_both_limits_fail() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--max-size", "1K"])
            .assert()
            .code(1);
        assert_eq!(remaining(temp.path()).len(), 5);
    }

    #[test]
    fn test_bad_age_unit_fails() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--max-age", "10w"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid quantity"));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let temp = four_backups();
        logtrim()
            .args(["backup-("])
            .arg(temp.path())
            .args(["--max-no", "2"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid pattern"));
        assert_eq!(remaining(temp.path()).len(), 5);
    }

    #[test]
    fn test_no_matching_files_fails() {
        let temp = four_backups();
        logtrim()
            .args(["nothing-"])
            .arg(temp.path())
            .args(["--max-no", "2"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No files found"));
        assert_eq!(remaining(temp.path()).len(), 5);
    }
}

// ============================================================================
// Retention
// ============================================================================

mod retention {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_max_no_keeps_ends() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2"])
            .assert()
            .success();
        assert_eq!(remaining(temp.path()), vec!["README", "backup-a", "backup-d"]);
    }

    #[test]
    fn test_max_size_budget() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-size", "250B"])
            .assert()
            .success();
        assert_eq!(remaining(temp.path()), vec!["README", "backup-a", "backup-d"]);
    }

    #[test]
    fn test_max_age_removes_old_files() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "10", "--max-age", "25m"])
            .assert()
            .success();
        assert_eq!(remaining(temp.path()), vec!["README", "backup-a", "backup-b"]);
    }

    #[test]
    fn test_refuses_to_delete_everything() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--max-age", "1m"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No valid set of files to keep found"));
        assert_eq!(remaining(temp.path()).len(), 5);
    }

    #[test]
    fn test_allow_delete_all() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--max-age", "1m", "--allow-delete-all"])
            .assert()
            .success();
        assert_eq!(remaining(temp.path()), vec!["README"]);
    }
}

// ============================================================================
// Reporting
// ============================================================================

mod reporting {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dry_run_deletes_nothing() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("would delete backup-b"))
            .stdout(predicate::str::contains("would delete backup-c"))
            .stdout(predicate::str::contains("would delete backup-a").not());
        assert_eq!(remaining(temp.path()).len(), 5);
    }

    #[test]
    fn test_verbose_report() {
        let temp = four_backups();
        logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "2", "--dry-run", "--verbose"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "We are keeping 2 files and killing 2 of them.",
            ))
            .stdout(predicate::str::contains(
                "backup-a last modified 10 minutes ago with size 100B is being kept",
            ))
            .stdout(predicate::str::contains(
                "backup-c last modified 30 minutes ago with size 100B is being killed",
            ));
    }

    #[test]
    fn test_json_output() {
        let temp = four_backups();
        let output = logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "3", "--dry-run", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let kept: Vec<&str> = report["plan"]["kept"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(kept.len(), 3);
        assert_eq!(kept.first(), Some(&"backup-a"));
        assert_eq!(kept.last(), Some(&"backup-d"));
        assert_eq!(report["plan"]["killed"][0]["reason"], "thinned");
        assert_eq!(report["policy"]["limit"]["mode"], "by_count");
        assert_eq!(report["outcome"]["dry_run"], true);
        assert_eq!(report["outcome"]["files_deleted"], 1);
        assert_eq!(report["killed_bytes"], 100);
    }

    #[test]
    fn test_json_reports_keep_all_notice() {
        let temp = four_backups();
        let output = logtrim()
            .args(["backup-"])
            .arg(temp.path())
            .args(["--max-no", "10", "--dry-run", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            report["plan"]["notice"],
            "Keeping 10 files and found only 4. Hence keeping them all."
        );
        assert_eq!(report["plan"]["limit"]["value"], 10);
    }
}
