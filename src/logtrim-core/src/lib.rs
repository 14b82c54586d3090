//! Logtrim core - logarithmic-spacing retention for rotated files.
//!
//! Given the files in a directory that match a pattern, decides which ones to
//! keep so that the survivors are spaced roughly geometrically in age: dense
//! among recent files, sparse among old ones. The number of survivors is
//! bounded either by a file count or by a total size budget, and files past
//! a maximum age can be dropped outright.
//!
//! # Pipeline
//!
//! 1. [`scan_directory`] collects [`FileRecord`]s (name, age, size)
//! 2. [`select_retained`] computes a [`RetentionPlan`] (pure, no I/O)
//! 3. [`Pruner`] deletes the kill set, or only reports it in a dry run
//!
//! # Example
//!
//! ```rust,no_run
//! use logtrim_core::{
//!     Pruner, RetentionLimit, RetentionPolicy, compile_pattern, scan_directory,
//!     select_retained,
//! };
//! use std::path::Path;
//! use std::time::SystemTime;
//!
//! # fn main() -> logtrim_core::Result<()> {
//! let dir = Path::new("/var/backups");
//! let pattern = compile_pattern(r"db-.*\.tar\.gz")?;
//! let records = scan_directory(dir, &pattern, SystemTime::now())?;
//!
//! let policy = RetentionPolicy::new(RetentionLimit::from_options(Some(10), None)?);
//! let plan = select_retained(records, &policy)?;
//!
//! let outcome = Pruner::new(dir).dry_run(true).execute(&plan);
//! println!("Would free {} bytes", outcome.bytes_freed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod plan;
pub mod pruner;
pub mod record;
pub mod scan;
pub mod selector;

pub use config::{
    AGE_UNITS, MIN_SELECTION_AGE_SECS, RetentionLimit, RetentionPolicy, SIZE_UNITS, format_size,
    parse_age, parse_size,
};
pub use error::{Result, TrimError};
pub use plan::{
    DoomedFile, KillReason, RetentionPlan, apply_equal_spacing, exclude, select_retained,
};
pub use pruner::{PruneFailure, PruneOutcome, Pruner};
pub use record::{FileRecord, sort_candidates, total_size};
pub use scan::{compile_pattern, scan_directory};
pub use selector::{keep_all_notice, keep_which_n, select_by_count, select_by_size};
