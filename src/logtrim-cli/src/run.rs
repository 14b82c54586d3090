//! Run orchestration: validate, scan, plan, report, prune.

use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::time::SystemTime;
use tracing::info;

use logtrim_core::{Pruner, compile_pattern, scan_directory, select_retained};

use crate::args::Cli;
use crate::report::{JsonReport, write_dry_run, write_text_report};

impl Cli {
    /// Run a single retention pass.
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Run a single retention pass, writing reports to `out`.
    pub fn run_with_output(&self, out: &mut impl Write) -> Result<()> {
        let policy = self.retention_policy()?;
        let pattern = compile_pattern(&self.pattern)?;

        let records = scan_directory(&self.dir, &pattern, SystemTime::now())
            .with_context(|| format!("Failed to scan {}", self.dir.display()))?;
        info!(
            dir = %self.dir.display(),
            matched = records.len(),
            "Found matching files"
        );

        let plan = select_retained(records, &policy)?;

        if self.verbose && !self.json {
            write_text_report(out, &plan)?;
        }
        if self.dry_run && !self.json {
            write_dry_run(out, &plan)?;
        }

        let outcome = Pruner::new(&self.dir).dry_run(self.dry_run).execute(&plan);

        if self.json {
            let report = JsonReport {
                directory: &self.dir,
                pattern: &self.pattern,
                policy: &policy,
                kept_bytes: plan.kept_bytes(),
                killed_bytes: plan.killed_bytes(),
                plan: &plan,
                outcome: &outcome,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }

        if !outcome.is_success() {
            for failure in &outcome.errors {
                eprintln!("Failed to delete {}: {}", failure.name, failure.error);
            }
            bail!(
                "Failed to delete {} of {} files",
                outcome.errors.len(),
                plan.killed.len()
            );
        }

        Ok(())
    }
}
