//! End-to-End Test Harness
//!
//! Runs a subject program once against a workload and either checks its
//! output against a golden file (compare) or only times it (bench).
//!
//! ```text
//! INIT ─▶ VALIDATE_INPUTS ──────────────▶ FAIL (missing file / argument)
//!               │
//!               ▼
//!         INVOKE_SUBPROCESS ────────────▶ FAIL (non-zero exit)
//!               │
//!               ▼
//!        COMPARE | SKIP-COMPARE ─▶ SUCCESS | FAIL (mismatch)
//! ```
//!
//! # Components
//!
//! - [`subprocess`] - Blocking, timed invocation of the subject
//! - [`compare`] - Exact golden-output check
//! - [`unified_diff`] - Line diff shown on mismatch
//! - [`report`] - Optional JSON run report
//! - [`error`] - Failures that abort a run

pub mod compare;
pub mod error;
pub mod report;
pub mod subprocess;
pub mod unified_diff;

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::HarnessSettings;
use crate::core_types::{EXIT_FAILURE, EXIT_OK, ExitCode};

pub use compare::{ComparisonResult, compare_outputs};
pub use error::HarnessError;
pub use report::RunReport;
pub use subprocess::{ExecutionResult, run_subject};
pub use unified_diff::UnifiedDiff;

/// What the harness does with the subject's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HarnessMode {
    /// Check output against an expected file
    Compare,
    /// Only measure elapsed time
    Bench,
}

impl HarnessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HarnessMode::Compare => "compare",
            HarnessMode::Bench => "bench",
        }
    }
}

impl fmt::Display for HarnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One harness invocation
#[derive(Debug, Clone)]
pub struct HarnessRequest {
    pub mode: HarnessMode,
    pub subject: PathBuf,
    pub input: PathBuf,
    /// Golden output; required in compare mode, ignored in bench mode.
    pub expected: Option<PathBuf>,
}

impl HarnessRequest {
    /// Check preconditions without touching the subject program.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.mode == HarnessMode::Compare && self.expected.is_none() {
            return Err(HarnessError::MissingArgument("expected file", "compare"));
        }
        if !self.input.exists() {
            return Err(HarnessError::MissingFile {
                what: "input",
                path: self.input.clone(),
            });
        }
        if self.mode == HarnessMode::Compare {
            if let Some(expected) = self.expected.as_ref().filter(|p| !p.exists()) {
                return Err(HarnessError::MissingFile {
                    what: "expected",
                    path: expected.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Terminal state of a run that reached the subject program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Mismatched(UnifiedDiff),
    Benchmarked,
    SubjectFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Matched => "match",
            Outcome::Mismatched(_) => "mismatch",
            Outcome::Benchmarked => "bench",
            Outcome::SubjectFailed { .. } => "subject_failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessReport {
    pub mode: HarnessMode,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl HarnessReport {
    /// Process exit code for this outcome.
    ///
    /// A failed subject propagates its own code; a failed subject that claims
    /// `0`, or was killed by a signal, maps to `1`.
    pub fn exit_code(&self) -> ExitCode {
        match &self.outcome {
            Outcome::Matched | Outcome::Benchmarked => EXIT_OK,
            Outcome::Mismatched(_) => EXIT_FAILURE,
            Outcome::SubjectFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => EXIT_FAILURE,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == EXIT_OK
    }

    /// Human-readable rendering: results on `out`, subject diagnostics on `err`.
    pub fn write_to(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        let secs = self.elapsed.as_secs_f64();
        match &self.outcome {
            Outcome::Matched => writeln!(out, "[OK] output matches. elapsed: {:.6} s", secs),
            Outcome::Mismatched(diff) => {
                writeln!(out, "Output differs!\n")?;
                if diff.is_empty() {
                    writeln!(out, "(outputs differ only in line terminators)")?;
                } else {
                    writeln!(out, "{}", diff)?;
                }
                writeln!(out, "\n[INFO] elapsed: {:.6} s", secs)
            }
            Outcome::Benchmarked => writeln!(out, "[BENCH] elapsed: {:.6} s", secs),
            Outcome::SubjectFailed { exit_code, stderr } => {
                match exit_code {
                    Some(code) => writeln!(err, "[ERROR] program exited with code {}", code)?,
                    None => writeln!(err, "[ERROR] program was terminated by a signal")?,
                }
                writeln!(err, "{}", stderr)
            }
        }
    }
}

/// Drive one run through the state machine.
pub fn run(
    request: &HarnessRequest,
    settings: &HarnessSettings,
) -> Result<HarnessReport, HarnessError> {
    tracing::debug!(mode = %request.mode, "Validating inputs");
    request.validate()?;

    let expected = match (request.mode, &request.expected) {
        (HarnessMode::Compare, Some(path)) => Some(compare::load_expected(path)?),
        _ => None,
    };

    tracing::debug!(subject = %request.subject.display(), "Invoking subprocess");
    let execution = run_subject(&request.subject, &request.input)?;
    let elapsed = execution.elapsed;

    if !execution.success() {
        tracing::warn!(
            exit_code = ?execution.exit_code,
            elapsed_us = elapsed.as_micros() as u64,
            "Subject program failed"
        );
        return Ok(HarnessReport {
            mode: request.mode,
            outcome: Outcome::SubjectFailed {
                exit_code: execution.exit_code,
                stderr: execution.stderr_lossy(),
            },
            elapsed,
        });
    }

    let outcome = match expected {
        Some(expected) => {
            match compare_outputs(&expected, &execution.stdout, settings.diff_context) {
                ComparisonResult::Match => Outcome::Matched,
                ComparisonResult::Mismatch(diff) => Outcome::Mismatched(diff),
            }
        }
        None => Outcome::Benchmarked,
    };

    match &outcome {
        Outcome::Mismatched(diff) => tracing::warn!(
            removed = diff.removed_lines(),
            added = diff.added_lines(),
            hunks = diff.hunks.len(),
            "Output mismatch"
        ),
        _ => tracing::info!(
            mode = %request.mode,
            outcome = outcome.label(),
            elapsed_us = elapsed.as_micros() as u64,
            "Harness run finished"
        ),
    }

    Ok(HarnessReport {
        mode: request.mode,
        outcome,
        elapsed,
    })
}
