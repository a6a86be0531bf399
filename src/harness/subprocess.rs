//! Subject program invocation
//!
//! Spawn, feed the workload on stdin, capture stdout and stderr, block until
//! exit. No timeout: a hung subject hangs the caller.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::error::HarnessError;

/// Everything one invocation of the subject produced
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Spawn to reap, monotonic.
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Run `subject` with the contents of `input` on its stdin.
///
/// The input file is handed to the child as its stdin descriptor, so the
/// child drains it at its own pace while both output pipes are collected.
/// Opening the file happens before the clock starts.
pub fn run_subject(subject: &Path, input: &Path) -> Result<ExecutionResult, HarnessError> {
    let stdin = File::open(input)?;

    tracing::debug!(
        subject = %subject.display(),
        input = %input.display(),
        "Invoking subject program"
    );

    let start = Instant::now();
    let child = Command::new(subject)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HarnessError::Spawn {
            subject: subject.to_path_buf(),
            source,
        })?;
    let output = child.wait_with_output()?;
    let elapsed = start.elapsed();

    let result = ExecutionResult {
        stdout: output.stdout,
        stderr: output.stderr,
        exit_code: output.status.code(),
        elapsed,
    };

    tracing::debug!(
        exit_code = ?result.exit_code,
        stdout_bytes = result.stdout.len(),
        stderr_bytes = result.stderr.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "Subject program exited"
    );

    Ok(result)
}
