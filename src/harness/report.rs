//! Machine-readable summary of one harness run, written on request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{HarnessMode, HarnessReport, HarnessRequest, Outcome};
use crate::core_types::{ExitCode, VERSION};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub tool_version: String,
    pub started_at: DateTime<Utc>,
    pub mode: HarnessMode,
    pub subject: String,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub outcome: String,
    pub exit_code: ExitCode,
    pub elapsed_secs: f64,
    /// Changed lines when the outcome is a mismatch.
    #[serde(default)]
    pub diff_removed: usize,
    #[serde(default)]
    pub diff_added: usize,
}

impl RunReport {
    pub fn new(
        request: &HarnessRequest,
        report: &HarnessReport,
        started_at: DateTime<Utc>,
    ) -> Self {
        let (diff_removed, diff_added) = match &report.outcome {
            Outcome::Mismatched(diff) => (diff.removed_lines(), diff.added_lines()),
            _ => (0, 0),
        };

        Self {
            tool_version: VERSION.to_string(),
            started_at,
            mode: report.mode,
            subject: request.subject.display().to_string(),
            input: request.input.display().to_string(),
            expected: request
                .expected
                .as_ref()
                .filter(|_| request.mode == HarnessMode::Compare)
                .map(|p| p.display().to_string()),
            outcome: report.outcome.label().to_string(),
            exit_code: report.exit_code(),
            elapsed_secs: report.elapsed.as_secs_f64(),
            diff_removed,
            diff_added,
        }
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::other)
    }
}
