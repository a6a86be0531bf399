//! Workload file output
//!
//! One command per line, each terminated by `\n`. No header, no separators
//! between the insert block and the query block.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::query_generator::{ElementCount, PairingMode, QueryStream};

/// What was written, for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSummary {
    pub element_count: ElementCount,
    pub mode: PairingMode,
    pub total_lines: u64,
    pub path: PathBuf,
}

impl fmt::Display for WorkloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[query_gen] Elements: {}", self.element_count)?;
        writeln!(f, "[query_gen] Mode: {} pairs", self.mode)?;
        writeln!(f, "[query_gen] Total lines: {}", self.total_lines)?;
        write!(f, "[query_gen] Output file: {}", self.path.display())
    }
}

/// Stream `stream` into `path`, creating or truncating it.
///
/// A failed write may leave a partial file behind.
pub fn write_workload(path: &Path, stream: QueryStream) -> io::Result<WorkloadSummary> {
    let element_count = stream.element_count();
    let mode = stream.mode();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut total_lines = 0u64;

    for cmd in stream {
        writeln!(writer, "{}", cmd)?;
        total_lines += 1;
    }
    writer.flush()?;

    let summary = WorkloadSummary {
        element_count,
        mode,
        total_lines,
        path: path.to_path_buf(),
    };

    tracing::info!(
        elements = element_count.get(),
        mode = %mode,
        total_lines,
        path = %path.display(),
        "Workload written"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::generate;

    #[test]
    fn test_write_workload_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        std::fs::write(&path, "stale contents\nfrom an earlier run\n").unwrap();

        let summary = write_workload(
            &path,
            generate(ElementCount::new(2), PairingMode::Unordered),
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "k 0\nk 1\nq 0 1\n");
        assert_eq!(summary.total_lines, 3);
        assert_eq!(summary.mode, PairingMode::Unordered);
    }

    #[test]
    fn test_write_empty_workload_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");

        let summary =
            write_workload(&path, generate(ElementCount::new(0), PairingMode::Ordered)).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert_eq!(summary.total_lines, 0);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("queries.txt");

        let err = write_workload(&path, generate(ElementCount::new(3), PairingMode::Unordered))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_summary_display() {
        let summary = WorkloadSummary {
            element_count: ElementCount::new(3),
            mode: PairingMode::Ordered,
            total_lines: 9,
            path: PathBuf::from("out/q.txt"),
        };
        assert_eq!(
            summary.to_string(),
            "[query_gen] Elements: 3\n\
             [query_gen] Mode: ordered pairs\n\
             [query_gen] Total lines: 9\n\
             [query_gen] Output file: out/q.txt"
        );
    }
}
