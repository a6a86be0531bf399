use std::path::PathBuf;
use thiserror::Error;

use crate::core_types::{EXIT_FAILURE, EXIT_MISSING, ExitCode};

/// Failures that stop a harness run before an outcome exists.
///
/// A subject that exits non-zero is not an error here; it is an
/// [`Outcome`](super::Outcome) carrying the subject's diagnostics.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{what} file not found: {}", .path.display())]
    MissingFile { what: &'static str, path: PathBuf },

    #[error("{0} is required in {1} mode")]
    MissingArgument(&'static str, &'static str),

    #[error("Failed to start subject program {}: {source}", .subject.display())]
    Spawn {
        subject: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            HarnessError::MissingFile { .. } | HarnessError::MissingArgument(..) => EXIT_MISSING,
            HarnessError::Spawn { .. } | HarnessError::Io(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = HarnessError::MissingFile {
            what: "input",
            path: PathBuf::from("in.txt"),
        };
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(missing.to_string(), "input file not found: in.txt");

        let arg = HarnessError::MissingArgument("expected file", "compare");
        assert_eq!(arg.exit_code(), 2);
        assert_eq!(arg.to_string(), "expected file is required in compare mode");

        let spawn = HarnessError::Spawn {
            subject: PathBuf::from("./rb_tree"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(spawn.exit_code(), 1);
    }
}
