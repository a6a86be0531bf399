//! Golden output verification
//!
//! The subject's captured stdout must equal the expected file byte for byte.
//! No whitespace normalization is applied.

use std::path::Path;

use super::unified_diff::UnifiedDiff;

/// Outcome of checking captured output against the golden file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    Match,
    Mismatch(UnifiedDiff),
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonResult::Match)
    }
}

/// Compare `actual` against `expected`.
pub fn compare_outputs(expected: &[u8], actual: &[u8], context: usize) -> ComparisonResult {
    if expected == actual {
        return ComparisonResult::Match;
    }

    let expected = String::from_utf8_lossy(expected);
    let actual = String::from_utf8_lossy(actual);
    ComparisonResult::Mismatch(UnifiedDiff::compute(&expected, &actual, context))
}

/// Load the golden output file.
pub fn load_expected(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}
