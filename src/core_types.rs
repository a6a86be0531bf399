//! Core types used throughout the toolkit
//!
//! Fundamental aliases and constants shared by the generator and the harness.

/// Element index - identifies the i-th inserted value.
///
/// # Constraints:
/// - **Self-valued**: the element inserted at index `i` has value `i`
/// - **Dense**: a workload of `n` elements uses exactly `0..n`
pub type ElementIndex = u64;

/// Process exit code, as handed to `std::process::exit`.
pub type ExitCode = i32;

/// Exit code for success.
pub const EXIT_OK: ExitCode = 0;

/// Exit code for an output mismatch or an unexpected failure.
pub const EXIT_FAILURE: ExitCode = 1;

/// Exit code for a missing file, a missing required argument, or a missing tool.
pub const EXIT_MISSING: ExitCode = 2;

/// Version string reported by every binary: `<pkg version> (<git hash>)`.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("RANGE_PROBE_GIT_HASH"),
    ")"
);
