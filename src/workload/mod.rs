//! Workload Generation Module
//!
//! # Components
//!
//! - [`query_generator`] - Deterministic insert/range-query stream
//! - [`writer`] - Workload file output and run summary

pub mod query_generator;
pub mod writer;

pub use query_generator::{
    Command, ElementCount, GeneratorError, ParseCommandError, PairingMode, Phase, QueryStream,
    generate, range_query_count,
};
pub use writer::{WorkloadSummary, write_workload};
