//! range_probe - Conformance & Performance Toolkit for Range-Query Programs
//!
//! Generates structured insert/range-query workloads and runs an external
//! subject program against them, either checking its output against a golden
//! file or timing it.
//!
//! ```text
//! ┌───────────┐    ┌──────────┐    ┌─────────┐    ┌──────────────┐
//! │ query_gen │───▶│ workload │───▶│ run_e2e │───▶│   subject    │
//! │ (n, mode) │    │  (file)  │    │ harness │◀───│ (black box)  │
//! └───────────┘    └──────────┘    └─────────┘    └──────────────┘
//!                                       │
//!                                       ▼
//!                              match / diff / timing
//! ```
//!
//! # Modules
//!
//! - [`core_types`] - Shared aliases and exit codes
//! - [`workload`] - Query stream generation and workload files
//! - [`harness`] - Compare/bench execution of the subject program
//! - [`render`] - Graphviz wrapper for diagram output
//! - [`config`] - YAML configuration
//! - [`logging`] - Tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod harness;
pub mod logging;
pub mod render;
pub mod workload;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use core_types::{ElementIndex, ExitCode};
pub use harness::{HarnessError, HarnessMode, HarnessReport, HarnessRequest, Outcome};
pub use render::RenderError;
pub use workload::{
    Command, ElementCount, GeneratorError, PairingMode, QueryStream, WorkloadSummary, generate,
    write_workload,
};
