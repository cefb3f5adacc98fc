//! # charstream-harness
//!
//! Fixture-driven conformance checks for the charstream stack. Fixture
//! sets are JSON files describing formatting and parsing cases; the
//! runner executes each case against `charstream-core` and the report
//! module renders the results.

pub mod fixtures;
pub mod report;
pub mod runner;

pub use fixtures::{FixtureCase, FixtureSet};
pub use runner::{CaseResult, run_set};

use std::path::PathBuf;

/// Harness-level failures (fixture execution mismatches are results,
/// not errors).
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fixture file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fixture case {name}: unknown operation {operation}")]
    UnknownOperation { name: String, operation: String },
    #[error("fixture case {name}: malformed inputs: {detail}")]
    BadInputs { name: String, detail: String },
}
