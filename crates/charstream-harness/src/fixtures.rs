//! Fixture loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Operation under test: `format_int`, `parse_int`, `format_float`,
    /// `parse_float`, `format_bool`, or `parse_bool`.
    pub operation: String,
    /// Operation inputs (value, flag names, width, fill, precision).
    pub inputs: serde_json::Value,
    /// Expected rendered text (format ops) or canonical value plus
    /// condition bits (parse ops), as a string for comparison.
    pub expected: String,
}

/// A collection of fixture cases for one area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Area name, e.g. `numeric-format`.
    pub area: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| HarnessError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The fixture set built into the harness, used when no file is given.
pub fn builtin_set() -> FixtureSet {
    let json = include_str!("../fixtures/numeric.json");
    // The embedded set is part of the crate; a parse failure is a build
    // defect, surfaced loudly.
    match FixtureSet::from_json(json) {
        Ok(set) => set,
        Err(e) => FixtureSet {
            version: "1".into(),
            area: format!("builtin-broken: {e}"),
            cases: Vec::new(),
        },
    }
}
