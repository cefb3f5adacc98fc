//! Verification report generation.
//!
//! Aggregates executed case results into a machine-readable payload and
//! renders it as plain text or markdown.

use serde::{Deserialize, Serialize};

use crate::runner::CaseResult;

/// Summary counters over one verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub pass_rate_percent: f64,
}

/// One rendered case row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub case_name: String,
    pub status: String,
    pub expected: String,
    pub actual: String,
}

/// Top-level verification report payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub schema_version: String,
    pub area: String,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
}

impl VerifyReport {
    /// Returns true when every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Build a report from executed case results.
#[must_use]
pub fn build_report(area: &str, results: &[CaseResult]) -> VerifyReport {
    let total = results.len() as u64;
    let passed = results.iter().filter(|r| r.passed).count() as u64;
    let failed = total - passed;
    let pass_rate_percent = if total == 0 {
        100.0
    } else {
        (passed as f64 / total as f64) * 100.0
    };
    let rows = results
        .iter()
        .map(|r| ReportRow {
            case_name: r.name.clone(),
            status: if r.passed { "pass" } else { "fail" }.to_string(),
            expected: r.expected.clone(),
            actual: r.actual.clone(),
        })
        .collect();
    VerifyReport {
        schema_version: "1".to_string(),
        area: area.to_string(),
        summary: ReportSummary {
            total,
            passed,
            failed,
            pass_rate_percent,
        },
        rows,
    }
}

/// Render the report as markdown with a per-case table.
#[must_use]
pub fn render_markdown(report: &VerifyReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Stream conformance report: {}\n\n", report.area));
    out.push_str(&format!(
        "- Total: {}\n- Passed: {}\n- Failed: {}\n- Pass rate: {:.1}%\n\n",
        report.summary.total,
        report.summary.passed,
        report.summary.failed,
        report.summary.pass_rate_percent,
    ));
    out.push_str("| Case | Status | Expected | Actual |\n");
    out.push_str("|------|--------|----------|--------|\n");
    for row in &report.rows {
        out.push_str(&format!(
            "| {} | {} | `{}` | `{}` |\n",
            row.case_name, row.status, row.expected, row.actual
        ));
    }
    out
}

/// Render the report as terminal-friendly plain text, listing failures
/// in full and passes by name only.
#[must_use]
pub fn render_plain(report: &VerifyReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}/{} passed ({:.1}%)\n",
        report.area, report.summary.passed, report.summary.total, report.summary.pass_rate_percent,
    ));
    for row in &report.rows {
        if row.status == "pass" {
            out.push_str(&format!("  pass {}\n", row.case_name));
        } else {
            out.push_str(&format!(
                "  FAIL {}\n       expected: {}\n       actual:   {}\n",
                row.case_name, row.expected, row.actual
            ));
        }
    }
    out
}
