//! Finding and report types produced by the analyzer.

use serde::Serialize;

/// A single advisory diagnostic line.
///
/// Findings carry no severity or error code; a finding never aborts the run
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub text: String,
}

impl Finding {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Analysis output for one ApplicationSet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// "namespace/name" of the analyzed ApplicationSet
    pub resource_name: String,
    /// Informational status lines, independent of the findings
    pub details: Vec<String>,
    pub findings: Vec<Finding>,
}

/// Result of a whole analyzer run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Fixed identifier for this analyzer
    pub name: String,
    /// Newline-joined human-readable log
    pub details: String,
    pub findings: Vec<Finding>,
    /// False when an evidence source was skipped, e.g. an Application list
    /// that failed and was suppressed
    pub complete: bool,
    /// Suppressed fetch errors, surfaced for operators
    pub diagnostics: Vec<String>,
}
