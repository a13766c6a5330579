//! ApplicationSet condition evaluation.
//!
//! Scans `status.conditions` against the closed set of condition types the
//! ApplicationSet controller writes. Unrecognized types are ignored rather
//! than reported, so newer controllers do not break older analyzers.

use crate::analyzer::document::{string_at, Document, Field};
use crate::analyzer::report::Finding;

/// Condition types recognized on an ApplicationSet status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    ErrorOccurred,
    ParametersGenerated,
    ResourcesUpToDate,
    Progressing,
}

impl ConditionKind {
    /// Case-sensitive parse, `None` for unrecognized condition types
    pub fn parse_optional(s: &str) -> Option<Self> {
        match s {
            "ErrorOccurred" => Some(ConditionKind::ErrorOccurred),
            "ParametersGenerated" => Some(ConditionKind::ParametersGenerated),
            "ResourcesUpToDate" => Some(ConditionKind::ResourcesUpToDate),
            "Progressing" => Some(ConditionKind::Progressing),
            _ => None,
        }
    }
}

/// Report every condition that is in a state worth flagging.
///
/// One pass over the sequence, so findings keep the order the controller
/// wrote the conditions in. An absent or unreadable conditions field
/// produces no findings; missing conditions are not themselves an error.
pub fn check_conditions(document: &Document) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Field::Found(conditions) = document.sequence(&["status", "conditions"]) else {
        return findings;
    };

    let id = document.id();
    for condition in conditions {
        let cond_type = string_at(condition, &["type"]).found().unwrap_or("");
        let cond_status = string_at(condition, &["status"]).found().unwrap_or("");
        let cond_message = string_at(condition, &["message"]).found().unwrap_or("");

        let Some(kind) = ConditionKind::parse_optional(cond_type) else {
            continue;
        };

        let text = match (kind, cond_status) {
            (ConditionKind::ErrorOccurred, "True") => {
                format!("ApplicationSet {} has error condition: {}", id, cond_message)
            }
            (ConditionKind::ParametersGenerated, "False") => {
                format!(
                    "ApplicationSet {} failed to generate parameters: {}",
                    id, cond_message
                )
            }
            (ConditionKind::ResourcesUpToDate, "False") => {
                format!(
                    "ApplicationSet {} resources are not up to date: {}",
                    id, cond_message
                )
            }
            (ConditionKind::Progressing, "True") => {
                format!(
                    "ApplicationSet {} is in progressing state: {}",
                    id, cond_message
                )
            }
            _ => continue,
        };
        findings.push(Finding::new(text));
    }

    findings
}
