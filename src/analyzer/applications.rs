//! Generated-Application status correlation.
//!
//! Two independent evidence sources are consulted for every ApplicationSet:
//! the `status.applicationStatus` summary the controller caches on the
//! parent, and the live Application objects matched by the controller's
//! ownership label. The summary can trail reality, so the two sources are
//! checked separately and never deduplicated against each other.

use serde_json::Value;

use crate::analyzer::document::{string_at, Document, Field};
use crate::analyzer::report::Finding;
use crate::kube::store::DocumentStore;
use crate::models::ArgoResourceKind;

/// Label the ApplicationSet controller stamps on every generated Application
pub const APPLICATION_SET_LABEL: &str = "argocd.argoproj.io/application-set-name";

/// Findings plus the live-list error that was swallowed, if any.
pub struct ApplicationFindings {
    pub findings: Vec<Finding>,
    pub suppressed_error: Option<String>,
}

/// Check the health of the Applications generated by one ApplicationSet.
pub async fn check_generated_applications<S: DocumentStore>(
    store: &S,
    document: &Document,
) -> ApplicationFindings {
    let mut findings = Vec::new();

    // Evidence source 1: the status summary cached on the ApplicationSet
    let summary = document
        .sequence(&["status", "applicationStatus"])
        .found()
        .unwrap_or(&[]);
    for entry in summary {
        let name = string_at(entry, &["application"]).found().unwrap_or("");
        let health = string_at(entry, &["health"]).found().unwrap_or("");
        let sync = string_at(entry, &["sync"]).found().unwrap_or("");
        let message = string_at(entry, &["message"]).found().unwrap_or("");

        if !health.is_empty() && health != "Healthy" {
            findings.push(Finding::new(format!(
                "Generated Application {} is not healthy (status: {}): {}",
                name, health, message
            )));
        }
        if !sync.is_empty() && sync != "Synced" {
            findings.push(Finding::new(format!(
                "Generated Application {} is not synced (status: {})",
                name, sync
            )));
        }
    }

    // Evidence source 2: the live Application objects, matched by label
    let selector = format!("{}={}", APPLICATION_SET_LABEL, document.name());
    let applications = match store
        .list_namespaced(ArgoResourceKind::Application, document.namespace(), &selector)
        .await
    {
        Ok(applications) => applications,
        Err(err) => {
            // The summary findings above still stand; a partial report beats
            // aborting the whole parent on a list failure.
            let suppressed = format!(
                "failed to list Applications for {}: {:#}",
                document.id(),
                err
            );
            tracing::warn!("{}", suppressed);
            return ApplicationFindings {
                findings,
                suppressed_error: Some(suppressed),
            };
        }
    };

    if applications.is_empty() && summary.is_empty() {
        findings.push(Finding::new(format!(
            "ApplicationSet {} has no generated applications",
            document.id()
        )));
    }

    for application in &applications {
        analyze_application(application, &mut findings);
    }

    ApplicationFindings {
        findings,
        suppressed_error: None,
    }
}

/// Health, sync and operation checks on one live Application.
fn analyze_application(application: &Value, findings: &mut Vec<Finding>) {
    let namespace = string_at(application, &["metadata", "namespace"])
        .found()
        .unwrap_or("");
    let name = string_at(application, &["metadata", "name"])
        .found()
        .unwrap_or("");

    if let Field::Found(health) = string_at(application, &["status", "health", "status"]) {
        if health != "Healthy" {
            let message = string_at(application, &["status", "health", "message"])
                .found()
                .unwrap_or("");
            findings.push(Finding::new(format!(
                "Application {}/{} is not healthy (status: {}): {}",
                namespace, name, health, message
            )));
        }
    }

    if let Field::Found(sync) = string_at(application, &["status", "sync", "status"]) {
        if sync != "Synced" {
            findings.push(Finding::new(format!(
                "Application {}/{} is not synced (status: {})",
                namespace, name, sync
            )));
        }
    }

    if let Field::Found(phase) = string_at(application, &["status", "operationState", "phase"]) {
        if phase == "Failed" {
            let message = string_at(application, &["status", "operationState", "message"])
                .found()
                .unwrap_or("");
            findings.push(Finding::new(format!(
                "Application {}/{} has failed operation: {}",
                namespace, name, message
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_application_reports_each_problem_independently() {
        let mut findings = Vec::new();
        analyze_application(
            &json!({
                "metadata": {"name": "test-app-dev", "namespace": "default"},
                "status": {
                    "health": {"status": "Degraded", "message": "Pod is failing"},
                    "sync": {"status": "OutOfSync"},
                    "operationState": {"phase": "Failed", "message": "Sync operation failed"},
                }
            }),
            &mut findings,
        );

        let texts: Vec<&str> = findings.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Application default/test-app-dev is not healthy (status: Degraded): Pod is failing",
                "Application default/test-app-dev is not synced (status: OutOfSync)",
                "Application default/test-app-dev has failed operation: Sync operation failed",
            ]
        );
    }

    #[test]
    fn test_analyze_application_without_status_is_silent() {
        let mut findings = Vec::new();
        analyze_application(
            &json!({"metadata": {"name": "fresh-app", "namespace": "default"}}),
            &mut findings,
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_analyze_application_ignores_successful_operations() {
        let mut findings = Vec::new();
        analyze_application(
            &json!({
                "metadata": {"name": "ok-app", "namespace": "default"},
                "status": {
                    "health": {"status": "Healthy"},
                    "sync": {"status": "Synced"},
                    "operationState": {"phase": "Succeeded"},
                }
            }),
            &mut findings,
        );
        assert!(findings.is_empty());
    }
}
