//! Diagnostic rule engine for Argo CD ApplicationSets.
//!
//! One run lists every ApplicationSet through the injected document store,
//! evaluates condition, generator and generated-application rules for each,
//! and assembles the findings into a single ordered result. The engine
//! never mutates a resource and holds no state between runs; a run is a
//! pure function of the documents the store returns.

pub mod applications;
pub mod conditions;
pub mod document;
pub mod generators;
pub mod report;

use futures::StreamExt;
use serde_json::Value;

use crate::kube::store::DocumentStore;
use crate::models::ArgoResourceKind;
use applications::check_generated_applications;
use conditions::check_conditions;
use document::{string_at, Document, Field};
use generators::check_generators;
use report::{Finding, Report, RunResult};

pub use applications::APPLICATION_SET_LABEL;

/// Identifier reported on every run result
pub const ANALYZER_NAME: &str = "applicationset-analyzer";

const DEFAULT_CONCURRENCY: usize = 4;

/// Errors that abort a whole run.
///
/// Everything else the analyzer encounters is reported as an advisory
/// finding instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("failed to list ApplicationSets: {0:#}")]
    ListApplicationSets(#[source] anyhow::Error),
}

/// ApplicationSet analyzer over an injected document store.
///
/// The store is the only collaborator; handing in an in-memory store gives
/// a fully offline analyzer for tests.
pub struct Analyzer<S> {
    store: S,
    concurrency: usize,
}

impl<S: DocumentStore> Analyzer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bound the number of ApplicationSets analyzed in parallel.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Analyze every ApplicationSet in the cluster.
    ///
    /// Only a failure to enumerate ApplicationSets aborts the run. Reports
    /// keep the order the documents were listed in regardless of analysis
    /// concurrency, so two runs over the same snapshot produce identical
    /// output.
    pub async fn run(&self) -> Result<RunResult, AnalyzerError> {
        let documents = self
            .store
            .list_all(ArgoResourceKind::ApplicationSet)
            .await
            .map_err(AnalyzerError::ListApplicationSets)?;

        if documents.is_empty() {
            return Ok(RunResult {
                name: ANALYZER_NAME.to_string(),
                details: "No ApplicationSets found in the cluster".to_string(),
                findings: Vec::new(),
                complete: true,
                diagnostics: Vec::new(),
            });
        }

        let mut details = vec![format!(
            "Found {} ApplicationSet(s) in the cluster",
            documents.len()
        )];

        let reports: Vec<(Report, Option<String>)> = futures::stream::iter(
            documents
                .into_iter()
                .map(|document| self.analyze_application_set(document)),
        )
        .buffered(self.concurrency)
        .collect()
        .await;

        let mut findings = Vec::new();
        let mut diagnostics = Vec::new();
        for (report, suppressed_error) in reports {
            details.push(format!("ApplicationSet: {}", report.resource_name));
            for line in &report.details {
                details.push(format!("  {}", line));
            }
            findings.extend(report.findings);
            diagnostics.extend(suppressed_error);
        }

        Ok(RunResult {
            name: ANALYZER_NAME.to_string(),
            details: details.join("\n"),
            complete: diagnostics.is_empty(),
            findings,
            diagnostics,
        })
    }

    /// Analyze one ApplicationSet document.
    ///
    /// Rule stages run in a fixed order: conditions, then generators, then
    /// generated applications. A document that cannot be treated as a
    /// resource yields a single decode finding instead of failing the run.
    async fn analyze_application_set(&self, value: Value) -> (Report, Option<String>) {
        let document = match Document::try_new(value) {
            Ok(document) => document,
            Err(err) => {
                let report = Report {
                    resource_name: err.id.clone(),
                    details: Vec::new(),
                    findings: vec![Finding::new(format!(
                        "ApplicationSet {} could not be decoded: {}",
                        err.id, err
                    ))],
                };
                return (report, None);
            }
        };

        tracing::debug!("analyzing ApplicationSet {}", document.id());

        let mut findings = check_conditions(&document);
        findings.extend(check_generators(&document));

        let applications = check_generated_applications(&self.store, &document).await;
        findings.extend(applications.findings);

        let report = Report {
            resource_name: document.id(),
            details: status_details(&document),
            findings,
        };
        (report, applications.suppressed_error)
    }
}

/// Informational status lines for one ApplicationSet.
///
/// These feed the details log only; they are never findings.
fn status_details(document: &Document) -> Vec<String> {
    let mut lines = Vec::new();

    if let Field::Found(conditions) = document.sequence(&["status", "conditions"]) {
        for condition in conditions {
            if !condition.is_object() {
                continue;
            }
            let cond_type = string_at(condition, &["type"]).found().unwrap_or("");
            let cond_status = string_at(condition, &["status"]).found().unwrap_or("");
            let cond_message = string_at(condition, &["message"]).found().unwrap_or("");
            lines.push(format!(
                "Condition: {} = {} ({})",
                cond_type, cond_status, cond_message
            ));
        }
    }

    if let Field::Found(summary) = document.sequence(&["status", "applicationStatus"]) {
        lines.push(format!("Generated Applications: {}", summary.len()));
        for entry in summary {
            let name = string_at(entry, &["application"]).found().unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let health = string_at(entry, &["health"]).found().unwrap_or("");
            let sync = string_at(entry, &["sync"]).found().unwrap_or("");
            lines.push(format!("  App: {} (Health: {}, Sync: {})", name, health, sync));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_details_cover_conditions_and_summary() {
        let document = Document::try_new(json!({
            "metadata": {"name": "appset-with-apps", "namespace": "default"},
            "status": {
                "conditions": [
                    {"type": "ResourcesUpToDate", "status": "True", "message": "All resources are up to date"}
                ],
                "applicationStatus": [
                    {"application": "test-app-dev", "health": "Degraded", "sync": "OutOfSync"},
                    {"health": "Healthy", "sync": "Synced"},
                ],
            }
        }))
        .unwrap();

        assert_eq!(
            status_details(&document),
            vec![
                "Condition: ResourcesUpToDate = True (All resources are up to date)",
                "Generated Applications: 2",
                "  App: test-app-dev (Health: Degraded, Sync: OutOfSync)",
            ]
        );
    }

    #[test]
    fn test_status_details_empty_without_status() {
        let document = Document::try_new(json!({
            "metadata": {"name": "bare", "namespace": "default"},
        }))
        .unwrap();
        assert!(status_details(&document).is_empty());
    }
}
