//! Generator validation for `spec.generators`.
//!
//! Each entry of the generators sequence is classified once into the set of
//! recognized generator tags it carries, then each tag gets its own
//! structural checks. Tags without structural rules are still recognized so
//! the entry is not flagged as empty.

use serde_json::{Map, Value};

use crate::analyzer::document::{value_type_name, Document, Field};
use crate::analyzer::report::Finding;

/// The generator variants an ApplicationSet entry can carry, keyed by the
/// field name Argo CD uses for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Git,
    List,
    Clusters,
    Matrix,
    Merge,
    ScmProvider,
    ClusterDecisionResource,
    PullRequest,
}

impl GeneratorKind {
    pub fn all() -> &'static [Self] {
        &[
            GeneratorKind::Git,
            GeneratorKind::List,
            GeneratorKind::Clusters,
            GeneratorKind::Matrix,
            GeneratorKind::Merge,
            GeneratorKind::ScmProvider,
            GeneratorKind::ClusterDecisionResource,
            GeneratorKind::PullRequest,
        ]
    }

    /// The field name identifying this generator inside a generators[] entry
    pub fn key(&self) -> &'static str {
        match self {
            GeneratorKind::Git => "git",
            GeneratorKind::List => "list",
            GeneratorKind::Clusters => "clusters",
            GeneratorKind::Matrix => "matrix",
            GeneratorKind::Merge => "merge",
            GeneratorKind::ScmProvider => "scmProvider",
            GeneratorKind::ClusterDecisionResource => "clusterDecisionResource",
            GeneratorKind::PullRequest => "pullRequest",
        }
    }
}

/// The recognized generator tags present on one entry.
///
/// More than one tag on a single entry is unusual but not itself an error;
/// each present tag is validated independently.
fn classify(entry: &Map<String, Value>) -> Vec<GeneratorKind> {
    GeneratorKind::all()
        .iter()
        .copied()
        .filter(|kind| entry.contains_key(kind.key()))
        .collect()
}

/// Validate the generators sequence of one ApplicationSet.
pub fn check_generators(document: &Document) -> Vec<Finding> {
    let mut findings = Vec::new();
    let id = document.id();

    let generators = match document.sequence(&["spec", "generators"]) {
        Field::Found(generators) => generators,
        Field::Missing => {
            findings.push(Finding::new(format!(
                "ApplicationSet {} has no generators defined",
                id
            )));
            return findings;
        }
        Field::Mismatch => {
            let detail = document
                .get(&["spec", "generators"])
                .map(value_type_name)
                .unwrap_or("unknown");
            findings.push(Finding::new(format!(
                "ApplicationSet {} has invalid generators configuration: expected a sequence, found {}",
                id, detail
            )));
            return findings;
        }
    };

    if generators.is_empty() {
        findings.push(Finding::new(format!(
            "ApplicationSet {} has no generators defined",
            id
        )));
        return findings;
    }

    for (index, entry) in generators.iter().enumerate() {
        let Some(mapping) = entry.as_object() else {
            findings.push(Finding::new(format!(
                "ApplicationSet {} has invalid generator at index {}",
                id, index
            )));
            continue;
        };

        let kinds = classify(mapping);
        if kinds.is_empty() {
            findings.push(Finding::new(format!(
                "ApplicationSet {} has empty generator at index {}",
                id, index
            )));
            continue;
        }

        for kind in kinds {
            validate_generator(kind, mapping, &id, index, &mut findings);
        }
    }

    findings
}

/// Variant-specific structural checks.
///
/// A tag whose value is not a mapping gets no structural checks, and the
/// tags without rules here (matrix, merge, scmProvider,
/// clusterDecisionResource, pullRequest) are accepted as-is.
fn validate_generator(
    kind: GeneratorKind,
    entry: &Map<String, Value>,
    id: &str,
    index: usize,
    findings: &mut Vec<Finding>,
) {
    let Some(config) = entry.get(kind.key()).and_then(Value::as_object) else {
        return;
    };

    match kind {
        GeneratorKind::Git => match config.get("repoURL") {
            None => findings.push(Finding::new(format!(
                "ApplicationSet {} Git generator at index {} has empty repoURL",
                id, index
            ))),
            Some(Value::String(url)) if url.is_empty() => findings.push(Finding::new(format!(
                "ApplicationSet {} Git generator at index {} has empty repoURL",
                id, index
            ))),
            _ => {}
        },
        GeneratorKind::List => {
            let has_elements_yaml = config.contains_key("elementsYaml");
            match config.get("elements") {
                None if !has_elements_yaml => findings.push(Finding::new(format!(
                    "ApplicationSet {} List generator at index {} has no elements or elementsYaml",
                    id, index
                ))),
                Some(Value::Array(elements)) if elements.is_empty() => {
                    findings.push(Finding::new(format!(
                        "ApplicationSet {} List generator at index {} has empty elements array",
                        id, index
                    )))
                }
                _ => {}
            }
        }
        GeneratorKind::Clusters => {
            let has_selector = config.contains_key("selector");
            match config.get("values") {
                None if !has_selector => findings.push(Finding::new(format!(
                    "ApplicationSet {} Cluster generator at index {} has no selector or values",
                    id, index
                ))),
                Some(Value::Object(values)) if values.is_empty() => {
                    findings.push(Finding::new(format!(
                        "ApplicationSet {} Cluster generator at index {} has empty values",
                        id, index
                    )))
                }
                _ => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(spec: serde_json::Value) -> Document {
        Document::try_new(json!({
            "metadata": {"name": "test-appset", "namespace": "default"},
            "spec": spec,
        }))
        .unwrap()
    }

    fn texts(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_missing_and_empty_generators_yield_single_finding() {
        for spec in [json!({}), json!({"generators": []})] {
            let findings = check_generators(&document(spec));
            assert_eq!(
                texts(&findings),
                vec!["ApplicationSet default/test-appset has no generators defined"]
            );
        }
    }

    #[test]
    fn test_mistyped_generators_field_is_reported_with_detail() {
        let findings = check_generators(&document(json!({"generators": "oops"})));
        assert_eq!(
            texts(&findings),
            vec!["ApplicationSet default/test-appset has invalid generators configuration: expected a sequence, found string"]
        );
    }

    #[test]
    fn test_broken_generator_entries_are_flagged_by_index() {
        let findings = check_generators(&document(json!({
            "generators": [
                {},
                {"git": {"repoURL": ""}},
                {"list": {"elements": []}},
                {"clusters": {}},
                "not-a-mapping",
            ]
        })));

        assert_eq!(
            texts(&findings),
            vec![
                "ApplicationSet default/test-appset has empty generator at index 0",
                "ApplicationSet default/test-appset Git generator at index 1 has empty repoURL",
                "ApplicationSet default/test-appset List generator at index 2 has empty elements array",
                "ApplicationSet default/test-appset Cluster generator at index 3 has no selector or values",
                "ApplicationSet default/test-appset has invalid generator at index 4",
            ]
        );
    }

    #[test]
    fn test_well_formed_generators_pass() {
        let findings = check_generators(&document(json!({
            "generators": [
                {"git": {"repoURL": "https://github.com/example/repo"}},
                {"list": {"elements": [{"cluster": "dev"}, {"cluster": "prod"}]}},
                {"list": {"elementsYaml": "{{ .key.components }}"}},
                {"clusters": {"selector": {"matchLabels": {"env": "prod"}}}},
                {"clusters": {"values": {"region": "us-east-1"}}},
            ]
        })));

        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_missing_repo_url_is_flagged() {
        let findings = check_generators(&document(json!({
            "generators": [{"git": {"revision": "HEAD"}}]
        })));
        assert_eq!(
            texts(&findings),
            vec!["ApplicationSet default/test-appset Git generator at index 0 has empty repoURL"]
        );
    }

    #[test]
    fn test_list_generator_without_any_elements_source_is_flagged() {
        let findings = check_generators(&document(json!({
            "generators": [{"list": {}}]
        })));
        assert_eq!(
            texts(&findings),
            vec!["ApplicationSet default/test-appset List generator at index 0 has no elements or elementsYaml"]
        );
    }

    #[test]
    fn test_cluster_generator_with_empty_values_is_flagged() {
        let findings = check_generators(&document(json!({
            "generators": [{"clusters": {"selector": {}, "values": {}}}]
        })));
        assert_eq!(
            texts(&findings),
            vec!["ApplicationSet default/test-appset Cluster generator at index 0 has empty values"]
        );
    }

    #[test]
    fn test_tag_only_generators_are_recognized_as_non_empty() {
        let findings = check_generators(&document(json!({
            "generators": [
                {"matrix": {"generators": []}},
                {"merge": {"generators": []}},
                {"scmProvider": {}},
                {"clusterDecisionResource": {}},
                {"pullRequest": {}},
            ]
        })));
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }
}
