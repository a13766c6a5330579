//! Document store port over the Kubernetes API.
//!
//! The analyzer never constructs a client itself; it is handed something
//! implementing [`DocumentStore`]. [`KubeDocumentStore`] backs the port
//! with a live cluster, [`MemoryDocumentStore`] backs it with a fixed set
//! of objects for tests and offline use.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::ListParams;
use kube::core::DynamicObject;
use kube::Api;
use serde_json::Value;

use crate::analyzer::document::get_at;
use crate::models::ArgoResourceKind;

/// Capability to enumerate resource documents of a given kind.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of the kind across all namespaces
    async fn list_all(&self, kind: ArgoResourceKind) -> Result<Vec<Value>>;

    /// List documents of the kind in one namespace, filtered by label selector
    async fn list_namespaced(
        &self,
        kind: ArgoResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Value>>;
}

/// Document store backed by a live cluster.
pub struct KubeDocumentStore {
    client: kube::Client,
}

impl KubeDocumentStore {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn to_documents(items: Vec<DynamicObject>) -> Result<Vec<Value>> {
        items
            .iter()
            .map(|object| {
                serde_json::to_value(object).context("Failed to serialize object to JSON")
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for KubeDocumentStore {
    async fn list_all(&self, kind: ArgoResourceKind) -> Result<Vec<Value>> {
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &kind.api_resource());
        let list = api
            .list(&ListParams::default())
            .await
            .with_context(|| format!("Failed to list {}s", kind))?;
        Self::to_documents(list.items)
    }

    async fn list_namespaced(
        &self,
        kind: ArgoResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Value>> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &kind.api_resource());
        let params = ListParams::default().labels(label_selector);
        let list = api
            .list(&params)
            .await
            .with_context(|| format!("Failed to list {}s in {}", kind, namespace))?;
        Self::to_documents(list.items)
    }
}

/// In-memory document store for unit tests and offline analysis.
///
/// Objects are returned in insertion order, which makes analyzer output
/// over a fixed snapshot deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    application_sets: Vec<Value>,
    applications: Vec<Value>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ArgoResourceKind, object: Value) {
        match kind {
            ArgoResourceKind::ApplicationSet => self.application_sets.push(object),
            ArgoResourceKind::Application => self.applications.push(object),
        }
    }

    fn objects(&self, kind: ArgoResourceKind) -> &[Value] {
        match kind {
            ArgoResourceKind::ApplicationSet => &self.application_sets,
            ArgoResourceKind::Application => &self.applications,
        }
    }

    /// Equality-only label selector matching ("key=value", comma-separated),
    /// which is all the analyzer asks for
    fn matches_selector(object: &Value, label_selector: &str) -> bool {
        label_selector.split(',').all(|clause| {
            let Some((key, expected)) = clause.split_once('=') else {
                return false;
            };
            get_at(object, &["metadata", "labels", key]).and_then(Value::as_str) == Some(expected)
        })
    }

    fn in_namespace(object: &Value, namespace: &str) -> bool {
        get_at(object, &["metadata", "namespace"]).and_then(Value::as_str) == Some(namespace)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, kind: ArgoResourceKind) -> Result<Vec<Value>> {
        Ok(self.objects(kind).to_vec())
    }

    async fn list_namespaced(
        &self,
        kind: ArgoResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Value>> {
        Ok(self
            .objects(kind)
            .iter()
            .filter(|object| {
                Self::in_namespace(object, namespace)
                    && Self::matches_selector(object, label_selector)
            })
            .cloned()
            .collect())
    }
}
