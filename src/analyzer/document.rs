//! Defensive navigation over untyped Kubernetes objects.
//!
//! ApplicationSet and Application objects are handled as schema-less
//! `serde_json::Value` trees rather than typed structs, so a single
//! malformed field must not abort analysis of an otherwise valid resource.
//! Lookups therefore never fail: a missing path yields [`Field::Missing`]
//! and a present-but-differently-typed value yields [`Field::Mismatch`].

use serde_json::{Map, Value};

/// Outcome of a typed field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    /// The path resolved and the value had the requested type
    Found(T),
    /// Some segment of the path was absent (or an intermediate node was not a mapping)
    Missing,
    /// The path resolved but the value had a different type
    Mismatch,
}

impl<T> Field<T> {
    /// Collapse to `Option`, discarding the missing/mismatch distinction
    pub fn found(self) -> Option<T> {
        match self {
            Field::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Walk a path of mapping keys, returning `None` if any segment is absent
/// or an intermediate node is not a mapping.
pub fn get_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

pub fn string_at<'a>(value: &'a Value, path: &[&str]) -> Field<&'a str> {
    match get_at(value, path) {
        None => Field::Missing,
        Some(found) => match found.as_str() {
            Some(s) => Field::Found(s),
            None => Field::Mismatch,
        },
    }
}

pub fn sequence_at<'a>(value: &'a Value, path: &[&str]) -> Field<&'a [Value]> {
    match get_at(value, path) {
        None => Field::Missing,
        Some(found) => match found.as_array() {
            Some(items) => Field::Found(items.as_slice()),
            None => Field::Mismatch,
        },
    }
}

pub fn mapping_at<'a>(value: &'a Value, path: &[&str]) -> Field<&'a Map<String, Value>> {
    match get_at(value, path) {
        None => Field::Missing,
        Some(found) => match found.as_object() {
            Some(map) => Field::Found(map),
            None => Field::Mismatch,
        },
    }
}

/// Human-readable JSON type name for diagnostics
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Why a fetched object could not be treated as a resource document.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct DocumentError {
    /// Best-effort namespace/name recovered from the rejected value
    pub id: String,
    reason: String,
}

/// Read-only wrapper around one decoded Kubernetes object.
///
/// Rule code goes through the typed accessors instead of casting the raw
/// value ad hoc; the object is never mutated after construction.
#[derive(Debug, Clone)]
pub struct Document {
    inner: Value,
}

impl Document {
    /// Wrap a decoded object, rejecting values that do not look like a
    /// Kubernetes resource (a top-level mapping with a string `metadata.name`).
    pub fn try_new(inner: Value) -> Result<Self, DocumentError> {
        if !inner.is_object() {
            return Err(DocumentError {
                id: "unknown".to_string(),
                reason: format!("expected a mapping, found {}", value_type_name(&inner)),
            });
        }
        if string_at(&inner, &["metadata", "name"]).found().is_none() {
            let namespace = string_at(&inner, &["metadata", "namespace"])
                .found()
                .unwrap_or("unknown");
            return Err(DocumentError {
                id: format!("{}/unknown", namespace),
                reason: "metadata.name is missing or not a string".to_string(),
            });
        }
        Ok(Self { inner })
    }

    pub fn name(&self) -> &str {
        self.string(&["metadata", "name"]).found().unwrap_or("")
    }

    pub fn namespace(&self) -> &str {
        self.string(&["metadata", "namespace"]).found().unwrap_or("")
    }

    /// "namespace/name" identifier used in findings and details
    pub fn id(&self) -> String {
        format!("{}/{}", self.namespace(), self.name())
    }

    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        get_at(&self.inner, path)
    }

    pub fn string(&self, path: &[&str]) -> Field<&str> {
        string_at(&self.inner, path)
    }

    pub fn sequence(&self, path: &[&str]) -> Field<&[Value]> {
        sequence_at(&self.inner, path)
    }

    pub fn mapping(&self, path: &[&str]) -> Field<&Map<String, Value>> {
        mapping_at(&self.inner, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_at_walks_nested_mappings() {
        let value = json!({"spec": {"template": {"metadata": {"name": "app"}}}});
        let found = get_at(&value, &["spec", "template", "metadata", "name"]).unwrap();
        assert_eq!(found.as_str(), Some("app"));
    }

    #[test]
    fn test_missing_and_mistyped_intermediates_are_not_found() {
        let value = json!({"spec": "not-a-mapping"});
        assert!(get_at(&value, &["spec", "generators"]).is_none());
        assert!(get_at(&value, &["status", "conditions"]).is_none());
        assert_eq!(sequence_at(&value, &["spec", "generators"]), Field::Missing);
    }

    #[test]
    fn test_leaf_type_mismatch_is_distinguished_from_missing() {
        let value = json!({"spec": {"generators": "oops"}});
        assert_eq!(sequence_at(&value, &["spec", "generators"]), Field::Mismatch);
        assert_eq!(string_at(&value, &["spec", "generators"]), Field::Found("oops"));
        assert_eq!(mapping_at(&value, &["spec"]).found().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_document_identity_helpers() {
        let document = Document::try_new(json!({
            "metadata": {"name": "my-set", "namespace": "argocd"}
        }))
        .unwrap();
        assert_eq!(document.name(), "my-set");
        assert_eq!(document.namespace(), "argocd");
        assert_eq!(document.id(), "argocd/my-set");
    }

    #[test]
    fn test_document_rejects_non_resources() {
        let err = Document::try_new(json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.id, "unknown");
        assert!(err.to_string().contains("sequence"));

        let err = Document::try_new(json!({
            "metadata": {"namespace": "argocd", "name": 42}
        }))
        .unwrap_err();
        assert_eq!(err.id, "argocd/unknown");
        assert!(err.to_string().contains("metadata.name"));
    }
}
