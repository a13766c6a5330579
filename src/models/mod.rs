//! Data model layer
//!
//! Argo CD resources are consumed as untyped documents, so the model layer
//! is limited to the resource kind enum used to address the API.

mod argo_resource_kind;

pub use argo_resource_kind::ArgoResourceKind;
