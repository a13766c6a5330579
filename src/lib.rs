//! ApplicationSet Analyzer Library
//!
//! This library provides the core functionality for the appset-analyzer
//! binary. It can be used both as a binary and as a library for testing.

pub mod analyzer;
pub mod kube;
pub mod models;

// Re-export commonly used types for convenience
pub use analyzer::report::{Finding, Report, RunResult};
pub use analyzer::{Analyzer, AnalyzerError, ANALYZER_NAME, APPLICATION_SET_LABEL};
pub use crate::kube::store::{DocumentStore, KubeDocumentStore, MemoryDocumentStore};
