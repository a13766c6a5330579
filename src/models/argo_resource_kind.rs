//! Argo CD resource kind definitions.
//!
//! Centralizes the group/version/plural coordinates for the two CRDs the
//! analyzer touches, so no API path strings are scattered through the
//! fetch code.

use std::fmt;

use kube::core::ApiResource;

/// The Argo CD CRD kinds the analyzer works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgoResourceKind {
    ApplicationSet,
    Application,
}

impl ArgoResourceKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgoResourceKind::ApplicationSet => "ApplicationSet",
            ArgoResourceKind::Application => "Application",
        }
    }

    pub fn api_group(&self) -> &'static str {
        "argoproj.io"
    }

    pub fn api_version(&self) -> &'static str {
        "v1alpha1"
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ArgoResourceKind::ApplicationSet => "applicationsets",
            ArgoResourceKind::Application => "applications",
        }
    }

    /// ApiResource for a dynamically-typed Api over this kind
    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.api_group().to_string(),
            version: self.api_version().to_string(),
            api_version: format!("{}/{}", self.api_group(), self.api_version()),
            kind: self.as_str().to_string(),
            plural: self.plural().to_string(),
        }
    }

    /// Try to parse a string into an ArgoResourceKind, returning None if invalid
    pub fn parse_optional(s: &str) -> Option<Self> {
        match s {
            "ApplicationSet" => Some(ArgoResourceKind::ApplicationSet),
            "Application" => Some(ArgoResourceKind::Application),
            _ => None,
        }
    }
}

impl fmt::Display for ArgoResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_resource_coordinates() {
        let resource = ArgoResourceKind::ApplicationSet.api_resource();
        assert_eq!(resource.group, "argoproj.io");
        assert_eq!(resource.version, "v1alpha1");
        assert_eq!(resource.api_version, "argoproj.io/v1alpha1");
        assert_eq!(resource.kind, "ApplicationSet");
        assert_eq!(resource.plural, "applicationsets");
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(
            ArgoResourceKind::parse_optional("Application"),
            Some(ArgoResourceKind::Application)
        );
        assert_eq!(ArgoResourceKind::parse_optional("Rollout"), None);
    }
}
