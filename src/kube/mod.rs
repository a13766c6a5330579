//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides
//! a configured client for the document store.
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment variables:
//! - `HTTP_PROXY` / `http_proxy`: HTTP proxy URL
//! - `HTTPS_PROXY` / `https_proxy`: HTTPS proxy URL
//! - `NO_PROXY` / `no_proxy`: Comma-separated list of hosts to bypass proxy
//!
//! Cluster-internal API server hosts are added to NO_PROXY automatically so
//! corporate proxies do not intercept API traffic.

pub mod store;

use anyhow::Result;
use kube::{Client, Config};
use url::Url;

/// Initialize and return a Kubernetes client with automatic proxy support
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer().await?;

    // Add the API server host to NO_PROXY when it looks internal
    let cluster_url = config.cluster_url.to_string();
    if let Ok(url) = Url::parse(&cluster_url) {
        if let Some(host) = url.host_str() {
            ensure_no_proxy_bypass(host);
        }
    }

    let client = Client::try_from(config)?;
    Ok(client)
}

/// Append a host to NO_PROXY when it is internal and not already covered.
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let current = std::env::var("NO_PROXY")
        .or_else(|_| std::env::var("no_proxy"))
        .unwrap_or_default();
    if no_proxy_contains(&current, host) {
        return;
    }

    let updated = if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    };

    // SAFETY: runs during single-threaded startup, before the client (or any
    // worker thread) reads the proxy environment
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// Check if a host looks like an internal/private domain
///
/// Covers private IP ranges, localhost and the cluster-internal TLDs.
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || host == "localhost"
        || host == "127.0.0.1"
        || host == "::1"
    {
        return true;
    }

    host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".cluster.local")
        || host.ends_with(".svc.cluster.local")
}

/// Check if NO_PROXY already contains the host
///
/// Handles exact matches, subdomain matches ("example.com" covers
/// "api.example.com") and leading-dot wildcard patterns (".example.com").
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| {
            let suffix = pattern.strip_prefix('.').unwrap_or(pattern);
            host == suffix || host.ends_with(&format!(".{}", suffix))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_internal_host_private_addresses() {
        assert!(is_internal_host("10.0.0.1"));
        assert!(is_internal_host("172.16.0.1"));
        assert!(is_internal_host("192.168.1.1"));
        assert!(is_internal_host("localhost"));
        assert!(is_internal_host("127.0.0.1"));
        assert!(is_internal_host("::1"));
    }

    #[test]
    fn test_is_internal_host_internal_tlds() {
        assert!(is_internal_host("example.local"));
        assert!(is_internal_host("cluster.internal"));
        assert!(is_internal_host("service.cluster.local"));
        assert!(is_internal_host("pod.svc.cluster.local"));
    }

    #[test]
    fn test_is_internal_host_public_domains() {
        assert!(!is_internal_host("example.com"));
        assert!(!is_internal_host("api.github.com"));
        assert!(!is_internal_host("kubernetes.io"));
    }

    #[test]
    fn test_no_proxy_contains_exact_and_subdomain() {
        assert!(no_proxy_contains("example.com", "example.com"));
        assert!(no_proxy_contains("localhost,example.com", "example.com"));
        assert!(no_proxy_contains("example.com", "api.example.com"));
        assert!(!no_proxy_contains("other.com", "example.com"));
        assert!(!no_proxy_contains("", "example.com"));
    }

    #[test]
    fn test_no_proxy_contains_wildcard_patterns() {
        assert!(no_proxy_contains(".example.com", "example.com"));
        assert!(no_proxy_contains(".example.com", "sub.example.com"));
        assert!(no_proxy_contains(" localhost , example.com ", "example.com"));
        assert!(!no_proxy_contains(".prod.example.com", "devprod.example.com"));
    }
}
