//! Shared fixtures for the end-to-end tests

use dockyard_http::{HttpClient, HttpConfig, ReqwestClientBuilder, Result};

/// Pooled client on the default reqwest configuration
pub fn pooled_client() -> Result<HttpClient> {
    HttpClient::new(ReqwestClientBuilder::new(HttpConfig::default()))
}

/// Single-connection client, nothing kept idle
pub fn basic_client() -> Result<HttpClient> {
    HttpClient::with_pooling(ReqwestClientBuilder::new(HttpConfig::default()), false)
}

/// Join a mock server base URL and a daemon API path
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
