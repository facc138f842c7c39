//! HTTP client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transport configuration handed to [`ReqwestClientBuilder`](crate::ReqwestClientBuilder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// HTTP/HTTPS proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// How long an idle pooled connection is kept
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: Duration,

    /// Idle connections kept per host by a pooled client
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            proxy: None,
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            pool_idle_timeout: default_pool_idle_timeout(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set pool idle timeout
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }
}

// Default value functions for serde
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("Dockyard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

fn default_pool_max_idle_per_host() -> usize {
    20
}
