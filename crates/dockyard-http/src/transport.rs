//! Transport seam and the reqwest-backed provider

use std::fs::File;
use std::sync::Arc;

use reqwest::blocking::{Body, Client};

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
    request::{Request, RequestBody},
    response::Response,
};

/// Executes one request and hands back the raw response.
///
/// Implementations must be safe to share between threads; a pooled client
/// lends a connection per call and gets it back once the [`Response`] drops.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> Result<Response>;
}

/// Supplies ready-to-use transports
pub trait ClientBuilder: Send + Sync {
    /// Long-lived client that keeps idle connections around
    fn build_pooled_client(&self) -> Result<Arc<dyn Transport>>;

    /// Client that does not keep idle connections
    fn build_basic_client(&self) -> Result<Arc<dyn Transport>>;
}

/// [`ClientBuilder`] producing blocking reqwest clients from an [`HttpConfig`]
#[derive(Debug, Clone, Default)]
pub struct ReqwestClientBuilder {
    config: HttpConfig,
}

impl ReqwestClientBuilder {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn base_builder(&self) -> Result<reqwest::blocking::ClientBuilder> {
        let config = &self.config;
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }

    fn finish(builder: reqwest::blocking::ClientBuilder) -> Result<Arc<dyn Transport>> {
        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;
        Ok(Arc::new(ReqwestTransport::new(inner)))
    }
}

impl ClientBuilder for ReqwestClientBuilder {
    fn build_pooled_client(&self) -> Result<Arc<dyn Transport>> {
        let builder = self
            .base_builder()?
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);
        Self::finish(builder)
    }

    fn build_basic_client(&self) -> Result<Arc<dyn Transport>> {
        let builder = self.base_builder()?.pool_max_idle_per_host(0);
        Self::finish(builder)
    }
}

/// [`Transport`] over a blocking reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    pub fn new(inner: Client) -> Self {
        Self { inner }
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> Result<Response> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = self.inner.request(method, url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match body {
            Some(RequestBody::Text(text)) => {
                builder = builder.body(text.into_bytes());
            }
            Some(RequestBody::File(path)) => {
                let file = File::open(&path).map_err(|source| HttpError::RequestBody {
                    path: path.clone(),
                    source,
                })?;
                let len = file
                    .metadata()
                    .map_err(|source| HttpError::RequestBody { path, source })?
                    .len();
                builder = builder.body(Body::sized(file, len));
            }
            None => {}
        }

        let response = builder.send()?;
        Ok(into_response(response))
    }
}

fn into_response(response: reqwest::blocking::Response) -> Response {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or_default();
    let headers = response.headers().clone();

    let entity = has_entity(status.as_u16());
    let converted = Response::new(status.as_u16(), reason).with_headers(headers);
    if entity {
        converted.with_reader(response)
    } else {
        converted
    }
}

/// Whether a response carries an entity at all.
///
/// Only statuses that cannot have a body lack one; an empty body of any
/// framing is still an entity and decodes to `Some("")`.
fn has_entity(status: u16) -> bool {
    !((100..200).contains(&status) || status == 204 || status == 304)
}
