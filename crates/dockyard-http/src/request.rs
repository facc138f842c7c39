//! Request construction with the daemon's default headers

use std::path::PathBuf;

use reqwest::Method;

/// Value sent in the `Accept` header of every request
pub const DEFAULT_ACCEPT: &str = "*/*";

/// Value sent in the `Content-Type` header of every request, whatever the body
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Payload attached to a POST or PUT
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Text sent as UTF-8
    Text(String),
    /// File streamed from disk, sized from its metadata
    File(PathBuf),
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<PathBuf> for RequestBody {
    fn from(path: PathBuf) -> Self {
        RequestBody::File(path)
    }
}

/// A single request to the daemon.
///
/// Built fresh for every call and handed by value to a
/// [`Transport`](crate::Transport). The URL is not parsed here; a malformed
/// URL surfaces as a transport error on execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl Request {
    /// Build a request with the default headers.
    ///
    /// Only POST and PUT carry a body; it is dropped for every other method.
    pub fn build(method: Method, url: impl Into<String>, body: Option<RequestBody>) -> Self {
        let body = if method == Method::POST || method == Method::PUT {
            body
        } else {
            None
        };

        Self {
            method,
            url: url.into(),
            headers: vec![
                ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
                ("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()),
            ],
            body,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::build(Method::GET, url, None)
    }

    pub fn post(url: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self::build(Method::POST, url, body)
    }

    pub fn put(url: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self::build(Method::PUT, url, body)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::build(Method::DELETE, url, None)
    }

    /// Add a header after the defaults.
    ///
    /// A header with the same name (case-insensitive) is replaced in place,
    /// so callers can override `Accept` or `Content-Type`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in the order they will be sent
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Look up a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Method, String, Vec<(String, String)>, Option<RequestBody>) {
        (self.method, self.url, self.headers, self.body)
    }
}
