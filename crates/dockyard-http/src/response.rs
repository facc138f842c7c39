//! Raw daemon response with a single-use body

use std::fmt;
use std::io::{self, Read};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::trace;

/// A response as produced by a [`Transport`](crate::Transport).
///
/// The body is readable once. Whatever is left unread is drained on drop so
/// a pooled connection can be reused, whichever path the handler took.
pub struct Response {
    status: u16,
    reason: String,
    headers: HeaderMap,
    body: Option<Box<dyn Read + Send>>,
}

impl Response {
    /// Response without an entity
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach an in-memory entity
    pub fn with_body(self, body: impl Into<Vec<u8>>) -> Self {
        self.with_reader(io::Cursor::new(body.into()))
    }

    /// Attach a streaming entity
    pub fn with_reader(mut self, reader: impl Read + Send + 'static) -> Self {
        self.body = Some(Box::new(reader));
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub(crate) fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase from the status line
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether an unread entity is still attached
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Read the whole entity as trimmed UTF-8 text.
    ///
    /// Returns `None` when the response carries no entity or the entity was
    /// already consumed.
    pub fn text(&mut self) -> io::Result<Option<String>> {
        let Some(bytes) = self.read_entity()? else {
            return Ok(None);
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(text.trim().to_string()))
    }

    /// Like [`text`](Self::text), but invalid UTF-8 is replaced instead of
    /// failing. Used where the body only feeds an error message.
    pub fn text_lossy(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .read_entity()?
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string()))
    }

    fn read_entity(&mut self) -> io::Result<Option<Vec<u8>>> {
        let Some(mut body) = self.body.take() else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    /// Discard the remaining entity
    pub fn drain(&mut self) -> io::Result<u64> {
        match self.body.take() {
            Some(mut body) => io::copy(&mut body, &mut io::sink()),
            None => Ok(0),
        }
    }
}

impl Drop for Response {
    fn drop(&mut self) {
        if let Err(e) = self.drain() {
            trace!("Failed to drain response body: {e}");
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
