//! Status-code gate in front of a response handler

use tracing::warn;

use crate::{
    error::{HttpError, Result},
    handler::ResponseHandler,
    response::Response,
};

/// Delegates to the inner handler only when the status code is acceptable.
///
/// An empty acceptable set is strict: every response is rejected.
#[derive(Debug, Clone)]
pub struct StatusValidator<H> {
    acceptable: Vec<u16>,
    inner: H,
}

/// Gate `inner` behind an exact-match allow-list of status codes
pub fn validate<H: ResponseHandler>(acceptable: &[u16], inner: H) -> StatusValidator<H> {
    if acceptable.is_empty() {
        warn!("No acceptable status codes given, every response will be rejected");
    }
    StatusValidator {
        acceptable: acceptable.to_vec(),
        inner,
    }
}

impl<H> StatusValidator<H> {
    pub fn acceptable(&self) -> &[u16] {
        &self.acceptable
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.acceptable.contains(&status)
    }
}

impl<H: ResponseHandler> ResponseHandler for StatusValidator<H> {
    type Output = H::Output;

    fn handle(&self, response: &mut Response) -> Result<Self::Output> {
        let status = response.status();
        if self.accepts(status) {
            return self.inner.handle(response);
        }

        let body = response.text_lossy()?;
        Err(HttpError::RequestFailed {
            status,
            reason: response.reason().trim().to_string(),
            body,
        })
    }
}
