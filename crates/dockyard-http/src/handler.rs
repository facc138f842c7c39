//! Response decoding strategies

use serde::Serialize;

use crate::{error::Result, response::Response};

/// Turns a raw [`Response`] into a typed value.
///
/// Handlers only fail when the body cannot be read. Status classification
/// is left to [`StatusValidator`](crate::StatusValidator).
pub trait ResponseHandler {
    type Output;

    fn handle(&self, response: &mut Response) -> Result<Self::Output>;
}

/// Trimmed body text, `None` when there is no entity
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyHandler;

impl ResponseHandler for BodyHandler {
    type Output = Option<String>;

    fn handle(&self, response: &mut Response) -> Result<Self::Output> {
        Ok(response.text()?)
    }
}

/// Status code only; the body is left to be drained
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeHandler;

impl ResponseHandler for StatusCodeHandler {
    type Output = u16;

    fn handle(&self, response: &mut Response) -> Result<Self::Output> {
        Ok(response.status())
    }
}

/// Status code together with the trimmed body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyAndStatus {
    pub status_code: u16,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BodyAndStatusHandler;

impl ResponseHandler for BodyAndStatusHandler {
    type Output = BodyAndStatus;

    fn handle(&self, response: &mut Response) -> Result<Self::Output> {
        let status_code = response.status();
        Ok(BodyAndStatus {
            status_code,
            body: response.text()?,
        })
    }
}

/// Handler backed by a closure, see [`from_fn`]
#[derive(Clone, Copy)]
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure as a [`ResponseHandler`]
pub fn from_fn<F, T>(f: F) -> FnHandler<F>
where
    F: Fn(&mut Response) -> Result<T>,
{
    FnHandler { f }
}

impl<F, T> ResponseHandler for FnHandler<F>
where
    F: Fn(&mut Response) -> Result<T>,
{
    type Output = T;

    fn handle(&self, response: &mut Response) -> Result<Self::Output> {
        (self.f)(response)
    }
}
