//! Request/response layer for a container daemon's REST API
//!
//! Sits between domain operations (create container, pull image, ...) and a
//! pooled HTTP transport.
//!
//! ## Features
//!
//! - **Uniform requests**: every request carries `Accept: */*` and a JSON content type
//! - **Pluggable decoding**: body, status code, both, or a closure via `ResponseHandler`
//! - **Status classification**: responses outside the caller's acceptable codes
//!   become `HttpError::RequestFailed`
//! - **Mockable transport**: `Transport` and `ClientBuilder` traits, with a
//!   blocking reqwest implementation
//! - **No retries**: a failed call surfaces once

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod transport;
pub mod validator;

pub use client::HttpClient;
pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use handler::{
    from_fn, BodyAndStatus, BodyAndStatusHandler, BodyHandler, FnHandler, ResponseHandler,
    StatusCodeHandler,
};
pub use request::{Request, RequestBody};
pub use response::Response;
pub use transport::{ClientBuilder, ReqwestClientBuilder, ReqwestTransport, Transport};
pub use validator::{validate, StatusValidator};

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
