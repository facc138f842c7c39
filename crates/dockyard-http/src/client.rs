//! Blocking request/response facade over a shared transport

use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{HttpError, Result},
    handler::{BodyHandler, ResponseHandler, StatusCodeHandler},
    request::{Request, RequestBody},
    transport::{ClientBuilder, ReqwestClientBuilder, Transport},
    validator::validate,
    HttpConfig,
};

/// Client for the daemon's REST API.
///
/// Every operation builds a fresh [`Request`], runs exactly one
/// [`Transport::execute`], and passes the response through a
/// [`StatusValidator`](crate::StatusValidator) wrapping the chosen handler.
/// Responses whose status is not in `codes` come back as
/// [`HttpError::RequestFailed`]; nothing is retried.
#[derive(Clone)]
pub struct HttpClient {
    builder: Arc<dyn ClientBuilder>,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Create a client on a pooled transport
    pub fn new(builder: impl ClientBuilder + 'static) -> Result<Self> {
        Self::with_pooling(builder, true)
    }

    /// Create a client on a pooled or a basic transport
    pub fn with_pooling(builder: impl ClientBuilder + 'static, pooled: bool) -> Result<Self> {
        let transport = if pooled {
            builder.build_pooled_client()?
        } else {
            builder.build_basic_client()?
        };

        Ok(Self {
            builder: Arc::new(builder),
            transport,
        })
    }

    /// Create a pooled reqwest client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(ReqwestClientBuilder::new(HttpConfig::default()))
    }

    /// Build a fresh single-use transport from the same builder
    pub fn create_basic_client(&self) -> Result<Arc<dyn Transport>> {
        self.builder.build_basic_client().map_err(|e| match e {
            HttpError::BuildError(_) => e,
            other => HttpError::BuildError(format!("Cannot create single HTTP client: {other}")),
        })
    }

    /// Shared transport used by every call on this client
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// GET returning the trimmed body
    pub fn get(&self, url: &str, codes: &[u16]) -> Result<Option<String>> {
        self.get_with(url, BodyHandler, codes)
    }

    pub fn get_with<H: ResponseHandler>(
        &self,
        url: &str,
        handler: H,
        codes: &[u16],
    ) -> Result<H::Output> {
        self.execute(Request::get(url), handler, codes)
    }

    /// POST without a body returning the status code
    pub fn post(&self, url: &str, codes: &[u16]) -> Result<u16> {
        self.post_with(url, None, StatusCodeHandler, codes)
    }

    pub fn post_with<H: ResponseHandler>(
        &self,
        url: &str,
        body: Option<RequestBody>,
        handler: H,
        codes: &[u16],
    ) -> Result<H::Output> {
        self.execute(Request::post(url, body), handler, codes)
    }

    /// POST with extra headers applied after the defaults
    pub fn post_with_headers<H: ResponseHandler>(
        &self,
        url: &str,
        body: Option<RequestBody>,
        headers: &[(&str, &str)],
        handler: H,
        codes: &[u16],
    ) -> Result<H::Output> {
        let request = headers
            .iter()
            .fold(Request::post(url, body), |request, (name, value)| {
                request.with_header(*name, *value)
            });
        self.execute(request, handler, codes)
    }

    /// PUT returning the status code; the response body is ignored
    pub fn put(&self, url: &str, body: Option<RequestBody>, codes: &[u16]) -> Result<u16> {
        self.execute(Request::put(url, body), StatusCodeHandler, codes)
    }

    /// DELETE returning the status code
    pub fn delete(&self, url: &str, codes: &[u16]) -> Result<u16> {
        self.delete_with(url, StatusCodeHandler, codes)
    }

    pub fn delete_with<H: ResponseHandler>(
        &self,
        url: &str,
        handler: H,
        codes: &[u16],
    ) -> Result<H::Output> {
        self.execute(Request::delete(url), handler, codes)
    }

    fn execute<H: ResponseHandler>(
        &self,
        request: Request,
        handler: H,
        codes: &[u16],
    ) -> Result<H::Output> {
        debug!("HTTP {} {}", request.method(), request.url());
        let validator = validate(codes, handler);
        let mut response = self.transport.execute(request)?;
        validator.handle(&mut response)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use reqwest::Method;

    use super::*;
    use crate::handler::{from_fn, BodyAndStatus, BodyAndStatusHandler};
    use crate::response::{tests::TrackedBody, Response};

    type Responder = Box<dyn Fn(&Request) -> Response + Send + Sync>;

    /// In-memory transport recording every request it sees
    struct MockTransport {
        requests: Mutex<Vec<Request>>,
        respond: Responder,
    }

    impl MockTransport {
        fn new(respond: impl Fn(&Request) -> Response + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: Request) -> Result<Response> {
            let response = (self.respond)(&request);
            self.requests.lock().unwrap().push(request);
            Ok(response)
        }
    }

    struct MockBuilder {
        transport: Arc<MockTransport>,
        pooled: AtomicUsize,
        basic: AtomicUsize,
        basic_error: Option<fn() -> HttpError>,
    }

    impl MockBuilder {
        fn new(transport: Arc<MockTransport>) -> Self {
            Self {
                transport,
                pooled: AtomicUsize::new(0),
                basic: AtomicUsize::new(0),
                basic_error: None,
            }
        }
    }

    impl ClientBuilder for MockBuilder {
        fn build_pooled_client(&self) -> Result<Arc<dyn Transport>> {
            self.pooled.fetch_add(1, Ordering::SeqCst);
            Ok(self.transport.clone())
        }

        fn build_basic_client(&self) -> Result<Arc<dyn Transport>> {
            self.basic.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.basic_error {
                return Err(error());
            }
            Ok(self.transport.clone())
        }
    }

    fn client(
        respond: impl Fn(&Request) -> Response + Send + Sync + 'static,
    ) -> (HttpClient, Arc<MockTransport>) {
        let transport = MockTransport::new(respond);
        let client = HttpClient::new(MockBuilder::new(transport.clone())).unwrap();
        (client, transport)
    }

    #[test]
    fn test_get_returns_body() {
        let (client, transport) = client(|_| Response::new(200, "OK").with_body(r#"{"a":1}"#));

        let body = client.get("http://daemon/x", &[200]).unwrap();
        assert_eq!(body, Some(r#"{"a":1}"#.to_string()));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method(), &Method::GET);
        assert_eq!(requests[0].url(), "http://daemon/x");
        assert!(requests[0].body().is_none());
    }

    #[test]
    fn test_get_with_custom_handler() {
        let (client, _) = client(|_| Response::new(200, "OK").with_body("3"));
        let handler = from_fn(|response: &mut Response| {
            Ok(response.text()?.and_then(|t| t.parse::<u32>().ok()))
        });
        assert_eq!(client.get_with("http://daemon/n", handler, &[200]).unwrap(), Some(3));
    }

    #[test]
    fn test_post_rejected_status() {
        let (client, transport) = client(|_| Response::new(404, "Not Found").with_body("not found"));

        let err = client.post("http://daemon/x", &[201]).unwrap_err();
        assert_eq!(err.to_string(), "not found (Not Found: 404)");
        assert!(err.is_not_found());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_post_with_body_and_headers() {
        let (client, transport) = client(|_| Response::new(201, "Created").with_body(r#"{"Id":"c1"}"#));

        let result = client
            .post_with_headers(
                "http://daemon/containers/create",
                Some(r#"{"Image":"alpine"}"#.into()),
                &[("X-Registry-Auth", "e30="), ("Content-Type", "application/x-tar")],
                BodyAndStatusHandler,
                &[201],
            )
            .unwrap();
        assert_eq!(
            result,
            BodyAndStatus {
                status_code: 201,
                body: Some(r#"{"Id":"c1"}"#.to_string()),
            }
        );

        let request = &transport.requests()[0];
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.header("X-Registry-Auth"), Some("e30="));
        assert_eq!(request.header("Content-Type"), Some("application/x-tar"));
        assert_eq!(request.header("Accept"), Some("*/*"));
        assert_eq!(
            request.body(),
            Some(&RequestBody::Text(r#"{"Image":"alpine"}"#.to_string()))
        );
    }

    #[test]
    fn test_put_returns_status_and_drains_body() {
        let body = TrackedBody::new("ignored body");
        let exhausted = body.exhausted.clone();
        let body = Mutex::new(Some(body));
        let (client, transport) = client(move |_| {
            let response = Response::new(201, "Created");
            match body.lock().unwrap().take() {
                Some(body) => response.with_reader(body),
                None => response,
            }
        });

        let status = client
            .put("http://daemon/containers/c1/archive", Some("data".into()), &[200, 201])
            .unwrap();
        assert_eq!(status, 201);
        assert!(exhausted.load(Ordering::SeqCst));
        assert_eq!(transport.requests()[0].method(), &Method::PUT);
    }

    #[test]
    fn test_delete_variants() {
        let (client, transport) = client(|_| Response::new(204, "No Content"));

        assert_eq!(client.delete("http://daemon/containers/c1", &[204]).unwrap(), 204);
        assert_eq!(
            client
                .delete_with("http://daemon/containers/c1", BodyHandler, &[204])
                .unwrap(),
            None
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.method() == Method::DELETE));
    }

    #[test]
    fn test_empty_codes_reject_success() {
        let (client, _) = client(|_| Response::new(200, "OK").with_body("fine"));
        let err = client.get("http://daemon/x", &[]).unwrap_err();
        assert_eq!(err.to_string(), "fine (OK: 200)");
    }

    #[test]
    fn test_pooling_choice() {
        let transport = MockTransport::new(|_| Response::new(200, "OK"));

        let builder = MockBuilder::new(transport.clone());
        let pooled = HttpClient::with_pooling(builder, true).unwrap();
        assert_eq!(pooled.get("http://daemon/_ping", &[200]).unwrap(), None);

        let basic = HttpClient::with_pooling(MockBuilder::new(transport.clone()), false).unwrap();
        assert!(basic.create_basic_client().is_ok());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_create_basic_client_passes_build_error_through() {
        let transport = MockTransport::new(|_| Response::new(200, "OK"));
        let mut builder = MockBuilder::new(transport);
        builder.basic_error = Some(|| HttpError::BuildError("no socket".to_string()));

        let client = HttpClient::new(builder).unwrap();
        let err = client.create_basic_client().err().unwrap();
        assert_eq!(err.to_string(), "Failed to build HTTP client: no socket");
    }

    #[test]
    fn test_create_basic_client_wraps_other_errors() {
        let transport = MockTransport::new(|_| Response::new(200, "OK"));
        let mut builder = MockBuilder::new(transport);
        builder.basic_error = Some(|| HttpError::InvalidProxy("bad scheme".to_string()));

        let client = HttpClient::new(builder).unwrap();
        let err = client.create_basic_client().err().unwrap();
        assert_eq!(
            err.to_string(),
            "Failed to build HTTP client: Cannot create single HTTP client: \
             Invalid proxy configuration: bad scheme"
        );
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_with_defaults() {
        assert!(HttpClient::with_defaults().is_ok());
    }
}
