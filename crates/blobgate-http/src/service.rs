//! The hyper `Service` tying classification, dispatch, and encoding together.
//!
//! For every request [`S3HttpService`]:
//!
//! 1. Assigns a request id (UUID v4)
//! 2. Answers health probes (`GET /_health`)
//! 3. Classifies the request via [`S3Router`]
//! 4. Collects the request body, up to the configured body limit
//! 5. Dispatches to the [`S3Handler`]
//! 6. Encodes handler errors via [`error_to_response`]
//! 7. Adds common headers (`x-amz-request-id`, `Server`)

use std::convert::Infallible;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use blobgate_model::error::{ErrorCode, S3Error};

use crate::body::S3ResponseBody;
use crate::dispatch::{S3Handler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::S3Router;

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = "BlobGate";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-amz-request-id";

/// Largest request body accepted unless configured otherwise (5 GiB).
pub const DEFAULT_BODY_LIMIT: u64 = 5 * 1024 * 1024 * 1024;

/// The only path answered as a health probe. The leading underscore keeps it
/// out of the bucket namespace.
pub const HEALTH_PATH: &str = "/_health";

/// The gateway's HTTP service.
///
/// # Type Parameters
///
/// - `H`: The handler implementing [`S3Handler`].
#[derive(Debug)]
pub struct S3HttpService<H: S3Handler> {
    handler: Arc<H>,
    router: S3Router,
    body_limit: u64,
}

impl<H: S3Handler> S3HttpService<H> {
    /// Create a new service around `handler`.
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self::from_shared(Arc::new(handler))
    }

    /// Create a new service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>) -> Self {
        Self {
            handler,
            router: S3Router::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Reject request bodies larger than `limit` bytes with `EntityTooLarge`.
    #[must_use]
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<H: S3Handler> Clone for S3HttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router,
            body_limit: self.body_limit,
        }
    }
}

impl<H: S3Handler> Service<http::Request<Incoming>> for S3HttpService<H> {
    type Response = http::Response<S3ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let router = self.router;
        let body_limit = self.body_limit;

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response =
                process_request(req, handler.as_ref(), router, body_limit, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Run one request through the gateway pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    router: S3Router,
    body_limit: u64,
    request_id: &str,
) -> http::Response<S3ResponseBody>
where
    H: S3Handler,
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    let query = router.resolve(&req);
    info!(
        operation = %query.operation,
        bucket = %query.destination.bucket,
        key = %query.destination.key,
        request_id,
        "classified request"
    );

    if let Some(declared) = declared_length(req.headers()) {
        if declared > body_limit {
            warn!(declared, body_limit, request_id, "declared body exceeds limit");
            return error_to_response(&method, &entity_too_large(body_limit), request_id);
        }
    }

    let (parts, incoming) = req.into_parts();
    let body = match collect_body(incoming, body_limit).await {
        Ok(body) => body,
        Err(err) if err.is::<LengthLimitError>() => {
            warn!(body_limit, request_id, "request body exceeds limit");
            return error_to_response(&method, &entity_too_large(body_limit), request_id);
        }
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return error_to_response(&method, &S3Error::untagged(err), request_id);
        }
    };

    match dispatch_operation(handler, query, parts, body).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "operation returned error");
            error_to_response(&method, &err, request_id)
        }
    }
}

/// Collect at most `limit` bytes of body into `Bytes`.
async fn collect_body<B>(body: B, limit: u64) -> Result<Bytes, Box<dyn StdError + Send + Sync>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let collected = Limited::new(body, limit).collect().await?;
    Ok(collected.to_bytes())
}

/// The request's `Content-Length`, if present and numeric.
fn declared_length(headers: &http::HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn entity_too_large(limit: u64) -> S3Error {
    S3Error::with_message(
        ErrorCode::EntityTooLarge,
        format!("request body exceeds the maximum of {limit} bytes"),
    )
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && path == HEALTH_PATH
}

/// Produce a health check response.
fn health_check_response() -> http::Response<S3ResponseBody> {
    let mut response = http::Response::new(S3ResponseBody::from_static(
        r#"{"status":"running","service":"blobgate"}"#,
    ));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<S3ResponseBody>,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, hv);
    }
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));

    response
}

#[cfg(test)]
mod tests {
    use blobgate_model::operations::Operation;
    use blobgate_model::query::Query;
    use http_body_util::{BodyExt, Full};

    use super::*;
    use crate::dispatch::HandlerFuture;

    /// Answers 200 with the operation name and the received body length.
    #[derive(Debug)]
    struct EchoHandler;

    impl S3Handler for EchoHandler {
        fn handle_operation(
            &self,
            query: Query,
            _parts: http::request::Parts,
            body: Bytes,
        ) -> HandlerFuture {
            Box::pin(async move {
                let text = format!("{} {}", query.operation, body.len());
                Ok(http::Response::new(S3ResponseBody::from_bytes(Bytes::from(
                    text,
                ))))
            })
        }
    }

    async fn run(
        method: http::Method,
        uri: &str,
        content_length: Option<&str>,
        body: &'static [u8],
        body_limit: u64,
    ) -> (http::StatusCode, String) {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(len) = content_length {
            builder = builder.header(header::CONTENT_LENGTH, len);
        }
        let req = builder
            .body(Full::new(Bytes::from_static(body)))
            .expect("valid request");
        let resp = process_request(req, &EchoHandler, S3Router::new(), body_limit, "req-1").await;
        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_should_reject_oversized_declared_length_before_reading_body() {
        let (status, body) = run(
            http::Method::PUT,
            "/b/k",
            Some("1000000000"),
            b"0123456789",
            16,
        )
        .await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert!(body.contains("<Code>EntityTooLarge</Code>"));
    }

    #[tokio::test]
    async fn test_should_reject_body_growing_past_limit() {
        let (status, body) = run(
            http::Method::PUT,
            "/b/k",
            None,
            b"0123456789abcdefXYZ",
            16,
        )
        .await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert!(body.contains("<Code>EntityTooLarge</Code>"));
    }

    #[tokio::test]
    async fn test_should_pass_body_within_limit_to_handler() {
        let (status, body) = run(
            http::Method::PUT,
            "/b/k",
            Some("10"),
            b"0123456789",
            16,
        )
        .await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, format!("{} 10", Operation::PutObject));
    }

    #[tokio::test]
    async fn test_should_route_health_bucket_to_listing() {
        let (status, body) = run(http::Method::GET, "/health", None, b"", 16).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, format!("{} 0", Operation::GetBucket));

        let (_, body) = run(http::Method::GET, "/_health", None, b"", 16).await;
        assert!(body.starts_with("{\"status\":\"running\""));
    }

    #[test]
    fn test_should_detect_health_check_paths() {
        assert!(is_health_check(&http::Method::GET, "/_health"));
        assert!(!is_health_check(&http::Method::GET, "/health"));
        assert!(!is_health_check(&http::Method::POST, "/_health"));
        assert!(!is_health_check(&http::Method::GET, "/mybucket"));
        assert!(!is_health_check(&http::Method::GET, "/health/extra"));
    }

    #[tokio::test]
    async fn test_should_produce_health_check_response() {
        let resp = health_check_response();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("Content-Type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
        let body = resp
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert!(body.starts_with(b"{\"status\":\"running\""));
    }

    #[test]
    fn test_should_add_common_headers() {
        let resp = http::Response::builder()
            .status(http::StatusCode::OK)
            .body(S3ResponseBody::empty())
            .expect("valid response");
        let resp = add_common_headers(resp, "test-request-id");
        assert_eq!(
            resp.headers()
                .get("x-amz-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("test-request-id"),
        );
        assert_eq!(
            resp.headers().get("Server").and_then(|v| v.to_str().ok()),
            Some("BlobGate"),
        );
    }
}
