//! Operation dispatch: hands a classified [`Query`] to the handler.
//!
//! The HTTP layer knows nothing about storage. [`S3Handler`] is the seam where
//! the server binary plugs in its dispatch table; [`NotImplementedHandler`]
//! answers every operation with `NotImplemented`.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use blobgate_model::error::S3Error;
use blobgate_model::query::Query;

use crate::body::S3ResponseBody;

/// The boxed future returned by [`S3Handler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<S3ResponseBody>, S3Error>> + Send>>;

/// Trait that the operation handlers must implement.
///
/// Boxed futures keep the trait usable behind `Arc<dyn S3Handler>`.
pub trait S3Handler: Send + Sync + 'static {
    /// Handle a classified request and produce an HTTP response.
    fn handle_operation(
        &self,
        query: Query,
        parts: http::request::Parts,
        body: Bytes,
    ) -> HandlerFuture;
}

/// Dispatch a classified request to the handler.
pub async fn dispatch_operation<H: S3Handler + ?Sized>(
    handler: &H,
    query: Query,
    parts: http::request::Parts,
    body: Bytes,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    tracing::debug!(
        operation = %query.operation,
        bucket = %query.destination.bucket,
        key = %query.destination.key,
        "dispatching operation"
    );
    handler.handle_operation(query, parts, body).await
}

/// A handler that answers every operation with `NotImplemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotImplementedHandler;

impl S3Handler for NotImplementedHandler {
    fn handle_operation(
        &self,
        query: Query,
        _parts: http::request::Parts,
        _body: Bytes,
    ) -> HandlerFuture {
        Box::pin(async move { Err(S3Error::not_implemented(query.operation.as_str())) })
    }
}
