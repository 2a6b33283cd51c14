//! The dispatch table bridging the HTTP layer and [`BlobGateway`].
//!
//! [`GatewayHandler`] implements [`S3Handler`] with one closed match over
//! [`Operation`]. Implemented operations delegate to a `handle_*` method on
//! [`BlobGateway`] and are encoded via [`IntoS3Response`]; everything else is
//! answered with `NotImplemented`.

use bytes::Bytes;
use http::header::CONTENT_LENGTH;

use blobgate_core::BlobGateway;
use blobgate_http::dispatch::{HandlerFuture, S3Handler};
use blobgate_http::response::IntoS3Response;
use blobgate_model::error::{ErrorCode, S3Error};
use blobgate_model::operations::Operation;
use blobgate_model::query::Query;

/// Wrapper that implements [`S3Handler`] by delegating to [`BlobGateway`].
#[derive(Debug, Clone)]
pub struct GatewayHandler(pub BlobGateway);

impl S3Handler for GatewayHandler {
    fn handle_operation(
        &self,
        query: Query,
        parts: http::request::Parts,
        body: Bytes,
    ) -> HandlerFuture {
        let gateway = self.0.clone();
        Box::pin(async move {
            let dest = &query.destination;

            match query.operation {
                Operation::PutBucket => gateway.handle_put_bucket(dest)?.into_s3_response(),
                Operation::DeleteBucket => gateway.handle_delete_bucket(dest)?.into_s3_response(),
                Operation::HeadBucket => gateway.handle_head_bucket(dest)?.into_s3_response(),
                Operation::ListBuckets => gateway.handle_list_buckets().into_s3_response(),
                Operation::GetBucket => gateway
                    .handle_get_bucket(dest, &query.listing)?
                    .into_s3_response(),

                Operation::PutObject if query.has_copy_source() => gateway
                    .handle_copy_object(dest, &query.source)?
                    .into_s3_response(),
                Operation::PutObject => gateway
                    .handle_put_object(dest, declared_length(&parts), body)?
                    .into_s3_response(),
                Operation::GetObject => gateway.handle_get_object(dest)?.into_s3_response(),
                Operation::HeadObject => gateway.handle_head_object(dest)?.into_s3_response(),
                Operation::RemoveObject => gateway.handle_remove_object(dest)?.into_s3_response(),

                Operation::MalformedRequest => Err(S3Error::with_message(
                    ErrorCode::InvalidArgument,
                    "The request is malformed.",
                )),

                op @ (Operation::GetBucketVersions
                | Operation::CopyObject
                | Operation::InitMultipartUpload
                | Operation::MultipartUploadPart
                | Operation::ListMultipartUpload
                | Operation::CompleteMultipartUpload
                | Operation::AbortMultipartUpload
                | Operation::ListBucketMultipartUploads
                | Operation::DeleteObjects
                | Operation::NotImplemented) => Err(S3Error::not_implemented(op.as_str())),
            }
        })
    }
}

/// The request's `Content-Length`, if present and numeric.
fn declared_length(parts: &http::request::Parts) -> Option<u64> {
    parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
