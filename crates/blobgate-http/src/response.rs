//! Response encoding for handler outputs and errors.
//!
//! Successful results are converted through [`IntoS3Response`]:
//!
//! - **Header-only**: bucket creation, object writes, deletes, and `HeadObject`.
//! - **XML body**: bucket and object listings, copy results.
//! - **Raw body**: `GetObject` passes the object bytes through.
//!
//! Failures are converted by [`error_to_response`].

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{self, HeaderValue};
use http::{Method, StatusCode};
use tracing::{error, warn};

use blobgate_model::error::{ErrorCode, S3Error};
use blobgate_model::output::{
    CopyObjectOutput, CreateBucketOutput, DeleteBucketOutput, DeleteObjectOutput,
    GetObjectOutput, HeadBucketOutput, HeadObjectOutput, ListBucketsOutput, ListObjectsOutput,
    PutObjectOutput,
};
use blobgate_xml::{S3Serialize, to_xml};

use crate::body::S3ResponseBody;

/// Content type of every XML body.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Methods advertised in the `Allow` header of `MethodNotAllowed` responses.
pub const ALLOWED_READ_METHODS: &str = "GET, HEAD";

/// Trait for converting a handler output into an HTTP response.
pub trait IntoS3Response {
    /// Convert this output into an HTTP response.
    ///
    /// # Errors
    ///
    /// Returns an `S3Error` if the body cannot be serialized or the response
    /// cannot be built.
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error>;
}

/// Set a header on a response builder if the value is a valid header value.
fn set_header(builder: http::response::Builder, name: &str, value: &str) -> http::response::Builder {
    match HeaderValue::from_str(value) {
        Ok(hv) => builder.header(name, hv),
        Err(_) => {
            warn!(header = name, "dropping invalid response header value");
            builder
        }
    }
}

/// Set an HTTP date header from a `DateTime<Utc>`.
fn set_timestamp_header(
    builder: http::response::Builder,
    name: &str,
    value: &DateTime<Utc>,
) -> http::response::Builder {
    let formatted = value.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    set_header(builder, name, &formatted)
}

/// Build a response from a builder, converting build errors to `S3Error`.
fn build_response(
    builder: http::response::Builder,
    body: S3ResponseBody,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    builder
        .body(body)
        .map_err(|e| S3Error::internal_error(format!("failed to build HTTP response: {e}")))
}

/// Build a 200 response carrying `value` as an XML document under `root`.
fn xml_response<T: S3Serialize>(
    root: &str,
    value: &T,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let xml = to_xml(root, value)?;
    let builder = http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, xml.len());
    build_response(builder, S3ResponseBody::from_bytes(xml))
}

fn no_content() -> Result<http::Response<S3ResponseBody>, S3Error> {
    build_response(
        http::Response::builder().status(StatusCode::NO_CONTENT),
        S3ResponseBody::empty(),
    )
}

// --- Bucket operations ---

impl IntoS3Response for CreateBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let builder = http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, "0");
        build_response(
            set_header(builder, "Location", &self.location),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for DeleteBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        no_content()
    }
}

impl IntoS3Response for HeadBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build_response(
            http::Response::builder().status(StatusCode::OK),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for ListBucketsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("ListAllMyBucketsResult", &self)
    }
}

impl IntoS3Response for ListObjectsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("ListBucketResult", &self)
    }
}

// --- Object operations ---

impl IntoS3Response for PutObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let builder = http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, "0");
        build_response(
            set_header(builder, "ETag", &self.e_tag),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for CopyObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("CopyObjectResult", &self)
    }
}

impl IntoS3Response for GetObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let mut builder = http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, self.body.len());
        builder = set_timestamp_header(builder, "Last-Modified", &self.last_modified);
        builder = set_header(builder, "ETag", &self.e_tag);
        build_response(builder, S3ResponseBody::from_bytes(self.body))
    }
}

impl IntoS3Response for HeadObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let mut builder = http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, self.content_length);
        builder = set_timestamp_header(builder, "Last-Modified", &self.last_modified);
        builder = set_header(builder, "ETag", &self.e_tag);
        build_response(builder, S3ResponseBody::empty())
    }
}

impl IntoS3Response for DeleteObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        no_content()
    }
}

// --- Errors ---

/// Convert an error into an XML error response.
///
/// - Codes without an HTTP status are sent as 500 with their own code.
/// - `MethodNotAllowed` carries an `Allow` header.
/// - `Content-Length` is the encoded document length; HEAD requests get the
///   headers without the body.
pub fn error_to_response(
    method: &Method,
    err: &S3Error,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    if err.code == ErrorCode::InternalError {
        error!(error = %err, request_id, "internal error");
    }

    let status = err.code.http_status().unwrap_or_else(|| {
        warn!(code = %err.code, request_id, "informational error code sent as 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let xml = blobgate_xml::error_to_xml(
        err.code.as_str(),
        err.message(),
        err.resource.as_deref().unwrap_or(""),
        request_id,
    );

    let mut builder = http::Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, xml.len());
    if err.code == ErrorCode::MethodNotAllowed {
        builder = builder.header(header::ALLOW, ALLOWED_READ_METHODS);
    }

    let body = if *method == Method::HEAD {
        S3ResponseBody::empty()
    } else {
        S3ResponseBody::from_bytes(Bytes::from(xml))
    };

    // The status and headers are all static or numeric, so building cannot fail.
    builder.body(body).unwrap_or_else(|e| {
        error!(error = %e, request_id, "failed to build error response");
        let mut fallback = http::Response::new(S3ResponseBody::empty());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
