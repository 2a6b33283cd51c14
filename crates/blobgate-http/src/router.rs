//! Request classification: turning an HTTP request into a [`Query`].
//!
//! Classification looks at:
//!
//! - The HTTP method (GET, PUT, DELETE, POST, HEAD)
//! - The bucket and key taken from the path (`/{bucket}/{key...}`)
//! - Query parameters that select sub-resources or carry pagination state
//! - The `x-amz-copy-source` header on object PUTs
//!
//! Classification is total. Request shapes that cannot be served become
//! [`Operation::NotImplemented`] or [`Operation::MalformedRequest`] instead of an
//! error, and unparseable pagination values fall back to their defaults.

use blobgate_model::operations::Operation;
use blobgate_model::query::{ListingCursor, ListingVersion, MultipartCursor, ObjectRef, Query};
use http::{HeaderMap, Method};
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

/// Header naming the source object of a server-side copy.
pub const COPY_SOURCE_HEADER: &str = "x-amz-copy-source";

/// Sub-resources that are recognized but never served.
const UNSUPPORTED_SUBRESOURCES: [&str; 5] = ["acl", "lifecycle", "policy", "tagging", "versioning"];

/// Maps inbound requests to classified [`Query`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Router;

impl S3Router {
    /// Create a new router.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify an HTTP request.
    ///
    /// The path is percent-decoded and the query string is parsed as
    /// `application/x-www-form-urlencoded` before [`classify`] runs.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Query {
        let uri = req.uri();
        let path = decode_uri_component(uri.path());
        let params = parse_query_params(uri.query().unwrap_or(""));
        classify(req.method(), &path, &params, req.headers())
    }
}

/// Classify a request from its decoded path, query parameters, and headers.
///
/// This never fails; see the module documentation for the fallback rules.
#[must_use]
pub fn classify(
    method: &Method,
    path: &str,
    params: &[(String, String)],
    headers: &HeaderMap,
) -> Query {
    let query = build_query(method, path, params, headers);
    debug!(
        %method,
        path,
        operation = %query.operation,
        bucket = %query.destination.bucket,
        key = %query.destination.key,
        "classified request"
    );
    query
}

fn build_query(
    method: &Method,
    path: &str,
    params: &[(String, String)],
    headers: &HeaderMap,
) -> Query {
    let (bucket, key) = split_bucket_and_key(path);

    let mut query = Query::new(Operation::NotImplemented);
    query.listing = parse_listing_cursor(params);
    query.multipart = parse_multipart_cursor(params);
    query.is_batch_delete = query_has_key(params, "delete");
    query.destination.bucket = bucket.to_owned();

    if UNSUPPORTED_SUBRESOURCES
        .iter()
        .any(|name| query_has_key(params, name))
    {
        return query;
    }

    if bucket.is_empty() && !key.is_empty() {
        query.operation = Operation::MalformedRequest;
        return query;
    }

    if key.is_empty() {
        query.operation = if bucket.is_empty() {
            Operation::ListBuckets
        } else {
            identify_bucket_operation(method, &query, params)
        };
        return query;
    }

    query.destination.key = key.to_owned();
    query.destination.version_id = query_value(params, "versionId").map(str::to_owned);
    query.operation = identify_object_operation(method, &mut query, headers);
    query
}

/// Identify a bucket-level operation (bucket present, no key).
fn identify_bucket_operation(
    method: &Method,
    query: &Query,
    params: &[(String, String)],
) -> Operation {
    match *method {
        Method::GET => {
            if query.multipart.requested {
                Operation::ListBucketMultipartUploads
            } else if query_has_key(params, "versions") {
                Operation::GetBucketVersions
            } else {
                Operation::GetBucket
            }
        }
        Method::DELETE => Operation::DeleteBucket,
        Method::PUT => Operation::PutBucket,
        Method::HEAD => Operation::HeadBucket,
        Method::POST if query.is_batch_delete => Operation::DeleteObjects,
        _ => Operation::NotImplemented,
    }
}

/// Identify an object-level operation (bucket and key present).
fn identify_object_operation(method: &Method, query: &mut Query, headers: &HeaderMap) -> Operation {
    let has_upload_id = query.multipart.has_upload_id();
    match *method {
        Method::GET if has_upload_id => Operation::ListMultipartUpload,
        Method::GET => Operation::GetObject,
        Method::PUT => {
            if let Some(raw) = headers.get(COPY_SOURCE_HEADER) {
                query.source = parse_copy_source(&String::from_utf8_lossy(raw.as_bytes()));
                if !query.has_copy_source() || !query.destination.is_object() {
                    return Operation::MalformedRequest;
                }
            }
            if has_upload_id {
                Operation::MultipartUploadPart
            } else {
                Operation::PutObject
            }
        }
        Method::DELETE if has_upload_id => Operation::AbortMultipartUpload,
        Method::DELETE => Operation::RemoveObject,
        Method::HEAD => Operation::HeadObject,
        Method::POST if has_upload_id => Operation::CompleteMultipartUpload,
        Method::POST if query.multipart.requested => Operation::InitMultipartUpload,
        _ => Operation::NotImplemented,
    }
}

fn parse_listing_cursor(params: &[(String, String)]) -> ListingCursor {
    let mut cursor = ListingCursor {
        prefix: query_string(params, "prefix"),
        delimiter: query_string(params, "delimiter"),
        marker: query_string(params, "marker"),
        key_marker: query_string(params, "key-marker"),
        version_id_marker: query_string(params, "version-id-marker"),
        ..ListingCursor::default()
    };

    if query_value(params, "list-type") == Some("2") {
        cursor.version = ListingVersion::V2;
        cursor.marker = match query_value(params, "continuation-token") {
            Some(token) if !token.is_empty() => token.to_owned(),
            _ => query_string(params, "start-after"),
        };
    }

    cursor.max_keys = parse_int_param(params, "max-keys", cursor.max_keys);
    cursor
}

fn parse_multipart_cursor(params: &[(String, String)]) -> MultipartCursor {
    let defaults = MultipartCursor::default();
    MultipartCursor {
        requested: query_has_key(params, "uploads"),
        upload_id: query_string(params, "uploadId"),
        part_number: parse_int_param(params, "partNumber", defaults.part_number),
        max_parts: parse_int_param(params, "max-parts", defaults.max_parts),
        part_number_marker: parse_int_param(
            params,
            "part-number-marker",
            defaults.part_number_marker,
        ),
        key_marker: query_string(params, "key-marker"),
        upload_id_marker: query_string(params, "upload-id-marker"),
        max_uploads: parse_int_param(params, "max-uploads", defaults.max_uploads),
    }
}

/// Parse an integer parameter, keeping `default` when it is absent, empty, or
/// not a 32-bit integer.
fn parse_int_param(params: &[(String, String)], name: &str, default: i32) -> i32 {
    match query_value(params, name) {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(param = name, value = raw, error = %e, "ignoring unparseable integer parameter");
            default
        }),
    }
}

/// Parse an `x-amz-copy-source` value (`[/]bucket/key[?versionId=id]`).
///
/// The bucket/key part is query-unescaped; a value that does not unescape
/// cleanly is used as is.
fn parse_copy_source(raw: &str) -> ObjectRef {
    let (path, version_id) = match raw.split_once("?versionId=") {
        Some((path, version)) => (path, Some(version.to_owned())),
        None => (raw, None),
    };

    let decoded = query_unescape(path).unwrap_or_else(|| {
        warn!(value = path, "copy source is not a valid escaped string, using raw value");
        path.to_owned()
    });

    let (bucket, key) = split_bucket_and_key(&decoded);
    ObjectRef {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        version_id,
    }
}

/// Strictly unescape a query-style component: `+` becomes a space and every
/// `%` must start a two-digit hex escape. Escapes that do not form valid
/// UTF-8 decode to U+FFFD.
fn query_unescape(s: &str) -> Option<String> {
    let well_formed = s.split('%').skip(1).all(|rest| {
        rest.as_bytes()
            .get(..2)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return None;
    }

    let spaced = s.replace('+', " ");
    Some(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
}

/// Strip one leading `/` and split on the first remaining `/`.
fn split_bucket_and_key(path: &str) -> (&str, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed.split_once('/').unwrap_or((trimmed, ""))
}

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into key-value pairs.
fn parse_query_params(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Look up a query parameter by name.
fn query_has_key(params: &[(String, String)], key: &str) -> bool {
    params.iter().any(|(k, _)| k == key)
}

/// Get the first value of a query parameter by name.
fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Get the first value of a query parameter, or an empty string.
fn query_string(params: &[(String, String)], key: &str) -> String {
    query_value(params, key).unwrap_or_default().to_owned()
}
