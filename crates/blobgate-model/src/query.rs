//! The classified request descriptor and its parts.
//!
//! A [`Query`] is built fresh for every request by the classifier and is
//! consumed once by the dispatcher.

use crate::operations::Operation;

/// Default page size for object and bucket listings.
pub const DEFAULT_MAX_KEYS: i32 = 1000;

/// Default page size for multipart upload listings.
pub const DEFAULT_MAX_UPLOADS: i32 = 1000;

/// Default page size for part listings.
pub const DEFAULT_MAX_PARTS: i32 = 1000;

/// A bucket/key pair, optionally pinned to a version.
///
/// `key` is empty for bucket-level references; `bucket` is always set when
/// `key` is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRef {
    /// The bucket name.
    pub bucket: String,
    /// The object key, empty for bucket-level references.
    pub key: String,
    /// The requested object version.
    pub version_id: Option<String>,
}

impl ObjectRef {
    /// Create a reference to `bucket`/`key` without a version.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            version_id: None,
        }
    }

    /// Whether this reference names an object rather than a bucket.
    #[must_use]
    pub fn is_object(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Listing schema version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingVersion {
    /// `marker`-based pagination.
    #[default]
    V1,
    /// `continuation-token`/`start-after` pagination (`list-type=2`).
    V2,
}

impl ListingVersion {
    /// The numeric schema version.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

/// Pagination state for bucket listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCursor {
    /// Listing schema version.
    pub version: ListingVersion,
    /// Only keys starting with this prefix are listed.
    pub prefix: String,
    /// Keys are grouped into common prefixes at this delimiter.
    pub delimiter: String,
    /// Listing starts after this key. In v2 this is the continuation token,
    /// or `start-after` when no token was sent.
    pub marker: String,
    /// Version listing key marker.
    pub key_marker: String,
    /// Version listing version marker, used together with `key_marker`.
    pub version_id_marker: String,
    /// Maximum number of keys returned.
    pub max_keys: i32,
}

impl Default for ListingCursor {
    fn default() -> Self {
        Self {
            version: ListingVersion::V1,
            prefix: String::new(),
            delimiter: String::new(),
            marker: String::new(),
            key_marker: String::new(),
            version_id_marker: String::new(),
            max_keys: DEFAULT_MAX_KEYS,
        }
    }
}

/// Identification and pagination state for multipart operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartCursor {
    /// The `uploads` parameter was present.
    pub requested: bool,
    /// The upload being addressed.
    pub upload_id: String,
    /// The part being uploaded.
    pub part_number: i32,
    /// Maximum number of parts listed.
    pub max_parts: i32,
    /// Parts are listed after this part number.
    pub part_number_marker: i32,
    /// Uploads are listed after this key.
    pub key_marker: String,
    /// Uploads are listed after this upload id, used together with `key_marker`.
    pub upload_id_marker: String,
    /// Maximum number of uploads listed.
    pub max_uploads: i32,
}

impl Default for MultipartCursor {
    fn default() -> Self {
        Self {
            requested: false,
            upload_id: String::new(),
            part_number: 0,
            max_parts: DEFAULT_MAX_PARTS,
            part_number_marker: 0,
            key_marker: String::new(),
            upload_id_marker: String::new(),
            max_uploads: DEFAULT_MAX_UPLOADS,
        }
    }
}

impl MultipartCursor {
    /// Whether an upload id was supplied.
    #[must_use]
    pub fn has_upload_id(&self) -> bool {
        !self.upload_id.is_empty()
    }
}

/// The classifier's output: one operation plus everything needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The classified operation.
    pub operation: Operation,
    /// The addressed bucket/object.
    pub destination: ObjectRef,
    /// The copy source, empty unless `x-amz-copy-source` was sent.
    pub source: ObjectRef,
    /// Listing cursor.
    pub listing: ListingCursor,
    /// Multipart cursor.
    pub multipart: MultipartCursor,
    /// The `delete` parameter was present.
    pub is_batch_delete: bool,
}

impl Query {
    /// Create a query for `operation` with default cursors.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            destination: ObjectRef::default(),
            source: ObjectRef::default(),
            listing: ListingCursor::default(),
            multipart: MultipartCursor::default(),
            is_batch_delete: false,
        }
    }

    /// Whether the request names a complete copy source.
    #[must_use]
    pub fn has_copy_source(&self) -> bool {
        !self.source.bucket.is_empty() && !self.source.key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_default_listing_cursor() {
        let cursor = ListingCursor::default();
        assert_eq!(cursor.version, ListingVersion::V1);
        assert_eq!(cursor.version.as_u8(), 1);
        assert_eq!(cursor.max_keys, 1000);
        assert!(cursor.marker.is_empty());
    }

    #[test]
    fn test_should_default_multipart_cursor() {
        let cursor = MultipartCursor::default();
        assert!(!cursor.requested);
        assert!(!cursor.has_upload_id());
        assert_eq!(cursor.max_parts, 1000);
        assert_eq!(cursor.max_uploads, 1000);
        assert_eq!(cursor.part_number, 0);
        assert_eq!(cursor.part_number_marker, 0);
    }

    #[test]
    fn test_should_require_bucket_and_key_for_copy_source() {
        let mut query = Query::new(Operation::PutObject);
        assert!(!query.has_copy_source());

        query.source = ObjectRef::new("src", "");
        assert!(!query.has_copy_source());

        query.source = ObjectRef::new("src", "a/b");
        assert!(query.has_copy_source());
    }

    #[test]
    fn test_should_distinguish_object_refs() {
        assert!(!ObjectRef::new("bucket", "").is_object());
        assert!(ObjectRef::new("bucket", "key").is_object());
    }
}
