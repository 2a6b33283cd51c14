//! Typed results produced by operation handlers.
//!
//! The HTTP layer turns each of these into a response; listing outputs are
//! rendered as XML documents by `blobgate-xml`.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::query::ListingVersion;

/// The owner reported in bucket listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    /// Canonical owner id.
    pub id: String,
    /// Human-readable owner name.
    pub display_name: String,
}

/// One bucket in a `ListBuckets` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
}

/// One object in a `GetBucket` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
    /// Quoted entity tag.
    pub e_tag: String,
    /// Size in bytes.
    pub size: u64,
}

/// Result of `PutBucket`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketOutput {
    /// Path of the created bucket.
    pub location: String,
}

/// Result of `DeleteBucket`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteBucketOutput;

/// Result of `HeadBucket`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadBucketOutput;

/// Result of `ListBuckets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketsOutput {
    /// The owner of every listed bucket.
    pub owner: Owner,
    /// Buckets sorted by name.
    pub buckets: Vec<BucketSummary>,
}

/// Result of `GetBucket`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsOutput {
    /// Listing schema version requested by the client.
    pub version: ListingVersion,
    /// Bucket name.
    pub name: String,
    /// Prefix filter echoed back.
    pub prefix: String,
    /// Delimiter echoed back.
    pub delimiter: String,
    /// Marker (v1) or continuation token (v2) echoed back.
    pub marker: String,
    /// Page size echoed back.
    pub max_keys: i32,
    /// Whether more keys follow this page.
    pub is_truncated: bool,
    /// Objects in this page.
    pub contents: Vec<ObjectSummary>,
    /// Keys rolled up at the delimiter.
    pub common_prefixes: Vec<String>,
    /// Where the next page starts, when truncated.
    pub next_marker: Option<String>,
}

/// Result of `PutObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Quoted entity tag of the stored object.
    pub e_tag: String,
}

/// Result of a `PutObject` that carried a copy source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyObjectOutput {
    /// Quoted entity tag of the new object.
    pub e_tag: String,
    /// Write time of the new object.
    pub last_modified: DateTime<Utc>,
}

/// Result of `GetObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetObjectOutput {
    /// Object bytes.
    pub body: Bytes,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
    /// Quoted entity tag.
    pub e_tag: String,
}

/// Result of `HeadObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadObjectOutput {
    /// Object size in bytes.
    pub content_length: u64,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
    /// Quoted entity tag.
    pub e_tag: String,
}

/// Result of `RemoveObject`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteObjectOutput;
