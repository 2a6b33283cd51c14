//! The closed catalog of protocol operations a request can classify into.
//!
//! Every inbound request resolves to exactly one [`Operation`]. Operations the
//! gateway recognizes but cannot serve still have a variant so that the
//! "recognized but unhandled" outcome is representable all the way to the
//! error encoder.

use std::fmt;

/// The category of resource an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationCategory {
    /// Bucket creation and removal.
    BucketAdmin,
    /// Service-level listing and bucket existence probes.
    BucketList,
    /// Reads of bucket contents or objects.
    BucketRead,
    /// Writes of objects, including multipart and batch operations.
    BucketWrite,
    /// Requests that cannot be served.
    Invalid,
}

impl OperationCategory {
    /// Returns the category name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BucketAdmin => "BucketAdmin",
            Self::BucketList => "BucketList",
            Self::BucketRead => "BucketRead",
            Self::BucketWrite => "BucketWrite",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All recognizable protocol operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a bucket (`PUT /bucket`).
    PutBucket,
    /// Delete a bucket (`DELETE /bucket`).
    DeleteBucket,
    /// List all buckets (`GET /`).
    ListBuckets,
    /// Probe a bucket (`HEAD /bucket`).
    HeadBucket,
    /// List the objects of a bucket (`GET /bucket`).
    GetBucket,
    /// Read an object (`GET /bucket/key`).
    GetObject,
    /// Read object metadata (`HEAD /bucket/key`).
    HeadObject,
    /// List object versions (`GET /bucket?versions`).
    GetBucketVersions,
    /// Write an object (`PUT /bucket/key`).
    PutObject,
    /// Server-side copy of an object.
    CopyObject,
    /// Delete an object (`DELETE /bucket/key`).
    RemoveObject,
    /// Start a multipart upload (`POST /bucket/key?uploads`).
    InitMultipartUpload,
    /// Upload one part (`PUT /bucket/key?uploadId=..`).
    MultipartUploadPart,
    /// List the parts of an upload (`GET /bucket/key?uploadId=..`).
    ListMultipartUpload,
    /// Finish a multipart upload (`POST /bucket/key?uploadId=..`).
    CompleteMultipartUpload,
    /// Abort a multipart upload (`DELETE /bucket/key?uploadId=..`).
    AbortMultipartUpload,
    /// List in-progress uploads of a bucket (`GET /bucket?uploads`).
    ListBucketMultipartUploads,
    /// Batch delete (`POST /bucket?delete`).
    DeleteObjects,
    /// Recognized but unsupported request shape.
    NotImplemented,
    /// Request whose shape is contradictory.
    MalformedRequest,
}

impl Operation {
    /// Every operation in the catalog.
    pub const ALL: [Self; 20] = [
        Self::PutBucket,
        Self::DeleteBucket,
        Self::ListBuckets,
        Self::HeadBucket,
        Self::GetBucket,
        Self::GetObject,
        Self::HeadObject,
        Self::GetBucketVersions,
        Self::PutObject,
        Self::CopyObject,
        Self::RemoveObject,
        Self::InitMultipartUpload,
        Self::MultipartUploadPart,
        Self::ListMultipartUpload,
        Self::CompleteMultipartUpload,
        Self::AbortMultipartUpload,
        Self::ListBucketMultipartUploads,
        Self::DeleteObjects,
        Self::NotImplemented,
        Self::MalformedRequest,
    ];

    /// Returns the stable operation name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PutBucket => "PutBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::ListBuckets => "ListBuckets",
            Self::HeadBucket => "HeadBucket",
            Self::GetBucket => "GetBucket",
            Self::GetObject => "GetObject",
            Self::HeadObject => "HeadObject",
            Self::GetBucketVersions => "GetBucketVersions",
            Self::PutObject => "PutObject",
            Self::CopyObject => "CopyObject",
            Self::RemoveObject => "RemoveObject",
            Self::InitMultipartUpload => "InitMultipartUpload",
            Self::MultipartUploadPart => "MultipartUploadPart",
            Self::ListMultipartUpload => "ListMultipartUpload",
            Self::CompleteMultipartUpload => "CompleteMultipartUpload",
            Self::AbortMultipartUpload => "AbortMultipartUpload",
            Self::ListBucketMultipartUploads => "ListBucketMultipartUploads",
            Self::DeleteObjects => "DeleteObjects",
            Self::NotImplemented => "NotImplemented",
            Self::MalformedRequest => "MalformedRequest",
        }
    }

    /// Parse an operation name into an [`Operation`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Returns the category of resource this operation targets.
    #[must_use]
    pub fn category(&self) -> OperationCategory {
        match self {
            Self::PutBucket | Self::DeleteBucket => OperationCategory::BucketAdmin,
            Self::ListBuckets | Self::HeadBucket => OperationCategory::BucketList,
            Self::GetBucket | Self::GetObject | Self::HeadObject | Self::GetBucketVersions => {
                OperationCategory::BucketRead
            }
            Self::PutObject
            | Self::CopyObject
            | Self::RemoveObject
            | Self::InitMultipartUpload
            | Self::MultipartUploadPart
            | Self::ListMultipartUpload
            | Self::CompleteMultipartUpload
            | Self::AbortMultipartUpload
            | Self::ListBucketMultipartUploads
            | Self::DeleteObjects => OperationCategory::BucketWrite,
            Self::NotImplemented | Self::MalformedRequest => OperationCategory::Invalid,
        }
    }

    /// Whether the operation creates, completes, or removes object data that an
    /// in-progress multipart upload may also touch.
    #[must_use]
    pub fn is_multipart_related(&self) -> bool {
        matches!(
            self,
            Self::InitMultipartUpload
                | Self::CompleteMultipartUpload
                | Self::RemoveObject
                | Self::PutObject
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
