//! Blob store error types.
//!
//! [`StoreError`] is what a [`BlobStore`](crate::store::BlobStore) and the
//! gateway's validation return. Each variant maps to exactly one taxonomy code
//! through `From<StoreError> for S3Error`.

use blobgate_model::error::{ErrorCode, S3Error};

/// Blob store and request validation errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The missing bucket.
        bucket: String,
    },

    /// A bucket with this name already exists.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The existing bucket.
        bucket: String,
    },

    /// The bucket still holds objects.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The non-empty bucket.
        bucket: String,
    },

    /// The key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The missing key.
        key: String,
    },

    /// A request argument is invalid.
    #[error("{message}")]
    InvalidArgument {
        /// What was wrong.
        message: String,
    },

    /// The body was shorter or longer than its declared length.
    #[error("declared {expected} bytes but received {received}")]
    IncompleteBody {
        /// The declared `Content-Length`.
        expected: u64,
        /// The number of bytes received.
        received: u64,
    },

    /// The body exceeds the configured object size limit.
    #[error("object of {size} bytes exceeds the maximum of {max} bytes")]
    EntityTooLarge {
        /// The offered size.
        size: u64,
        /// The configured limit.
        max: u64,
    },
}

impl StoreError {
    /// The taxonomy code this error is reported with.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoSuchBucket { .. } => ErrorCode::NoSuchBucket,
            Self::BucketAlreadyExists { .. } => ErrorCode::BucketAlreadyExists,
            Self::BucketNotEmpty { .. } => ErrorCode::BucketNotEmpty,
            Self::NoSuchKey { .. } => ErrorCode::NoSuchKey,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::IncompleteBody { .. } => ErrorCode::IncompleteBody,
            Self::EntityTooLarge { .. } => ErrorCode::EntityTooLarge,
        }
    }
}

impl From<StoreError> for S3Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoSuchBucket { bucket } => Self::no_such_bucket(bucket),
            StoreError::BucketAlreadyExists { bucket } => Self::bucket_already_exists(bucket),
            StoreError::BucketNotEmpty { bucket } => Self::bucket_not_empty(bucket),
            StoreError::NoSuchKey { key } => Self::no_such_key(key),
            err @ (StoreError::InvalidArgument { .. }
            | StoreError::IncompleteBody { .. }
            | StoreError::EntityTooLarge { .. }) => Self::caused_by(err.code(), err),
        }
    }
}
