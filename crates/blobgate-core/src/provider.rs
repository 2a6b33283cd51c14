//! Operation handlers over a [`BlobStore`].
//!
//! [`BlobGateway`] validates classified requests, calls the store, and returns
//! the typed outputs the HTTP layer encodes. Every failure leaves here as an
//! [`S3Error`] already tagged with its taxonomy code.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use blobgate_model::error::S3Error;
use blobgate_model::output::{
    CopyObjectOutput, CreateBucketOutput, DeleteBucketOutput, DeleteObjectOutput,
    GetObjectOutput, HeadBucketOutput, HeadObjectOutput, ListBucketsOutput, ListObjectsOutput,
    Owner, PutObjectOutput,
};
use blobgate_model::query::{ListingCursor, ObjectRef};
use blobgate_xml::is_valid_key;

use crate::config::GatewayConfig;
use crate::error::StoreError;
use crate::store::{BlobStore, MemoryBlobStore};

/// The gateway's operation handlers.
///
/// # Examples
///
/// ```
/// use blobgate_core::BlobGateway;
/// use blobgate_core::config::GatewayConfig;
///
/// let gateway = BlobGateway::in_memory(GatewayConfig::default());
/// assert_eq!(gateway.config().owner_id, "blobgate");
/// ```
#[derive(Debug, Clone)]
pub struct BlobGateway {
    store: Arc<dyn BlobStore>,
    config: Arc<GatewayConfig>,
}

impl BlobGateway {
    /// Create a gateway over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, config: GatewayConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Create a gateway over a fresh [`MemoryBlobStore`].
    #[must_use]
    pub fn in_memory(config: GatewayConfig) -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()), config)
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    // --- Bucket operations ---

    /// Create the destination bucket.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name, `BucketAlreadyExists` if taken.
    pub fn handle_put_bucket(&self, dest: &ObjectRef) -> Result<CreateBucketOutput, S3Error> {
        if dest.bucket.is_empty() {
            return Err(StoreError::InvalidArgument {
                message: "bucket name must not be empty".to_owned(),
            }
            .into());
        }
        self.store.create_bucket(&dest.bucket)?;
        Ok(CreateBucketOutput {
            location: format!("/{}", dest.bucket),
        })
    }

    /// Delete the destination bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` if missing, `BucketNotEmpty` if it still holds objects.
    pub fn handle_delete_bucket(&self, dest: &ObjectRef) -> Result<DeleteBucketOutput, S3Error> {
        self.store.delete_bucket(&dest.bucket)?;
        Ok(DeleteBucketOutput)
    }

    /// Check that the destination bucket exists.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` if missing.
    pub fn handle_head_bucket(&self, dest: &ObjectRef) -> Result<HeadBucketOutput, S3Error> {
        if self.store.bucket_exists(&dest.bucket) {
            Ok(HeadBucketOutput)
        } else {
            Err(S3Error::no_such_bucket(dest.bucket.clone()))
        }
    }

    /// List every bucket together with the configured owner.
    #[must_use]
    pub fn handle_list_buckets(&self) -> ListBucketsOutput {
        ListBucketsOutput {
            owner: Owner {
                id: self.config.owner_id.clone(),
                display_name: self.config.owner_display_name.clone(),
            },
            buckets: self.store.list_buckets(),
        }
    }

    /// List one page of the destination bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` if missing.
    pub fn handle_get_bucket(
        &self,
        dest: &ObjectRef,
        cursor: &ListingCursor,
    ) -> Result<ListObjectsOutput, S3Error> {
        let page = self.store.list_objects(&dest.bucket, cursor)?;
        Ok(ListObjectsOutput {
            version: cursor.version,
            name: dest.bucket.clone(),
            prefix: cursor.prefix.clone(),
            delimiter: cursor.delimiter.clone(),
            marker: cursor.marker.clone(),
            max_keys: i32::try_from(page.max_keys).unwrap_or(i32::MAX),
            is_truncated: page.is_truncated,
            contents: page.objects,
            common_prefixes: page.common_prefixes,
            next_marker: page.next_marker,
        })
    }

    // --- Object operations ---

    /// Store `body` under the destination key.
    ///
    /// `declared_length` is the request's `Content-Length`, when it sent one.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for keys that cannot be represented in XML,
    /// `EntityTooLarge` above the configured limit, `IncompleteBody` when the
    /// body length differs from the declared length, `NoSuchBucket` if the
    /// bucket is missing.
    pub fn handle_put_object(
        &self,
        dest: &ObjectRef,
        declared_length: Option<u64>,
        body: Bytes,
    ) -> Result<PutObjectOutput, S3Error> {
        validate_key(&dest.key)?;

        let received = body.len() as u64;
        let size = declared_length.unwrap_or(received).max(received);
        if size > self.config.max_object_size {
            return Err(StoreError::EntityTooLarge {
                size,
                max: self.config.max_object_size,
            }
            .into());
        }
        if let Some(expected) = declared_length {
            if expected != received {
                return Err(StoreError::IncompleteBody { expected, received }.into());
            }
        }

        let stored = self.store.put_object(&dest.bucket, &dest.key, body)?;
        Ok(PutObjectOutput {
            e_tag: stored.e_tag,
        })
    }

    /// Copy the source object to the destination key.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unrepresentable destination key, `NoSuchBucket`
    /// or `NoSuchKey` when the source is missing, `NoSuchBucket` when the
    /// destination bucket is missing.
    pub fn handle_copy_object(
        &self,
        dest: &ObjectRef,
        source: &ObjectRef,
    ) -> Result<CopyObjectOutput, S3Error> {
        validate_key(&dest.key)?;
        if let Some(version_id) = &source.version_id {
            debug!(%version_id, "copy source version ignored, objects are unversioned");
        }

        let source_object = self.store.get_object(&source.bucket, &source.key)?;
        let copied = self
            .store
            .put_object(&dest.bucket, &dest.key, source_object.data)?;
        debug!(
            src_bucket = %source.bucket,
            src_key = %source.key,
            bucket = %dest.bucket,
            key = %dest.key,
            "object copied"
        );
        Ok(CopyObjectOutput {
            e_tag: copied.e_tag,
            last_modified: copied.last_modified,
        })
    }

    /// Read the destination object.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchKey`.
    pub fn handle_get_object(&self, dest: &ObjectRef) -> Result<GetObjectOutput, S3Error> {
        let object = self.store.get_object(&dest.bucket, &dest.key)?;
        Ok(GetObjectOutput {
            body: object.data,
            last_modified: object.last_modified,
            e_tag: object.e_tag,
        })
    }

    /// Read the destination object's metadata.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchKey`.
    pub fn handle_head_object(&self, dest: &ObjectRef) -> Result<HeadObjectOutput, S3Error> {
        let object = self.store.get_object(&dest.bucket, &dest.key)?;
        Ok(HeadObjectOutput {
            content_length: object.size(),
            last_modified: object.last_modified,
            e_tag: object.e_tag,
        })
    }

    /// Delete the destination object; missing keys are not an error.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` if the bucket is missing.
    pub fn handle_remove_object(&self, dest: &ObjectRef) -> Result<DeleteObjectOutput, S3Error> {
        self.store.delete_object(&dest.bucket, &dest.key)?;
        Ok(DeleteObjectOutput)
    }
}

fn validate_key(key: &str) -> Result<(), S3Error> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidArgument {
            message: "object key contains characters that cannot be represented in XML".to_owned(),
        }
        .into())
    }
}
