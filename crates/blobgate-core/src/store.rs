//! The Blob Store boundary and its in-memory implementation.
//!
//! [`BlobStore`] is everything the gateway needs from storage: bucket
//! lifecycle, whole-object reads and writes keyed by bucket and key strings,
//! and ordered listings. [`MemoryBlobStore`] keeps buckets in a `DashMap` and
//! each bucket's objects in a `BTreeMap`, so listings walk keys in
//! lexicographic order.

use std::collections::BTreeMap;
use std::ops::Bound;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use md5::{Digest, Md5};
use tracing::{debug, info};

use blobgate_model::output::{BucketSummary, ObjectSummary};
use blobgate_model::query::ListingCursor;

use crate::error::StoreError;

/// Upper bound applied to a requested page size.
pub const MAX_LIST_KEYS: usize = 1000;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key.
    pub key: String,
    /// Object bytes.
    pub data: Bytes,
    /// Quoted hex MD5 of `data`.
    pub e_tag: String,
    /// Write time.
    pub last_modified: DateTime<Utc>,
}

impl StoredObject {
    /// Create an object stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, data: Bytes) -> Self {
        let e_tag = compute_etag(&data);
        Self {
            key: key.into(),
            data,
            e_tag,
            last_modified: Utc::now(),
        }
    }

    /// Object size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            key: self.key.clone(),
            last_modified: self.last_modified,
            e_tag: self.e_tag.clone(),
            size: self.size(),
        }
    }
}

/// Compute the quoted hex MD5 of `data`, as used for `ETag` values.
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Md5::digest(data)))
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects in key order.
    pub objects: Vec<ObjectSummary>,
    /// Rolled-up prefixes in order of first appearance.
    pub common_prefixes: Vec<String>,
    /// Whether entries remain after this page.
    pub is_truncated: bool,
    /// The last key or prefix of this page, when truncated.
    pub next_marker: Option<String>,
    /// The page size actually applied.
    pub max_keys: usize,
}

/// Clamp a requested `max-keys` to `0..=MAX_LIST_KEYS`.
#[must_use]
pub fn page_size(requested: i32) -> usize {
    usize::try_from(requested).unwrap_or(0).min(MAX_LIST_KEYS)
}

/// Storage operations the gateway relies on.
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a bucket and return its creation time.
    ///
    /// # Errors
    ///
    /// [`StoreError::BucketAlreadyExists`] if the name is taken.
    fn create_bucket(&self, name: &str) -> Result<DateTime<Utc>, StoreError>;

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchBucket`] or [`StoreError::BucketNotEmpty`].
    fn delete_bucket(&self, name: &str) -> Result<(), StoreError>;

    /// Whether the bucket exists.
    fn bucket_exists(&self, name: &str) -> bool;

    /// All buckets, sorted by name.
    fn list_buckets(&self) -> Vec<BucketSummary>;

    /// Store an object, replacing any previous one under the same key.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchBucket`] if the bucket does not exist.
    fn put_object(&self, bucket: &str, key: &str, data: Bytes)
    -> Result<StoredObject, StoreError>;

    /// Read an object.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchBucket`] or [`StoreError::NoSuchKey`].
    fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError>;

    /// Delete an object. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchBucket`] if the bucket does not exist.
    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// List one page of a bucket.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchBucket`] if the bucket does not exist.
    fn list_objects(&self, bucket: &str, cursor: &ListingCursor) -> Result<ListPage, StoreError>;
}

#[derive(Debug)]
struct MemoryBucket {
    created: DateTime<Utc>,
    objects: BTreeMap<String, StoredObject>,
}

/// A [`BlobStore`] holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    buckets: DashMap<String, MemoryBucket>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn no_such_bucket(name: &str) -> StoreError {
    StoreError::NoSuchBucket {
        bucket: name.to_owned(),
    }
}

impl BlobStore for MemoryBlobStore {
    fn create_bucket(&self, name: &str) -> Result<DateTime<Utc>, StoreError> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::BucketAlreadyExists {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let created = Utc::now();
                slot.insert(MemoryBucket {
                    created,
                    objects: BTreeMap::new(),
                });
                info!(bucket = %name, "bucket created");
                Ok(created)
            }
        }
    }

    fn delete_bucket(&self, name: &str) -> Result<(), StoreError> {
        if self
            .buckets
            .remove_if(name, |_, bucket| bucket.objects.is_empty())
            .is_some()
        {
            info!(bucket = %name, "bucket deleted");
            return Ok(());
        }
        if self.buckets.contains_key(name) {
            Err(StoreError::BucketNotEmpty {
                bucket: name.to_owned(),
            })
        } else {
            Err(no_such_bucket(name))
        }
    }

    fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    fn list_buckets(&self) -> Vec<BucketSummary> {
        let mut buckets: Vec<BucketSummary> = self
            .buckets
            .iter()
            .map(|entry| BucketSummary {
                name: entry.key().clone(),
                creation_date: entry.value().created,
            })
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<StoredObject, StoreError> {
        let mut entry = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        let object = StoredObject::new(key, data);
        entry.objects.insert(key.to_owned(), object.clone());
        debug!(bucket, key, size = object.size(), "object stored");
        Ok(object)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        entry
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchKey {
                key: key.to_owned(),
            })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let mut entry = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        if entry.objects.remove(key).is_some() {
            debug!(bucket, key, "object deleted");
        }
        Ok(())
    }

    fn list_objects(&self, bucket: &str, cursor: &ListingCursor) -> Result<ListPage, StoreError> {
        let entry = self
            .buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        Ok(list_from_btree(&entry.objects, cursor))
    }
}

/// Walk `objects` in key order and build one listing page.
///
/// Keys at or before the marker are skipped, as are keys inside a common
/// prefix that the marker itself names. Objects and common prefixes both
/// count toward the page size.
fn list_from_btree(objects: &BTreeMap<String, StoredObject>, cursor: &ListingCursor) -> ListPage {
    let max_keys = page_size(cursor.max_keys);
    let mut page = ListPage {
        max_keys,
        ..ListPage::default()
    };
    if max_keys == 0 {
        return page;
    }

    let prefix = cursor.prefix.as_str();
    let delimiter = cursor.delimiter.as_str();
    let marker = cursor.marker.as_str();
    let marker_is_prefix = !delimiter.is_empty() && marker.ends_with(delimiter);

    let start = if marker.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(marker)
    };

    let mut count = 0usize;
    let mut last_entry: Option<String> = None;

    for (key, object) in objects.range::<str, _>((start, Bound::Unbounded)) {
        if !key.starts_with(prefix) {
            continue;
        }
        if marker_is_prefix && key.starts_with(marker) {
            continue;
        }

        let rolled_up = if delimiter.is_empty() {
            None
        } else {
            key[prefix.len()..]
                .find(delimiter)
                .map(|pos| key[..prefix.len() + pos + delimiter.len()].to_owned())
        };

        if let Some(common) = &rolled_up {
            if page.common_prefixes.last() == Some(common) {
                continue;
            }
        }

        if count >= max_keys {
            page.is_truncated = true;
            break;
        }
        count += 1;

        match rolled_up {
            Some(common) => {
                last_entry = Some(common.clone());
                page.common_prefixes.push(common);
            }
            None => {
                last_entry = Some(key.clone());
                page.objects.push(object.summary());
            }
        }
    }

    if page.is_truncated {
        page.next_marker = last_entry;
    }
    page
}
