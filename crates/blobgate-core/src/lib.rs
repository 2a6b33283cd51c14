//! Storage-facing core of BlobGate.
//!
//! - [`config`]: [`GatewayConfig`] loaded from the environment.
//! - [`error`]: [`StoreError`] and its mapping onto the error taxonomy.
//! - [`store`]: the [`BlobStore`] trait and the in-memory [`MemoryBlobStore`].
//! - [`provider`]: [`BlobGateway`], the operation handlers.

// S3Error carries an optional boxed source and is returned on every handler path.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod error;
pub mod provider;
pub mod store;

pub use config::{GatewayConfig, LogFormat};
pub use error::StoreError;
pub use provider::BlobGateway;
pub use store::{BlobStore, ListPage, MemoryBlobStore, StoredObject};
