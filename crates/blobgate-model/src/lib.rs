//! Shared data model for BlobGate.
//!
//! - [`operations`]: the closed catalog of protocol operations.
//! - [`query`]: the classified request descriptor ([`Query`]).
//! - [`error`]: the error taxonomy ([`ErrorCode`]) and the tagged [`S3Error`].
//! - [`output`]: typed handler results.

pub mod error;
pub mod operations;
pub mod output;
pub mod query;

pub use error::{ErrorCode, S3Error};
pub use operations::{Operation, OperationCategory};
pub use query::{ListingCursor, ListingVersion, MultipartCursor, ObjectRef, Query};
