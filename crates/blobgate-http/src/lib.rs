//! HTTP layer for BlobGate: classification, encoding, dispatch, and the hyper service.
//!
//! - **Routing** ([`router`]): classifies a request into a
//!   [`Query`](blobgate_model::Query) from its method, path, query parameters,
//!   and the `x-amz-copy-source` header.
//!
//! - **Response encoding** ([`response`]): converts handler outputs and
//!   [`S3Error`](blobgate_model::S3Error)s into HTTP responses with XML bodies.
//!
//! - **Dispatch** ([`dispatch`]): hands a classified request to the
//!   [`S3Handler`](dispatch::S3Handler) implementation.
//!
//! - **Service** ([`service`]): [`S3HttpService`](service::S3HttpService)
//!   implements hyper's `Service` trait.
//!
//! - **Body** ([`body`]): the [`S3ResponseBody`](body::S3ResponseBody) type.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> S3HttpService (hyper Service)
//!     -> Health check interception
//!     -> S3Router (classification into a Query)
//!     -> Body collection
//!     -> dispatch_operation (S3Handler trait)
//!     -> error_to_response on failure
//!     -> Common response headers (x-amz-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use blobgate_http::dispatch::NotImplementedHandler;
//! use blobgate_http::service::S3HttpService;
//!
//! let service = S3HttpService::new(NotImplementedHandler);
//! // Use `service` with a hyper server.
//! ```

// S3Error carries an optional boxed source and is returned on every handler path.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::S3ResponseBody;
pub use dispatch::{NotImplementedHandler, S3Handler};
pub use response::{IntoS3Response, error_to_response};
pub use router::{S3Router, classify};
pub use service::S3HttpService;
