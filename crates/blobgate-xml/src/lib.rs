//! XML wire encoding for BlobGate.
//!
//! Every document produced here starts with [`XML_HEADER`], the standard XML
//! declaration line, followed by a single root element.
//!
//! - [`error_to_xml`] renders the `<Error>` document for a failed request.
//! - [`to_xml`] renders listing and copy results through [`S3Serialize`].
//! - [`is_valid_key`] checks that an object key can be carried in XML.

pub mod error;
pub mod key;
pub mod serialize;

pub use error::{XmlError, error_to_xml};
pub use key::is_valid_key;
pub use serialize::{S3_NAMESPACE, S3Serialize, XML_HEADER, to_xml};
