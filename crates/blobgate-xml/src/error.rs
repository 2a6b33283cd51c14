//! Error document formatting and the XML error type.

use std::io;

use blobgate_model::error::S3Error;
use quick_xml::Writer;
use quick_xml::events::BytesText;

use crate::serialize::XML_HEADER;

/// Errors that can occur while writing XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),
}

impl From<XmlError> for S3Error {
    fn from(err: XmlError) -> Self {
        Self::untagged(err)
    }
}

/// Format an error document.
///
/// The `<Resource>` element is always present and may be empty.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><Resource>photos/a.jpg</Resource><RequestId>4442587f</RequestId></Error>
/// ```
pub fn error_to_xml(code: &str, message: &str, resource: &str, request_id: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    buf.extend_from_slice(XML_HEADER.as_bytes());
    // Writing to Vec<u8> is infallible; if this fails it means a logic error.
    if let Err(e) = write_error_xml(&mut buf, code, message, resource, request_id) {
        tracing::error!(error = %e, "failed to serialize error XML");
        buf.truncate(XML_HEADER.len());
    }
    buf
}

fn write_error_xml(
    buf: &mut Vec<u8>,
    code: &str,
    message: &str,
    resource: &str,
    request_id: &str,
) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(code))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(message))?;
        w.create_element("Resource")
            .write_text_content(BytesText::new(resource))?;
        w.create_element("RequestId")
            .write_text_content(BytesText::new(request_id))?;
        Ok(())
    })?;

    Ok(())
}
