//! Converting operation outputs to XML response bodies.
//!
//! Documents follow the RestXml conventions clients expect:
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/`
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 with milliseconds (`2006-02-03T16:45:09.000Z`)

use std::io::{self, Write};

use blobgate_model::output::{
    BucketSummary, CopyObjectOutput, ListBucketsOutput, ListObjectsOutput, ObjectSummary, Owner,
};
use blobgate_model::query::ListingVersion;
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::BytesText;

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// The declaration line that prefixes every document.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Storage class reported for every listed object.
const STORAGE_CLASS: &str = "STANDARD";

/// Trait for serializing outputs to XML.
///
/// Implementors write their content as child elements inside the current XML
/// context. The root element and namespace are written by [`to_xml`].
pub trait S3Serialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete document under `root_element`.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: S3Serialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    buf.extend_from_slice(XML_HEADER.as_bytes());
    let mut writer = Writer::new(&mut buf);

    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

fn write_timestamp<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &DateTime<Utc>,
) -> io::Result<()> {
    write_text_element(
        writer,
        tag,
        &value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    )
}

/// Write `<tag>text</tag>` unless the text is empty.
fn write_non_empty<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    write_text_element(writer, tag, text)
}

impl S3Serialize for Owner {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "ID", &self.id)?;
        write_text_element(writer, "DisplayName", &self.display_name)
    }
}

impl S3Serialize for BucketSummary {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_timestamp(writer, "CreationDate", &self.creation_date)
    }
}

impl S3Serialize for ObjectSummary {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Key", &self.key)?;
        write_timestamp(writer, "LastModified", &self.last_modified)?;
        write_text_element(writer, "ETag", &self.e_tag)?;
        write_text_element(writer, "Size", &self.size.to_string())?;
        write_text_element(writer, "StorageClass", STORAGE_CLASS)
    }
}

/// Serializes as the body of `ListAllMyBucketsResult`.
impl S3Serialize for ListBucketsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("Owner")
            .write_inner_content(|w| self.owner.serialize_xml(w))?;
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                w.create_element("Bucket")
                    .write_inner_content(|w2| bucket.serialize_xml(w2))?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

/// Serializes as the body of `ListBucketResult`, in the v1 or v2 shape.
impl S3Serialize for ListObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", &self.prefix)?;

        match self.version {
            ListingVersion::V1 => {
                write_text_element(writer, "Marker", &self.marker)?;
                write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
                write_non_empty(writer, "Delimiter", &self.delimiter)?;
                write_bool(writer, "IsTruncated", self.is_truncated)?;
                if let Some(next) = &self.next_marker {
                    write_text_element(writer, "NextMarker", next)?;
                }
            }
            ListingVersion::V2 => {
                write_non_empty(writer, "ContinuationToken", &self.marker)?;
                if let Some(next) = &self.next_marker {
                    write_text_element(writer, "NextContinuationToken", next)?;
                }
                let key_count = self.contents.len() + self.common_prefixes.len();
                write_text_element(writer, "KeyCount", &key_count.to_string())?;
                write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
                write_non_empty(writer, "Delimiter", &self.delimiter)?;
                write_bool(writer, "IsTruncated", self.is_truncated)?;
            }
        }

        for object in &self.contents {
            writer
                .create_element("Contents")
                .write_inner_content(|w| object.serialize_xml(w))?;
        }
        for prefix in &self.common_prefixes {
            writer
                .create_element("CommonPrefixes")
                .write_inner_content(|w| write_text_element(w, "Prefix", prefix))?;
        }
        Ok(())
    }
}

/// Serializes as the body of `CopyObjectResult`.
impl S3Serialize for CopyObjectOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "ETag", &self.e_tag)?;
        write_timestamp(writer, "LastModified", &self.last_modified)
    }
}
