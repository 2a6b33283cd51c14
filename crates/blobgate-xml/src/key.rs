//! Object key validation.

use quick_xml::escape::{escape, unescape};

/// Whether `key` survives being written into and read back from an XML
/// document unchanged.
///
/// Keys holding characters outside the XML character range (most control
/// characters, lone surrogates, `U+FFFE`/`U+FFFF`) cannot appear in listing
/// responses and are rejected.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    if !key.chars().all(is_xml_char) {
        return false;
    }
    let escaped = escape(key);
    matches!(unescape(&escaped), Ok(decoded) if decoded == key)
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}
