//! Decoding and format dispatch for uploaded resource files.

use std::io::Read;

use crate::{
    error::Error,
    formats::{JsonFormat, PropertiesFormat, ScriptFormat, SourceFormat},
    traits::FormatParser,
    types::ResourceMapping,
};

/// Extracts the canonical key/value mapping from a raw byte stream of the
/// declared format.
///
/// The bytes are decoded as UTF-8 text; a leading byte-order mark is
/// stripped rather than decoded as content (a UTF-16 BOM switches the
/// decode accordingly). The matching format parser's outcome is propagated
/// unchanged.
///
/// # Example
///
/// ```rust
/// use langlift::{SourceFormat, extract};
///
/// let mapping = extract(b"foo.bar=Hello", SourceFormat::Properties)?;
/// assert_eq!(mapping.get("foo.bar"), Some("Hello"));
/// # Ok::<(), langlift::Error>(())
/// ```
pub fn extract(bytes: &[u8], format: SourceFormat) -> Result<ResourceMapping, Error> {
    let text = decode_text(bytes)?;
    tracing::debug!(%format, bytes = bytes.len(), "decoded uploaded resource file");

    let mapping: ResourceMapping = match format {
        SourceFormat::Properties => PropertiesFormat::from_str(&text)?.into(),
        SourceFormat::Json => JsonFormat::from_str(&text)?.into(),
        SourceFormat::Script => ScriptFormat::from_str(&text)?.into(),
    };

    tracing::debug!(%format, entries = mapping.len(), "extracted resource mapping");
    Ok(mapping)
}

/// BOM-aware decode to UTF-8 text; malformed sequences become U+FFFD.
fn decode_text(bytes: &[u8]) -> Result<String, Error> {
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::UTF_8))
        .bom_override(true)
        .build(bytes);

    let mut text = String::new();
    decoder.read_to_string(&mut text).map_err(Error::Io)?;
    Ok(text)
}
