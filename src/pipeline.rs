//! The upload pipeline: extract, validate, and hand off for submission.

use crate::{
    error::Error,
    extract::extract,
    formats::SourceFormat,
    types::ResourceMapping,
    validate::{ValidationLimits, validate},
};

/// Orchestrates extraction and validation for one upload request.
///
/// The pipeline is stateless and re-entrant: every [`process`] call operates
/// on its own byte stream and produces its own mapping, so one pipeline
/// value can serve concurrent requests without synchronization.
///
/// Exactly one class of failure is surfaced per invocation, in a fixed
/// precedence order: parse, empty mapping, entry count, key pattern, key
/// length, value length. Cheaper and more structurally severe problems are
/// reported before expensive or cosmetic ones.
///
/// [`process`]: UploadPipeline::process
///
/// # Example
///
/// ```rust
/// use langlift::{SourceFormat, UploadPipeline};
///
/// let pipeline = UploadPipeline::with_default_limits();
/// let mapping = pipeline.process(b"foo.bar=Hello\nbaz_1:World", SourceFormat::Properties)?;
/// assert_eq!(mapping.get("baz_1"), Some("World"));
/// # Ok::<(), langlift::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UploadPipeline {
    limits: ValidationLimits,
}

impl UploadPipeline {
    /// Creates a pipeline with the given limits.
    pub fn new(limits: ValidationLimits) -> Self {
        UploadPipeline { limits }
    }

    /// Creates a pipeline with the reference defaults
    /// (500 entries, 256-character keys, 2048-character values).
    pub fn with_default_limits() -> Self {
        UploadPipeline::new(ValidationLimits::default())
    }

    /// The limits this pipeline validates against.
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Runs one upload through extraction and validation, returning the
    /// mapping ready for submission.
    ///
    /// An empty mapping is reported as [`Error::EmptyMapping`] rather than
    /// silently dropped; callers that want the legacy no-op behavior can
    /// match on that variant. When the entry count limit is exceeded, the
    /// key and value checks are never computed.
    pub fn process(
        &self,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<ResourceMapping, Error> {
        let mapping = extract(bytes, format)?;

        if mapping.is_empty() {
            return Err(Error::EmptyMapping);
        }

        if mapping.len() > self.limits.max_entry_count {
            return Err(Error::TooManyEntries {
                limit: self.limits.max_entry_count,
            });
        }

        let report = validate(&mapping, &self.limits);
        if !report.invalid_pattern_keys.is_empty() {
            return Err(Error::InvalidKeyPattern {
                keys: report.invalid_pattern_keys,
            });
        }
        if !report.too_long_keys.is_empty() {
            return Err(Error::KeyTooLong {
                limit: self.limits.max_key_length,
                keys: report.too_long_keys,
            });
        }
        if !report.too_long_value_keys.is_empty() {
            return Err(Error::ValueTooLong {
                limit: self.limits.max_value_length,
                keys: report.too_long_value_keys,
            });
        }

        tracing::debug!(entries = mapping.len(), "resource mapping ready for submission");
        Ok(mapping)
    }
}

impl Default for UploadPipeline {
    fn default() -> Self {
        UploadPipeline::with_default_limits()
    }
}
