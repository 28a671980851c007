//! The outbound submission envelope for the translation service.
//!
//! The wire body is `{ "data": {<mapping>}, "replace": <bool>, "retry":
//! <bool> }`. The pipeline produces only the mapping; `replace` and `retry`
//! are pass-through flags the core never computes, and a flag is omitted
//! from the body when false, matching the reference service's request
//! builder. Opening the connection is the embedding application's job.

use serde::Serialize;

use crate::{error::Error, types::ResourceMapping};

/// A validated mapping packaged for submission.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    /// The validated key/value mapping.
    pub data: ResourceMapping,
    /// Replace the remote resource wholesale rather than merging.
    #[serde(skip_serializing_if = "is_false")]
    pub replace: bool,
    /// Ask the service to retry previously failed translations.
    #[serde(skip_serializing_if = "is_false")]
    pub retry: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl UploadRequest {
    /// Packages a mapping with the default flags (`replace`, no `retry`).
    pub fn new(data: ResourceMapping) -> Self {
        UploadRequest {
            data,
            replace: true,
            retry: false,
        }
    }

    /// Packages a mapping with explicit flags.
    pub fn with_flags(data: ResourceMapping, replace: bool, retry: bool) -> Self {
        UploadRequest {
            data,
            replace,
            retry,
        }
    }

    /// Encodes the envelope as its JSON wire body.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Serialize)
    }
}
