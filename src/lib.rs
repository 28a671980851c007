#![forbid(unsafe_code)]
//! Extraction and validation pipeline for translation resource uploads.
//!
//! Accepts an uploaded resource file in one of three source formats — Java
//! `.properties`, flat JSON, or an AMD-style script module of string-literal
//! pairs — extracts a canonical key/value mapping, validates it against
//! configurable size and naming constraints, and packages it for submission
//! to a remote translation service.
//!
//! # Quick Start
//!
//! ```rust
//! use langlift::{SourceFormat, UploadPipeline, UploadRequest};
//!
//! let pipeline = UploadPipeline::with_default_limits();
//! let mapping = pipeline.process(b"foo.bar=Hello\nbaz_1:World", SourceFormat::Properties)?;
//! let body = UploadRequest::new(mapping).to_json()?;
//! assert!(body.starts_with(r#"{"data":"#));
//! # Ok::<(), langlift::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Java properties**: classic `key=value` lines with comments,
//!   continuations, and `\uXXXX` escapes
//! - **JSON**: a single flat object whose values are all strings
//! - **Script**: an ECMAScript program; string-literal object properties are
//!   recovered from any nesting depth
//!
//! # Design
//!
//! Data flows one way: bytes → mapping → validated mapping → submission
//! envelope. Every component is a pure transform with classified error
//! values; nothing is retried, cached, or shared between uploads.

pub mod error;
pub mod extract;
pub mod formats;
pub mod pipeline;
pub mod request;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export the types most callers need.
pub use crate::{
    error::{Error, ParseErrorKind},
    extract::extract,
    formats::SourceFormat,
    pipeline::UploadPipeline,
    request::UploadRequest,
    types::ResourceMapping,
    validate::{ValidationLimits, ValidationReport, validate},
};
