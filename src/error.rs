// src/error.rs
//! Error handling for the crate.
//!
//! - Warnings (malformed includes, unknown library names, missing chunks) are
//!   *not* errors: they go through `log::warn!` and the operation degrades.
//! - `Error` is reserved for startup-fault-class conditions such as a missing
//!   built-in shader template, which indicates a corrupted resource bundle.
//! - Caller bugs (e.g. unrealizing a texture that was never realized) panic
//!   via `assert!` rather than returning `Err`.

use thiserror::Error;

/// Main error type — lightweight, Send + Sync + 'static.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A built-in shader template or chunk the library requires is absent
    /// from the resource store. The resource bundle is corrupt.
    #[error("required shader resource missing: {0}")]
    MissingResource(String),

    /// Image decoding failed while building a texture's pixel source.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Simple custom message (allocation only on the error path).
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Create a custom error message.
    #[inline]
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Self::Custom(msg.into())
    }

    #[inline]
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, Error::MissingResource(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

/// Convenient `Result` alias — use `crate::Result<T>` everywhere.
pub type Result<T> = std::result::Result<T, Error>;
