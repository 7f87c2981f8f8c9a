//! Error types for slide template decoding and PPTX synthesis.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a presentation package.
///
/// Every variant aborts the build; no partial package is ever returned.
#[derive(Error, Debug)]
pub enum Error {
    /// A geometry or style field is missing, non-finite, or out of range.
    #[error("Malformed element {index}: field `{field}` {reason}")]
    MalformedElement {
        index: usize,
        field: String,
        reason: String,
    },

    /// An element of a known type could not be decoded.
    #[error("Invalid element {index}: {message}")]
    InvalidElement { index: usize, message: String },

    /// The element's type tag is not one of `text`, `shape`, `image`.
    #[error("Unsupported element type at index {index}: {kind}")]
    UnsupportedElementType { index: usize, kind: String },

    /// An image element references an image id with no embedded asset.
    #[error("Image element {index} references unknown image `{image_id}`")]
    UnresolvedImage { index: usize, image_id: String },

    /// The template root could not be decoded.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// A color string is not a 6-digit hex RGB value.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Image bytes are not PNG, JPEG, or GIF.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// Writing or compressing the archive failed.
    #[error("Packaging failed: {0}")]
    PackagingFailed(String),

    /// ZIP archive error while reading a package back.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error while writing a part or reading a package back.
    #[error("XML error: {0}")]
    XmlError(String),

    /// The package structure is unreadable.
    #[error("Invalid or corrupted package: {0}")]
    CorruptedPackage(String),
}

impl Error {
    pub(crate) fn malformed(index: usize, field: &str, reason: impl Into<String>) -> Self {
        Error::MalformedElement {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::XmlError(format!("Failed to write XML: {}", e))
    }
}
