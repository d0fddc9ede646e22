//! Error types for the pptsize library.

use std::io;
use thiserror::Error;

/// Result type alias for pptsize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while walking a presentation package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The package opened, but its main part is not a presentation.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The package is internally inconsistent (e.g. a slide id that
    /// resolves to no slide part).
    #[error("Corrupt package: {0}")]
    CorruptPackage(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
