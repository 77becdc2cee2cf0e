//! Error types for the inkwell-xlsx library.

use std::io;
use thiserror::Error;

/// Result type alias for inkwell-xlsx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// No target file has been set on the handle.
    #[error("File not set, call file() first")]
    TargetNotSet,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not a readable ZIP archive.
    #[error("Unable to open archive: {0}")]
    ArchiveOpen(String),

    /// Error while assembling a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// A required part is missing from the package.
    #[error("Unable to read '{0}' from package")]
    PartNotFound(String),

    /// A sheet references a relationship id absent from the workbook relationships.
    #[error("Relationship with id '{0}' not found")]
    RelationshipNotFound(String),

    /// A sheet selector could not be interpreted.
    #[error("Invalid sheet selector: {0}")]
    InvalidSelector(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),
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

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TargetNotSet;
        assert_eq!(err.to_string(), "File not set, call file() first");

        let err = Error::PartNotFound("xl/workbook.xml".to_string());
        assert_eq!(
            err.to_string(),
            "Unable to read 'xl/workbook.xml' from package"
        );

        let err = Error::RelationshipNotFound("rId7".to_string());
        assert_eq!(err.to_string(), "Relationship with id 'rId7' not found");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
