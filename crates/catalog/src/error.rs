//! Error types for catalog extraction and rendering.

use thiserror::Error;

/// Main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An I/O error occurred while reading an archive or writing a cover.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be opened as a zip container.
    #[error("Not an archive: {0}")]
    NotAnArchive(String),

    /// The archive has no `META-INF/container.xml` member.
    #[error("Container descriptor missing")]
    ContainerMissing,

    /// The container descriptor is not valid XML or names no rootfile.
    #[error("Malformed container descriptor: {0}")]
    MalformedContainer(String),

    /// The package document could not be parsed.
    #[error("Malformed package document: {0}")]
    MalformedPackageDocument(String),

    /// No archive member has exactly the requested path.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// The package document declares a cover whose member is absent.
    #[error("Cover member not found: {0}")]
    CoverMemberNotFound(String),

    /// The catalog template failed to compile or render.
    #[error("Template error: {0}")]
    Template(String),
}

impl From<zip::result::ZipError> for CatalogError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => CatalogError::Io(io),
            zip::result::ZipError::FileNotFound => {
                CatalogError::MemberNotFound("file not found".to_string())
            }
            other => CatalogError::NotAnArchive(other.to_string()),
        }
    }
}

impl From<upon::Error> for CatalogError {
    fn from(e: upon::Error) -> Self {
        CatalogError::Template(e.to_string())
    }
}
