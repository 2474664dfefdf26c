//! # Catalog
//!
//! Metadata and cover extraction for e-book archives, and HTML rendering of
//! the resulting catalog.
//!
//! Each archive goes through the same pipeline:
//!
//! 1. open the zip container ([`archive`])
//! 2. read `META-INF/container.xml` to find the package document ([`container`])
//! 3. parse the package document's metadata and manifest ([`package`])
//! 4. follow the `cover` meta entry to a manifest item and then to an archive member ([`cover`])
//! 5. write the cover next to the archive and build a [`CatalogRecord`] ([`extract`])
//!
//! Steps 2-4 only need a [`MemberSource`], so they run just as well over an
//! in-memory [`MemoryArchive`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog::{render_catalog, scan, CatalogTemplate, ScanOptions};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ScanOptions::default();
//! let progress_cb = |path: &Path| println!("Reading {}", path.display());
//!
//! let catalog = scan(Path::new("books"), &options, &progress_cb)?;
//! println!("{} books", catalog.len());
//!
//! let template = CatalogTemplate::builtin()?;
//! let html = render_catalog(&catalog, &template, "/files")?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod catalog;
pub mod container;
pub mod cover;
pub mod error;
pub mod extract;
pub mod package;
pub mod render;
pub mod types;
mod xml;

// Re-export main types
pub use archive::{ArchiveMember, MemberSource, MemoryArchive, ZipArchiveReader};
pub use catalog::{Catalog, SkippedArchive};
pub use container::ContainerDescriptor;
pub use error::CatalogError;
pub use package::{ManifestItem, MetaEntry, RawPackageDescriptor};
pub use render::{render_catalog, CatalogTemplate};
pub use types::{CatalogRecord, ErrorPolicy, ScanOptions};

use std::path::Path;

/// Type alias for scan progress callbacks.
///
/// Called with the path of each archive just before it is extracted.
pub type ProgressCallback<'a> = dyn Fn(&Path) + Send + Sync + 'a;

/// Extract a single archive into a catalog record.
///
/// # Returns
///
/// `Ok(None)` if the file does not carry the configured archive extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or is not a zip container
/// - The container descriptor is missing or malformed
/// - The package document is missing or malformed
/// - A cover is declared but its member is not in the archive
/// - The cover file cannot be written
pub fn extract(
    archive_path: &Path,
    options: &ScanOptions,
) -> Result<Option<CatalogRecord>, CatalogError> {
    extract::extract_book(archive_path, options)
}

/// Scan a directory tree and build a [`Catalog`].
///
/// # Errors
///
/// Returns the first archive error under [`ErrorPolicy::Abort`], or any
/// directory walk error.
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    progress_cb: &ProgressCallback,
) -> Result<Catalog, CatalogError> {
    catalog::scan_directory(root, options, progress_cb)
}
