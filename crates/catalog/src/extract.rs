//! Per-archive extraction: metadata, cover file, catalog record.

use crate::archive::{MemberSource, ZipArchiveReader};
use crate::container::resolve_package_path;
use crate::cover::resolve_cover;
use crate::error::CatalogError;
use crate::package::{parse_package, RawPackageDescriptor};
use crate::types::{CatalogRecord, ScanOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extract one archive into a [`CatalogRecord`].
///
/// Files whose extension is not `options.extension` are not archives as far
/// as the catalog is concerned and yield `Ok(None)`. For archives, the cover
/// image (if any) is written next to the archive as `<stem>.<cover-ext>`,
/// replacing any existing file of that name.
///
/// # Errors
///
/// Any failure to open the archive, resolve the container, parse the package
/// document, locate the declared cover, or write the cover file.
pub fn extract_book(
    archive_path: &Path,
    options: &ScanOptions,
) -> Result<Option<CatalogRecord>, CatalogError> {
    if !has_extension(archive_path, &options.extension) {
        debug!(path = %archive_path.display(), "skipping non-archive file");
        return Ok(None);
    }

    // The reader (and its file handle) is dropped on every exit path below.
    let mut archive = ZipArchiveReader::open(archive_path)?;
    let record = extract_from_source(&mut archive, archive_path)?;

    info!(title = %record.title, path = %archive_path.display(), "catalogued");
    Ok(Some(record))
}

/// Run the pipeline over an already opened archive.
///
/// `archive_path` is only used to name the record and the cover file.
pub fn extract_from_source<S: MemberSource + ?Sized>(
    source: &mut S,
    archive_path: &Path,
) -> Result<CatalogRecord, CatalogError> {
    let package_path = resolve_package_path(source)?;
    let package = source.read_member(&package_path)?;
    let descriptor = parse_package(&package)?;

    let cover = match resolve_cover(&descriptor, &package_path, source)? {
        Some(member) => {
            let data = source.read_member(&member)?;
            let target = cover_host_path(archive_path, &member);
            fs::write(&target, &data)?;
            debug!(
                member = %member,
                target = %target.display(),
                bytes = data.len(),
                "wrote cover"
            );
            Some(target)
        }
        None => None,
    };

    Ok(build_record(descriptor, archive_path, cover))
}

/// Host path for a cover: the archive path with its extension replaced by
/// the cover member's extension.
///
/// A cover member without an extension yields the bare archive stem.
pub fn cover_host_path(archive_path: &Path, cover_member: &str) -> PathBuf {
    let extension = Path::new(cover_member)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    archive_path.with_extension(extension)
}

/// Check whether a path carries exactly the given extension (case-sensitive).
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

fn build_record(
    descriptor: RawPackageDescriptor,
    archive_path: &Path,
    cover: Option<PathBuf>,
) -> CatalogRecord {
    CatalogRecord {
        title: descriptor.title,
        creator: descriptor.creator,
        subject: descriptor.subject,
        description: descriptor.description,
        language: descriptor.language,
        path: archive_path.to_path_buf(),
        cover,
    }
}
