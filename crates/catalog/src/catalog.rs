//! Directory scanning into an immutable [`Catalog`].

use crate::error::CatalogError;
use crate::extract::{extract_book, has_extension};
use crate::types::{CatalogRecord, ErrorPolicy, ScanOptions};
use crate::ProgressCallback;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// An archive left out of the catalog under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone)]
pub struct SkippedArchive {
    pub path: PathBuf,
    pub reason: String,
}

/// The result of one directory scan. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    records: Vec<CatalogRecord>,
    skipped: Vec<SkippedArchive>,
}

impl Catalog {
    /// Directory the catalog was scanned from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Records in walk order
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedArchive] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Walk `root` recursively and extract every archive found.
///
/// The walk is sorted by file name so repeated scans produce the same order.
/// `progress` is called with each candidate archive before it is extracted.
///
/// # Errors
///
/// Under [`ErrorPolicy::Abort`] the first archive error is returned as is and
/// no catalog is produced. Directory walk failures are always fatal.
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
    progress: &ProgressCallback,
) -> Result<Catalog, CatalogError> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if has_extension(path, &options.extension) {
            progress(path);
        }

        match extract_book(path, options) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => match options.on_error {
                ErrorPolicy::Abort => {
                    warn!(path = %path.display(), error = %e, "aborting scan");
                    return Err(e);
                }
                ErrorPolicy::Skip => {
                    warn!(path = %path.display(), error = %e, "skipping archive");
                    skipped.push(SkippedArchive {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    info!(
        root = %root.display(),
        books = records.len(),
        skipped = skipped.len(),
        "scan complete"
    );

    Ok(Catalog {
        root: root.to_path_buf(),
        records,
        skipped,
    })
}
