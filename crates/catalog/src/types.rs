//! Type definitions for catalog scanning.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One book's display-ready metadata plus host paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogRecord {
    pub title: String,
    pub creator: String,
    pub subject: String,
    pub description: String,
    pub language: String,

    /// Host path of the source archive
    pub path: PathBuf,

    /// Host path of the extracted cover image, if the book declares one
    pub cover: Option<PathBuf>,
}

/// Options for scanning a directory of archives.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extension (without the dot) a file must carry to be treated as an archive.
    /// Compared case-sensitively.
    pub extension: String,

    /// What to do when a single archive fails to extract
    pub on_error: ErrorPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "epub".to_string(),
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// How a directory scan reacts to a failing archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the scan and return the error; no catalog is produced
    #[default]
    Abort,

    /// Log the error, remember the archive as skipped, and keep going
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" => Ok(ErrorPolicy::Skip),
            other => Err(format!("unknown error policy '{}', expected abort or skip", other)),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Abort => f.write_str("abort"),
            ErrorPolicy::Skip => f.write_str("skip"),
        }
    }
}
