//! Member lookup inside e-book containers.
//!
//! Everything downstream of opening an archive goes through [`MemberSource`],
//! so descriptor parsing and cover resolution can run against an in-memory
//! [`MemoryArchive`] as well as a real zip file.

use crate::error::CatalogError;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// A named blob inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Exact slash-separated path of the member
    pub path: String,

    /// Uncompressed content
    pub data: Vec<u8>,
}

impl ArchiveMember {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Read access to the members of an opened archive.
///
/// Lookups compare paths exactly: case-sensitive, no normalization, and the
/// first member with a matching path wins.
pub trait MemberSource {
    /// All member paths in archive order.
    fn list_members(&mut self) -> Result<Vec<String>, CatalogError>;

    /// Read the full content of the first member whose path equals `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MemberNotFound`] when no member matches.
    fn read_member(&mut self, path: &str) -> Result<Vec<u8>, CatalogError>;

    /// Whether a member with exactly this path exists.
    fn contains(&mut self, path: &str) -> Result<bool, CatalogError> {
        Ok(self.list_members()?.iter().any(|name| name == path))
    }
}

/// Zip-backed member source. The underlying file is closed on drop.
pub struct ZipArchiveReader<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl ZipArchiveReader<BufReader<File>> {
    /// Open a zip container on the host filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be opened and
    /// [`CatalogError::NotAnArchive`] if it is not a readable zip.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipArchiveReader<R> {
    pub fn new(reader: R) -> Result<Self, CatalogError> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    fn index_of(&mut self, path: &str) -> Result<Option<usize>, CatalogError> {
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            if entry.name() == path {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

impl<R: Read + Seek> MemberSource for ZipArchiveReader<R> {
    fn list_members(&mut self) -> Result<Vec<String>, CatalogError> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn read_member(&mut self, path: &str) -> Result<Vec<u8>, CatalogError> {
        let index = self
            .index_of(path)?
            .ok_or_else(|| CatalogError::MemberNotFound(path.to_string()))?;

        let mut entry = self.archive.by_index(index)?;
        // The header size is untrusted; let the buffer grow with the data.
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    fn contains(&mut self, path: &str) -> Result<bool, CatalogError> {
        Ok(self.index_of(path)?.is_some())
    }
}

/// Member source over members already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    members: Vec<ArchiveMember>,
}

impl MemoryArchive {
    pub fn new(members: Vec<ArchiveMember>) -> Self {
        Self { members }
    }

    /// Append a member, keeping any earlier member with the same path first.
    pub fn with_member(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.members.push(ArchiveMember::new(path, data));
        self
    }
}

impl MemberSource for MemoryArchive {
    fn list_members(&mut self) -> Result<Vec<String>, CatalogError> {
        Ok(self.members.iter().map(|m| m.path.clone()).collect())
    }

    fn read_member(&mut self, path: &str) -> Result<Vec<u8>, CatalogError> {
        self.members
            .iter()
            .find(|m| m.path == path)
            .map(|m| m.data.clone())
            .ok_or_else(|| CatalogError::MemberNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_zip_reader_lists_and_reads() {
        let bytes = zip_bytes(&[("mimetype", b"application/epub+zip"), ("OEBPS/a.txt", b"A")]);
        let mut reader = ZipArchiveReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.list_members().unwrap(), vec!["mimetype", "OEBPS/a.txt"]);
        assert_eq!(reader.read_member("OEBPS/a.txt").unwrap(), b"A");
        assert!(reader.contains("mimetype").unwrap());
    }

    #[test]
    fn test_zip_reader_reads_large_deflated_member() {
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.start_file("OEBPS/big.bin", options).unwrap();
        zip.write_all(&content).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let mut reader = ZipArchiveReader::new(Cursor::new(bytes)).unwrap();
        let data = reader.read_member("OEBPS/big.bin").unwrap();
        assert_eq!(data.len(), content.len());
        assert_eq!(data, content);
    }

    #[test]
    fn test_zip_reader_lookup_is_exact() {
        let bytes = zip_bytes(&[("OEBPS/Cover.jpg", b"img")]);
        let mut reader = ZipArchiveReader::new(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            reader.read_member("OEBPS/cover.jpg"),
            Err(CatalogError::MemberNotFound(p)) if p == "OEBPS/cover.jpg"
        ));
        assert!(!reader.contains("./OEBPS/Cover.jpg").unwrap());
    }

    #[test]
    fn test_zip_reader_rejects_non_zip() {
        let result = ZipArchiveReader::new(Cursor::new(b"not a zip at all".to_vec()));
        assert!(matches!(result, Err(CatalogError::NotAnArchive(_))));
    }

    #[test]
    fn test_memory_archive_first_match_wins() {
        let mut archive = MemoryArchive::default()
            .with_member("a.txt", b"first".to_vec())
            .with_member("a.txt", b"second".to_vec());

        assert_eq!(archive.read_member("a.txt").unwrap(), b"first");
        assert!(archive.contains("a.txt").unwrap());
        assert!(!archive.contains("b.txt").unwrap());
    }

    #[test]
    fn test_memory_archive_from_members() {
        let mut archive = MemoryArchive::new(vec![
            ArchiveMember::new("META-INF/container.xml", "<container/>"),
            ArchiveMember::new("content.opf", "<package/>"),
        ]);

        assert_eq!(
            archive.list_members().unwrap(),
            vec!["META-INF/container.xml", "content.opf"]
        );
        assert_eq!(archive.read_member("content.opf").unwrap(), b"<package/>");
        assert!(matches!(
            archive.read_member("missing.opf"),
            Err(CatalogError::MemberNotFound(p)) if p == "missing.opf"
        ));
    }
}
