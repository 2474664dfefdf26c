//! Locating the package document through `META-INF/container.xml`.

use crate::archive::MemberSource;
use crate::error::CatalogError;
use crate::xml::{attribute, local_name, stack_ends_with};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Fixed location of the container descriptor inside every archive.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// The parsed container descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDescriptor {
    /// Archive member path of the package document
    pub package_path: String,
}

/// Read the container descriptor from `source` and return the package document path.
///
/// # Errors
///
/// - [`CatalogError::ContainerMissing`] if the archive has no container descriptor
/// - [`CatalogError::MalformedContainer`] if it cannot be parsed or names no rootfile
pub fn resolve_package_path<S: MemberSource + ?Sized>(
    source: &mut S,
) -> Result<String, CatalogError> {
    let data = match source.read_member(CONTAINER_PATH) {
        Ok(data) => data,
        Err(CatalogError::MemberNotFound(_)) => return Err(CatalogError::ContainerMissing),
        Err(e) => return Err(e),
    };
    Ok(parse_container(&data)?.package_path)
}

/// Parse container descriptor bytes.
///
/// Only the first `rootfiles/rootfile` element is consulted; later ones are
/// ignored even when they carry a different path.
pub fn parse_container(data: &[u8]) -> Result<ContainerDescriptor, CatalogError> {
    let malformed = |e: quick_xml::Error| CatalogError::MalformedContainer(e.to_string());

    let mut reader = Reader::from_reader(data);
    let mut stack: Vec<String> = Vec::new();
    // Outer None: no rootfile seen yet. Inner None: first rootfile had no full-path.
    let mut first_rootfile: Option<Option<String>> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let name = local_name(&e);
                if first_rootfile.is_none()
                    && name == "rootfile"
                    && stack_ends_with(&stack, &["rootfiles"])
                {
                    first_rootfile = Some(attribute(&e, "full-path").map_err(malformed)?);
                }
                saw_root = true;
                stack.push(name);
            }
            Event::Empty(e) => {
                if first_rootfile.is_none()
                    && local_name(&e) == "rootfile"
                    && stack_ends_with(&stack, &["rootfiles"])
                {
                    first_rootfile = Some(attribute(&e, "full-path").map_err(malformed)?);
                }
                saw_root = true;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root || !stack.is_empty() {
        return Err(CatalogError::MalformedContainer(
            "unexpected end of document".to_string(),
        ));
    }

    match first_rootfile {
        Some(Some(package_path)) => Ok(ContainerDescriptor { package_path }),
        Some(None) => Err(CatalogError::MalformedContainer(
            "rootfile has no full-path attribute".to_string(),
        )),
        None => Err(CatalogError::MalformedContainer(
            "no rootfiles/rootfile element".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;

    const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    #[test]
    fn test_parse_container() {
        let descriptor = parse_container(CONTAINER.as_bytes()).unwrap();
        assert_eq!(descriptor.package_path, "OEBPS/content.opf");
    }

    #[test]
    fn test_first_rootfile_wins() {
        let xml = r#"<container><rootfiles>
            <rootfile full-path="first.opf"></rootfile>
            <rootfile full-path="second.opf"/>
        </rootfiles></container>"#;
        assert_eq!(parse_container(xml.as_bytes()).unwrap().package_path, "first.opf");
    }

    #[test]
    fn test_rootfile_outside_rootfiles_is_ignored() {
        let xml = r#"<container><rootfile full-path="stray.opf"/></container>"#;
        assert!(matches!(
            parse_container(xml.as_bytes()),
            Err(CatalogError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_rootfile_without_full_path() {
        let xml = r#"<container><rootfiles><rootfile media-type="x"/></rootfiles></container>"#;
        assert!(matches!(
            parse_container(xml.as_bytes()),
            Err(CatalogError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_broken_xml() {
        let xml = r#"<container><rootfiles><rootfile full-path="a.opf"/></container>"#;
        assert!(matches!(
            parse_container(xml.as_bytes()),
            Err(CatalogError::MalformedContainer(_))
        ));
        assert!(matches!(
            parse_container(b""),
            Err(CatalogError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_resolve_missing_container() {
        let mut archive =
            MemoryArchive::default().with_member("content.opf", b"<package/>".to_vec());
        assert!(matches!(
            resolve_package_path(&mut archive),
            Err(CatalogError::ContainerMissing)
        ));
    }

    #[test]
    fn test_resolve_from_source() {
        let mut archive =
            MemoryArchive::default().with_member(CONTAINER_PATH, CONTAINER.as_bytes().to_vec());
        assert_eq!(resolve_package_path(&mut archive).unwrap(), "OEBPS/content.opf");
    }
}
