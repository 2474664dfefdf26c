//! Cover image resolution.
//!
//! A package document names its cover indirectly: a `<meta name="cover">`
//! entry holds a manifest item id, and that manifest item holds the href of
//! the image relative to the package document. Absence anywhere along that
//! chain means "no cover". Only a declared cover whose member is missing
//! from the archive is an error.

use crate::archive::MemberSource;
use crate::error::CatalogError;
use crate::package::RawPackageDescriptor;
use tracing::debug;

/// Meta entry name that points at the cover's manifest item.
pub const COVER_META_NAME: &str = "cover";

/// Follow the meta -> manifest chain to the cover href, without touching the archive.
///
/// Both lookups take the first match.
pub fn cover_href(descriptor: &RawPackageDescriptor) -> Option<&str> {
    let id = descriptor
        .meta
        .iter()
        .find(|entry| entry.name == COVER_META_NAME)?
        .content
        .as_str();

    descriptor
        .manifest
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.href.as_str())
}

/// Join an href onto the directory of the package document.
///
/// ```
/// use catalog::cover::member_path;
///
/// assert_eq!(member_path("OEBPS/content.opf", "images/cover.jpg"), "OEBPS/images/cover.jpg");
/// assert_eq!(member_path("content.opf", "images/cover.jpg"), "images/cover.jpg");
/// ```
pub fn member_path(package_path: &str, href: &str) -> String {
    match package_path.rfind('/') {
        Some(idx) if idx > 0 => format!("{}/{}", &package_path[..idx], href),
        _ => href.to_string(),
    }
}

/// Resolve the archive member path of the cover image.
///
/// Returns `Ok(None)` when the book declares no cover, or declares a manifest
/// id that the manifest does not contain.
///
/// # Errors
///
/// Returns [`CatalogError::CoverMemberNotFound`] if the cover resolves to a
/// member path that does not exist in `source`.
pub fn resolve_cover<S: MemberSource + ?Sized>(
    descriptor: &RawPackageDescriptor,
    package_path: &str,
    source: &mut S,
) -> Result<Option<String>, CatalogError> {
    let Some(href) = cover_href(descriptor) else {
        debug!(package = package_path, "no cover declared");
        return Ok(None);
    };

    let path = member_path(package_path, href);
    if !source.contains(&path)? {
        return Err(CatalogError::CoverMemberNotFound(path));
    }
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::package::{ManifestItem, MetaEntry};

    fn descriptor(meta: &[(&str, &str)], manifest: &[(&str, &str)]) -> RawPackageDescriptor {
        RawPackageDescriptor {
            meta: meta
                .iter()
                .map(|(name, content)| MetaEntry {
                    name: name.to_string(),
                    content: content.to_string(),
                })
                .collect(),
            manifest: manifest
                .iter()
                .map(|(id, href)| ManifestItem {
                    id: id.to_string(),
                    href: href.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_member_path_relative_to_package_dir() {
        assert_eq!(member_path("OEBPS/content.opf", "images/cover.jpg"), "OEBPS/images/cover.jpg");
        assert_eq!(member_path("a/b/package.opf", "c.png"), "a/b/c.png");
        assert_eq!(member_path("content.opf", "images/cover.jpg"), "images/cover.jpg");
    }

    #[test]
    fn test_resolve_in_subdirectory() {
        let d = descriptor(&[("cover", "img")], &[("img", "images/cover.jpg")]);
        let mut archive =
            MemoryArchive::default().with_member("OEBPS/images/cover.jpg", b"jpg".to_vec());

        let resolved = resolve_cover(&d, "OEBPS/content.opf", &mut archive).unwrap();
        assert_eq!(resolved.as_deref(), Some("OEBPS/images/cover.jpg"));
    }

    #[test]
    fn test_resolve_at_root() {
        let d = descriptor(&[("cover", "img")], &[("img", "images/cover.jpg")]);
        let mut archive = MemoryArchive::default().with_member("images/cover.jpg", b"jpg".to_vec());

        let resolved = resolve_cover(&d, "content.opf", &mut archive).unwrap();
        assert_eq!(resolved.as_deref(), Some("images/cover.jpg"));
    }

    #[test]
    fn test_no_cover_meta() {
        let d = descriptor(&[("generator", "x")], &[("img", "cover.jpg")]);
        let mut archive = MemoryArchive::default().with_member("cover.jpg", b"jpg".to_vec());

        assert_eq!(resolve_cover(&d, "content.opf", &mut archive).unwrap(), None);
    }

    #[test]
    fn test_cover_id_missing_from_manifest_is_tolerated() {
        let d = descriptor(&[("cover", "absent")], &[("img", "cover.jpg")]);
        let mut archive = MemoryArchive::default();

        assert_eq!(resolve_cover(&d, "content.opf", &mut archive).unwrap(), None);
    }

    #[test]
    fn test_declared_cover_missing_from_archive() {
        let d = descriptor(&[("cover", "img")], &[("img", "images/cover.jpg")]);
        let mut archive =
            MemoryArchive::default().with_member("images/other.jpg", b"jpg".to_vec());

        let err = resolve_cover(&d, "OEBPS/content.opf", &mut archive).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CoverMemberNotFound(p) if p == "OEBPS/images/cover.jpg"
        ));
    }

    #[test]
    fn test_first_match_semantics() {
        let d = descriptor(
            &[("cover", "a"), ("cover", "b")],
            &[("b", "b.png"), ("a", "a1.png"), ("a", "a2.png")],
        );
        assert_eq!(cover_href(&d), Some("a1.png"));
    }
}
