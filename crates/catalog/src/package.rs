//! Package document (OPF) parsing.

use crate::error::CatalogError;
use crate::xml::{attribute, local_name};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A `metadata/meta` name/content pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub name: String,
    pub content: String,
}

/// A `manifest/item` id/href pair. `href` is relative to the package document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
}

/// The fields of a package document the catalog consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPackageDescriptor {
    pub title: String,
    pub creator: String,
    pub subject: String,
    pub description: String,
    pub language: String,

    /// Meta entries in document order
    pub meta: Vec<MetaEntry>,

    /// Manifest items in document order
    pub manifest: Vec<ManifestItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Title,
    Creator,
    Subject,
    Description,
    Language,
}

impl Scalar {
    fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Scalar::Title),
            "creator" => Some(Scalar::Creator),
            "subject" => Some(Scalar::Subject),
            "description" => Some(Scalar::Description),
            "language" => Some(Scalar::Language),
            _ => None,
        }
    }
}

/// Collects scalars and entries while the document is walked.
#[derive(Default)]
struct Builder {
    descriptor: RawPackageDescriptor,
    // Scalar being captured and the stack depth of its element
    capturing: Option<(Scalar, usize)>,
}

impl Builder {
    fn slot(&mut self, scalar: Scalar) -> &mut String {
        match scalar {
            Scalar::Title => &mut self.descriptor.title,
            Scalar::Creator => &mut self.descriptor.creator,
            Scalar::Subject => &mut self.descriptor.subject,
            Scalar::Description => &mut self.descriptor.description,
            Scalar::Language => &mut self.descriptor.language,
        }
    }

    /// Handle an element opening at `stack`, which already excludes the element itself.
    /// Returns the scalar the element starts; its previous value is discarded.
    fn open(
        &mut self,
        stack: &[String],
        e: &BytesStart<'_>,
    ) -> Result<Option<Scalar>, quick_xml::Error> {
        // Consumed elements hang directly off <package><metadata> or <package><manifest>.
        if stack.len() != 2 {
            return Ok(None);
        }

        let name = local_name(e);
        match (stack[1].as_str(), name.as_str()) {
            ("metadata", "meta") => {
                self.descriptor.meta.push(MetaEntry {
                    name: attribute(e, "name")?.unwrap_or_default(),
                    content: attribute(e, "content")?.unwrap_or_default(),
                });
                Ok(None)
            }
            ("manifest", "item") => {
                self.descriptor.manifest.push(ManifestItem {
                    id: attribute(e, "id")?.unwrap_or_default(),
                    href: attribute(e, "href")?.unwrap_or_default(),
                });
                Ok(None)
            }
            ("metadata", other) => {
                let scalar = Scalar::from_local_name(other);
                if let Some(scalar) = scalar {
                    self.slot(scalar).clear();
                }
                Ok(scalar)
            }
            _ => Ok(None),
        }
    }
}

/// Parse package document bytes into a [`RawPackageDescriptor`].
///
/// Element names are matched by local name, so `dc:title` and `title` are the
/// same field. A repeated scalar keeps its last occurrence. Missing
/// scalars stay empty.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedPackageDocument`] if the bytes are not a
/// well-formed XML document.
pub fn parse_package(data: &[u8]) -> Result<RawPackageDescriptor, CatalogError> {
    let malformed = |e: quick_xml::Error| CatalogError::MalformedPackageDocument(e.to_string());

    let mut reader = Reader::from_reader(data);
    let mut stack: Vec<String> = Vec::new();
    let mut builder = Builder::default();
    let mut saw_root = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                if let Some(scalar) = builder.open(&stack, &e).map_err(malformed)? {
                    builder.capturing = Some((scalar, stack.len() + 1));
                }
                saw_root = true;
                stack.push(local_name(&e));
            }
            Event::Empty(e) => {
                // An empty scalar element still replaces any earlier value.
                builder.open(&stack, &e).map_err(malformed)?;
                saw_root = true;
            }
            Event::Text(t) => {
                if let Some((scalar, depth)) = builder.capturing {
                    if depth == stack.len() {
                        let text = t.unescape().map_err(malformed)?;
                        builder.slot(scalar).push_str(&text);
                    }
                }
            }
            Event::CData(t) => {
                if let Some((scalar, depth)) = builder.capturing {
                    if depth == stack.len() {
                        let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                        builder.slot(scalar).push_str(&text);
                    }
                }
            }
            Event::End(_) => {
                if matches!(builder.capturing, Some((_, depth)) if depth == stack.len()) {
                    builder.capturing = None;
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root || !stack.is_empty() {
        return Err(CatalogError::MalformedPackageDocument(
            "unexpected end of document".to_string(),
        ));
    }

    Ok(builder.descriptor)
}
