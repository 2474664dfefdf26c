//! HTML rendering of a [`Catalog`] through [upon] templates.
//!
//! Templates receive `count` and `books`, the latter a list with the fields
//!
//! | Field         | Description                                             |
//! |---------------|---------------------------------------------------------|
//! | `Title`       | Book title                                              |
//! | `Creator`     | Author                                                  |
//! | `Subject`     | Subject                                                 |
//! | `Description` | Description                                             |
//! | `Language`    | Language code                                           |
//! | `Path`        | Host path of the archive                                |
//! | `Cover`       | Host path of the cover, empty when the book has none    |
//! | `PathUrl`     | URL of the archive under the static files prefix        |
//! | `CoverUrl`    | URL of the cover under the static files prefix, or empty |
//!
//! Values are HTML-escaped by upon's default formatter.

use crate::catalog::Catalog;
use crate::error::CatalogError;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path};
use std::str::FromStr;
use upon::{Engine, Template};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/catalog.html");

/// A compiled catalog template.
///
/// Compilation happens on construction so syntax errors surface at load
/// time rather than on the first request.
pub struct CatalogTemplate {
    engine: Engine<'static>,
    template: Template<'static>,
}

impl FromStr for CatalogTemplate {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let engine = Engine::new();
        let template = engine.compile(s.to_string())?;
        Ok(Self { engine, template })
    }
}

impl CatalogTemplate {
    /// Compile the embedded default template.
    pub fn builtin() -> Result<Self, CatalogError> {
        DEFAULT_TEMPLATE.parse()
    }

    /// Read and compile a template file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        fs::read_to_string(path)?.parse()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BookView<'a> {
    title: &'a str,
    creator: &'a str,
    subject: &'a str,
    description: &'a str,
    language: &'a str,
    path: String,
    cover: String,
    path_url: String,
    cover_url: String,
}

#[derive(Serialize)]
struct RenderContext<'a> {
    count: usize,
    books: Vec<BookView<'a>>,
}

/// Render `catalog` with `template`.
///
/// `files_prefix` is the URL prefix under which the catalog root is served,
/// e.g. `/files`.
pub fn render_catalog(
    catalog: &Catalog,
    template: &CatalogTemplate,
    files_prefix: &str,
) -> Result<String, CatalogError> {
    let books = catalog
        .records()
        .iter()
        .map(|record| BookView {
            title: &record.title,
            creator: &record.creator,
            subject: &record.subject,
            description: &record.description,
            language: &record.language,
            path: record.path.display().to_string(),
            cover: record
                .cover
                .as_ref()
                .map(|c| c.display().to_string())
                .unwrap_or_default(),
            path_url: file_url(catalog.root(), &record.path, files_prefix),
            cover_url: record
                .cover
                .as_ref()
                .map(|c| file_url(catalog.root(), c, files_prefix))
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let ctx = RenderContext {
        count: books.len(),
        books,
    };

    let html = template.template.render(&template.engine, &ctx).to_string()?;
    Ok(html)
}

/// URL for a host file below `root`, with each segment percent-encoded.
///
/// Files outside `root` cannot be served and map to an empty string.
fn file_url(root: &Path, path: &Path, files_prefix: &str) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return String::new();
    };

    let mut url = files_prefix.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            url.push('/');
            url.push_str(&urlencoding::encode(&part.to_string_lossy()));
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url() {
        let root = Path::new("books");
        assert_eq!(
            file_url(root, Path::new("books/sci-fi/a b.epub"), "/files"),
            "/files/sci-fi/a%20b.epub"
        );
        assert_eq!(file_url(root, Path::new("books/x#1.jpg"), "/files/"), "/files/x%231.jpg");
        assert_eq!(file_url(root, Path::new("elsewhere/a.epub"), "/files"), "");
    }

    #[test]
    fn test_builtin_template_compiles() {
        assert!(CatalogTemplate::builtin().is_ok());
    }

    #[test]
    fn test_bad_template_is_rejected_at_load() {
        let result = "{% for book in books %}".parse::<CatalogTemplate>();
        assert!(matches!(result, Err(CatalogError::Template(_))));
    }
}
