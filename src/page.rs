//! Defines [`Page`], one markdown source on its way to becoming one HTML
//! document, and [`output_path`], the mapping from source location to clean-URL
//! output location.

use crate::markdown;
use crate::template::{PageContext, Template};
use std::path::{Path, PathBuf};

/// The extension that marks a file as a page.
pub const MARKDOWN_EXTENSION: &str = ".md";

const INDEX_PAGE: &str = "index.md";
const INDEX_HTML: &str = "index.html";

/// A page read from disk. Pages are consumed as soon as they're written.
pub struct Page {
    /// The source file the page was read from.
    pub source_path: PathBuf,

    /// The directory containing the source, relative to the page root.
    pub relative_dir: PathBuf,

    /// The source file's name (e.g., `setup.md`).
    pub file_name: String,

    /// The page title (see [`markdown::extract_title`]).
    pub title: String,

    /// The raw markdown.
    pub markdown: String,
}

impl Page {
    /// Builds a page from its location and contents. The title is extracted
    /// immediately.
    pub fn new(
        source_path: PathBuf,
        relative_dir: PathBuf,
        file_name: String,
        markdown: String,
    ) -> Page {
        Page {
            title: markdown::extract_title(&markdown),
            source_path,
            relative_dir,
            file_name,
            markdown,
        }
    }

    /// Renders the page body and applies `template`.
    pub fn render(&self, template: &Template, site_title: &str, base: &str) -> String {
        let content = markdown::to_html(&self.markdown);
        template.render(&PageContext {
            title: &self.title,
            site_title,
            base,
            content: &content,
        })
    }

    /// Where this page lands under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_path(output_root, &self.relative_dir, &self.file_name)
    }
}

/// Returns true if `file_name` names a markdown page.
pub fn is_page(file_name: &str) -> bool {
    file_name.ends_with(MARKDOWN_EXTENSION)
}

/// Maps a page to its output file. `index.md` (in any case) becomes
/// `{output_root}/{relative_dir}/index.html`; any other `{name}.md` becomes
/// `{output_root}/{relative_dir}/{name}/index.html`.
pub fn output_path(output_root: &Path, relative_dir: &Path, file_name: &str) -> PathBuf {
    let dir = output_root.join(relative_dir);
    if file_name.eq_ignore_ascii_case(INDEX_PAGE) {
        dir.join(INDEX_HTML)
    } else {
        let stem = file_name
            .strip_suffix(MARKDOWN_EXTENSION)
            .unwrap_or(file_name);
        dir.join(stem).join(INDEX_HTML)
    }
}
