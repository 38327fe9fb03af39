//! Defines the [`Template`] type, the single layout every page is rendered
//! through. Templating is plain token substitution; there is no logic.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TITLE_TOKEN: &str = "{{title}}";
const SITE_TITLE_TOKEN: &str = "{{site_title}}";
const BASE_TOKEN: &str = "{{base}}";
const CONTENT_TOKEN: &str = "{{content}}";

/// The values substituted into the layout for one page.
pub struct PageContext<'a> {
    /// The page title, unescaped.
    pub title: &'a str,

    /// The site title, unescaped.
    pub site_title: &'a str,

    /// The normalized base path (always ends in `/`).
    pub base: &'a str,

    /// The rendered HTML fragment. Inserted verbatim.
    pub content: &'a str,
}

/// A layout loaded into memory. Immutable once loaded; every call to
/// [`Template::render`] works on a fresh copy.
#[derive(Clone, Debug)]
pub struct Template {
    raw: String,
}

impl Template {
    /// Reads the layout from `path`. Invalid UTF-8 is replaced with U+FFFD.
    pub fn load(path: &Path) -> Result<Template> {
        match fs::read(path) {
            Ok(bytes) => Ok(Template::from(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) => Err(Error::Read {
                path: path.to_owned(),
                err,
            }),
        }
    }

    /// Renders a page. `{{title}}`, `{{site_title}}` and `{{base}}` are
    /// replaced everywhere; only the first `{{content}}` is replaced, and it
    /// is replaced last so that placeholder-like text in the content survives.
    pub fn render(&self, ctx: &PageContext) -> String {
        self.raw
            .replace(TITLE_TOKEN, &escape_html(ctx.title))
            .replace(SITE_TITLE_TOKEN, &escape_html(ctx.site_title))
            .replace(BASE_TOKEN, ctx.base)
            .replacen(CONTENT_TOKEN, ctx.content, 1)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Template {
        Template { raw }
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Template {
        Template::from(raw.to_owned())
    }
}

/// Escapes `&`, `<` and `>`. The ampersand goes first so that the entities
/// produced for the others aren't escaped again.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The result of a template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Template`].
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the layout file can't be read.
    #[error("Reading template file '{}': {err}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
