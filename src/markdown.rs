//! Markdown handling: converting page sources into HTML fragments and pulling
//! the page title out of the first top-level heading.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::sync::OnceLock;

/// The title used for pages without a top-level (`# `) heading.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Converts markdown to an HTML fragment. Tables, strikethrough and task lists
/// are enabled; everything else is plain CommonMark.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, Parser::new_ext(markdown, options));
    body
}

/// Returns the text of the first line that looks like `# Heading`, trimmed of
/// surrounding whitespace, or [`DEFAULT_TITLE`] if there is none.
pub fn extract_title(markdown: &str) -> String {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    // `R` makes a bare `\r` end a line too.
    let heading = HEADING.get_or_init(|| Regex::new(r"(?mR)^#\s+(.+)$").unwrap()); // should always succeed

    heading
        .captures(markdown)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned())
}
