//! Converts document bodies from markdown to HTML with [`pulldown_cmark`].

use pulldown_cmark::{html, Options, Parser};

/// Converts markdown to HTML. Malformed markdown never fails; it degrades to
/// whatever the CommonMark rules make of it.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}
