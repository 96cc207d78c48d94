use std::sync::LazyLock;

use regex::Regex;

/// Character budget for an excerpt, before the ellipsis.
pub const EXCERPT_CHARS: usize = 60;
pub const ELLIPSIS: &str = "...";

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag pattern"));

/// Plain-text excerpt of a markup description.
///
/// Whitespace is collapsed before the 60 characters are counted, so line
/// breaks and indentation in the markup never eat into the excerpt.  The
/// ellipsis is always appended, whether or not anything was cut.
pub fn excerpt(description: &str) -> String {
    let plain: String = strip_tags(description).chars().take(EXCERPT_CHARS).collect();
    format!("{plain}{ELLIPSIS}")
}

/// Remove tags, decode the common entities and collapse whitespace.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
