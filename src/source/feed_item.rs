//! Raw entries as found in the upstream feed markup.
//!
//! `RawFeedItem` is the loosely-structured input to card derivation: it keeps
//! every field that the image chain, the date formatter or the excerpt might
//! look at, and nothing else.  Values live for exactly one ingestion cycle.
//!
//! ## For contributors
//!
//! The feed is trusted for *order* (newest first) but not for *shape*.  An
//! entry missing `title`, `link` or `pubDate` is skipped with a warning rather
//! than aborting the whole batch.

use crate::error::{FeedError, Result};

/// Only the first few entries in document order are ever shown.
pub const MAX_ENTRIES: usize = 3;

/// An `<enclosure url="…" type="…"/>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}

/// A `<media:thumbnail>` element: either a `url` attribute, inline text, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thumbnail {
    pub url: Option<String>,
    pub text: Option<String>,
}

/// One feed entry, before any derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: String,
    pub link: String,
    /// Publish date as it appears in the feed.  Format is not guaranteed.
    pub pub_date: String,
    /// Markup-bearing summary.  Empty when the feed omits it.
    pub description: String,
    /// `content:encoded`, when present.
    pub content_encoded: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub thumbnail: Option<Thumbnail>,
}

impl RawFeedItem {
    /// Convert a parsed [`rss::Item`], failing when a required field is absent.
    pub fn from_rss(item: &rss::Item) -> Result<Self> {
        Ok(Self {
            title: required("title", item.title())?,
            link: required("link", item.link())?,
            pub_date: required("pubDate", item.pub_date())?,
            description: item.description().unwrap_or_default().to_string(),
            content_encoded: item.content().map(String::from),
            enclosure: item.enclosure().map(|e| Enclosure {
                url: e.url().to_string(),
                mime_type: e.mime_type().to_string(),
            }),
            thumbnail: thumbnail_of(item),
        })
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(FeedError::MalformedEntry { field })
}

/// Look for `media:thumbnail` first, then a `thumbnail` element under any
/// other namespace prefix.
fn thumbnail_of(item: &rss::Item) -> Option<Thumbnail> {
    let extensions = item.extensions();
    let ext = extensions
        .get("media")
        .and_then(|media| media.get("thumbnail"))
        .or_else(|| extensions.values().find_map(|ns| ns.get("thumbnail")))
        .and_then(|list| list.first())?;

    Some(Thumbnail {
        url: ext.attrs().get("url").cloned(),
        text: ext.value().map(String::from),
    })
}

/// Parse feed markup and return up to [`MAX_ENTRIES`] well-formed entries in
/// document order.
///
/// Truncation happens before validation: a malformed entry among the first
/// three is dropped, not replaced by the fourth.
pub fn parse_items(markup: &str) -> Result<Vec<RawFeedItem>> {
    let channel = rss::Channel::read_from(markup.as_bytes())?;

    let items = channel
        .items()
        .iter()
        .take(MAX_ENTRIES)
        .enumerate()
        .filter_map(|(index, item)| match RawFeedItem::from_rss(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("skipping feed entry #{index}: {e}");
                None
            }
        })
        .collect();

    Ok(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
