//! Feed source configuration and the fetch/parse layer.
//!
//! [`FeedSource`] is the immutable description of *where* the feed lives and
//! *how* the proxy in front of it answers.  The [`FeedFetcher`] trait is the
//! seam between the ingestion cycle and the network: [`HttpFetcher`] is the
//! real implementation, tests substitute their own.
//!
//! ## For contributors: adding a new proxy shape
//!
//! 1. Add a variant to [`ProxyFormat`].
//! 2. Teach [`fetch::unwrap_body`] how to pull the feed markup out of it.
//! 3. Accept the new name in `config::ProxyFormatArg`.

mod feed_item;
mod fetch;

pub use feed_item::{parse_items, RawFeedItem};
#[cfg(test)]
pub use feed_item::{Enclosure, Thumbnail};
pub use fetch::HttpFetcher;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Token in [`FeedSource::feed_url_template`] and
/// [`FeedSource::profile_url_template`] replaced by the feed id.
pub const FEED_ID_TOKEN: &str = "{feed_id}";
/// Token in [`FeedSource::proxy_template`] replaced by the encoded feed URL.
pub const URL_TOKEN: &str = "{url}";

pub const DEFAULT_FEED_URL_TEMPLATE: &str = "https://note.com/{feed_id}/rss";
pub const DEFAULT_PROFILE_URL_TEMPLATE: &str = "https://note.com/{feed_id}";
pub const DEFAULT_PROXY_TEMPLATE: &str = "https://api.allorigins.win/get?url={url}";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/concept.png";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How the proxy wraps the upstream feed in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyFormat {
    /// The response body *is* the feed markup.
    Raw,
    /// The response is JSON and the markup sits in its `contents` field.
    #[default]
    JsonEnvelope,
}

/// Where to fetch the feed from.  Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSource {
    pub feed_id: String,
    pub feed_url_template: String,
    /// Page listing every article of the feed.
    pub profile_url_template: String,
    pub proxy_template: String,
    pub proxy_format: ProxyFormat,
    /// Append a `v=<millis>` query so intermediate caches are bypassed.
    pub cache_bust: bool,
    pub timeout: Duration,
    /// Image shown on a card when no image could be extracted from the entry.
    pub placeholder_image: String,
    /// Attach a staggered idle float to every rendered card.
    pub idle_motion: bool,
}

impl FeedSource {
    pub fn new(feed_id: impl Into<String>) -> Self {
        Self {
            feed_id: feed_id.into(),
            feed_url_template: DEFAULT_FEED_URL_TEMPLATE.to_string(),
            profile_url_template: DEFAULT_PROFILE_URL_TEMPLATE.to_string(),
            proxy_template: DEFAULT_PROXY_TEMPLATE.to_string(),
            proxy_format: ProxyFormat::default(),
            cache_bust: true,
            timeout: DEFAULT_TIMEOUT,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            idle_motion: true,
        }
    }

    /// The upstream feed URL.  `cache_key` is appended as `v=` when cache
    /// busting is enabled.
    pub fn feed_url(&self, cache_key: i64) -> String {
        let url = self.feed_url_template.replace(FEED_ID_TOKEN, &self.feed_id);
        if !self.cache_bust {
            return url;
        }
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}v={cache_key}")
    }

    /// The author's page with all articles.  Never cache-busted.
    pub fn profile_url(&self) -> String {
        self.profile_url_template.replace(FEED_ID_TOKEN, &self.feed_id)
    }

    /// The URL actually requested: the feed URL, percent-encoded, embedded
    /// into the proxy template.
    pub fn proxy_url(&self, cache_key: i64) -> String {
        let feed_url = self.feed_url(cache_key);
        self.proxy_template
            .replace(URL_TOKEN, &urlencoding::encode(&feed_url))
    }
}

/// Fetches the raw feed markup for a [`FeedSource`].
///
/// Implementations do their own HTTP work and unwrap whatever envelope the
/// proxy uses; the ingestion cycle only ever sees the markup string.
pub trait FeedFetcher: Send + Sync {
    fn fetch_markup(&self, source: &FeedSource) -> impl Future<Output = Result<String>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
