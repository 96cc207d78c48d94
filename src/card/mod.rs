//! Render-ready projection of a feed entry.
//!
//! A [`DisplayCard`] is what the rendering surface shows: plain text only,
//! a fixed-shape date, and an image URL that is never empty.  Derivation is
//! pure, so every rule lives in a sub-module with its own tests.

mod date;
mod excerpt;
mod image;

pub use date::format_date;
pub use excerpt::{excerpt, strip_tags};
pub use image::resolve_image;

use crate::source::RawFeedItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCard {
    pub title: String,
    /// Canonical entry link, opened in a new browsing context when chosen.
    pub link: String,
    /// `YYYY.MM.DD`, or [`date::PLACEHOLDER_DATE`].
    pub date: String,
    pub image_url: String,
    pub excerpt: String,
}

impl DisplayCard {
    /// Derive a card from a raw entry.  `placeholder_image` is used when the
    /// entry carries no usable image.
    pub fn from_raw(item: &RawFeedItem, placeholder_image: &str) -> Self {
        let title = match strip_tags(&item.title) {
            plain if plain.is_empty() => item.title.clone(),
            plain => plain,
        };
        Self {
            title,
            link: item.link.clone(),
            date: format_date(&item.pub_date),
            image_url: resolve_image(item, placeholder_image),
            excerpt: excerpt(&item.description),
        }
    }
}
