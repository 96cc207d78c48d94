//! Representative-image resolution.
//!
//! Feeds carry their article image in any of half a dozen places, so the
//! chain below is tried in order and the first strategy that yields a URL
//! wins.  Each strategy is a plain function over a [`RawFeedItem`] so it can
//! be tested on its own.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::RawFeedItem;

/// A thumbnail whose URL contains this is the author's avatar, never the
/// article image.
pub const PROFILE_IMAGE_MARKER: &str = "profile_images";

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).expect("Invalid img src pattern")
});

static DATA_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)data-src=["']([^"']+)["']"#).expect("Invalid data-src pattern")
});

static ASSET_HOST_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(https://assets\.st-note\.com/[^"'\s>)]+\.(?:jpg|jpeg|png|gif))"#)
        .expect("Invalid asset host pattern")
});

type Strategy = fn(&RawFeedItem) -> Option<String>;

/// The fallback chain, highest priority first.
const CHAIN: &[(&str, Strategy)] = &[
    ("thumbnail", from_thumbnail),
    ("enclosure", from_enclosure),
    ("content-img", from_content_img),
    ("content-data-src", from_content_data_src),
    ("description-img", from_description_img),
    ("asset-host", from_asset_host),
];

/// Resolve the image for `item`, falling back to `placeholder`.
pub fn resolve_image(item: &RawFeedItem, placeholder: &str) -> String {
    for (name, strategy) in CHAIN {
        if let Some(url) = strategy(item).filter(|u| !u.trim().is_empty()) {
            tracing::debug!("image for {:?} from {name}: {url}", item.title);
            return url;
        }
    }
    tracing::debug!("image for {:?} falls back to placeholder", item.title);
    placeholder.to_string()
}

fn from_thumbnail(item: &RawFeedItem) -> Option<String> {
    let thumb = item.thumbnail.as_ref()?;
    let url = thumb
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .or(thumb.text.as_deref())?
        .trim();

    if url.contains(PROFILE_IMAGE_MARKER) {
        tracing::debug!("ignoring profile image thumbnail {url}");
        return None;
    }
    Some(url.to_string())
}

fn from_enclosure(item: &RawFeedItem) -> Option<String> {
    item.enclosure
        .as_ref()
        .filter(|e| e.mime_type.starts_with("image"))
        .map(|e| e.url.clone())
}

fn from_content_img(item: &RawFeedItem) -> Option<String> {
    first_capture(&IMG_SRC, item.content_encoded.as_deref()?)
}

fn from_content_data_src(item: &RawFeedItem) -> Option<String> {
    first_capture(&DATA_SRC, item.content_encoded.as_deref()?)
}

fn from_description_img(item: &RawFeedItem) -> Option<String> {
    first_capture(&IMG_SRC, &item.description)
}

fn from_asset_host(item: &RawFeedItem) -> Option<String> {
    let combined = format!(
        "{}{}",
        item.description,
        item.content_encoded.as_deref().unwrap_or_default()
    );
    first_capture(&ASSET_HOST_IMAGE, &combined)
}

fn first_capture(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Enclosure, Thumbnail};

    const PLACEHOLDER: &str = "images/concept.png";

    fn bare() -> RawFeedItem {
        RawFeedItem {
            title: "t".into(),
            link: "https://example.com".into(),
            pub_date: "Mon, 03 Jun 2024 10:00:00 GMT".into(),
            description: String::new(),
            content_encoded: None,
            enclosure: None,
            thumbnail: None,
        }
    }

    fn thumb(url: &str) -> Option<Thumbnail> {
        Some(Thumbnail {
            url: Some(url.into()),
            text: None,
        })
    }

    fn enclosure(url: &str, mime: &str) -> Option<Enclosure> {
        Some(Enclosure {
            url: url.into(),
            mime_type: mime.into(),
        })
    }

    #[test]
    fn thumbnail_beats_enclosure() {
        let item = RawFeedItem {
            thumbnail: thumb("https://example.com/thumb.jpg"),
            enclosure: enclosure("https://example.com/enc.jpg", "image/jpeg"),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/thumb.jpg");
    }

    #[test]
    fn thumbnail_inline_text_used_without_url_attribute() {
        let item = RawFeedItem {
            thumbnail: Some(Thumbnail {
                url: None,
                text: Some(" https://example.com/inline.jpg ".into()),
            }),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/inline.jpg");
    }

    #[test]
    fn image_enclosure_beats_body_images() {
        let item = RawFeedItem {
            enclosure: enclosure("https://example.com/enc.jpg", "image/jpeg"),
            content_encoded: Some(r#"<img src="https://example.com/body.png">"#.into()),
            description: r#"<img src="https://example.com/desc.png">"#.into(),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/enc.jpg");
    }

    #[test]
    fn non_image_enclosure_is_ignored() {
        let item = RawFeedItem {
            enclosure: enclosure("https://example.com/ep.mp3", "audio/mpeg"),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), PLACEHOLDER);
    }

    #[test]
    fn content_img_is_used_when_no_structured_fields() {
        let item = RawFeedItem {
            content_encoded: Some(r#"<p>hi</p><IMG alt="x" src='https://example.com/a.png'>"#.into()),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/a.png");
    }

    #[test]
    fn data_src_covers_lazy_loaded_markup() {
        let item = RawFeedItem {
            content_encoded: Some(r#"<figure data-src="https://example.com/lazy.jpg"></figure>"#.into()),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/lazy.jpg");
    }

    #[test]
    fn description_img_is_after_content() {
        let item = RawFeedItem {
            description: r#"<img src="https://example.com/desc.png">"#.into(),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/desc.png");
    }

    #[test]
    fn asset_host_url_found_anywhere() {
        let item = RawFeedItem {
            description: "see https://assets.st-note.com/img/1234/pic.JPEG here".into(),
            ..bare()
        };
        assert_eq!(
            resolve_image(&item, PLACEHOLDER),
            "https://assets.st-note.com/img/1234/pic.JPEG"
        );
    }

    #[test]
    fn nothing_extractable_gives_placeholder() {
        let item = RawFeedItem {
            description: "<p>just words</p>".into(),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), PLACEHOLDER);
    }

    #[test]
    fn profile_image_thumbnail_is_skipped() {
        let item = RawFeedItem {
            thumbnail: thumb("https://assets.st-note.com/production/uploads/images/profile_images/1.jpeg"),
            enclosure: enclosure("https://example.com/enc.png", "image/png"),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/enc.png");
    }

    #[test]
    fn profile_image_alone_falls_through_to_placeholder() {
        let item = RawFeedItem {
            thumbnail: thumb("https://cdn.example.com/profile_images/me.png"),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), PLACEHOLDER);
    }

    #[test]
    fn blank_thumbnail_counts_as_absent() {
        let item = RawFeedItem {
            thumbnail: thumb("  "),
            description: r#"<img src="https://example.com/desc.png">"#.into(),
            ..bare()
        };
        assert_eq!(resolve_image(&item, PLACEHOLDER), "https://example.com/desc.png");
    }
}
