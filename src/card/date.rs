use chrono::DateTime;

/// Shown when the feed's date cannot be parsed.
pub const PLACEHOLDER_DATE: &str = "----.--.--";

/// Format a feed publish date as `YYYY.MM.DD`.
///
/// RSS dates are RFC 2822; RFC 3339 is accepted too since some generators
/// emit it.  The calendar day is taken in the date's own UTC offset.
pub fn format_date(text: &str) -> String {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|dt| dt.format("%Y.%m.%d").to_string())
        .unwrap_or_else(|e| {
            tracing::debug!("unparseable pubDate {text:?}: {e}");
            PLACEHOLDER_DATE.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc2822_gmt() {
        assert_eq!(format_date("Mon, 03 Jun 2024 10:00:00 GMT"), "2024.06.03");
    }

    #[test]
    fn keeps_the_feed_offset() {
        // 16:30 on the 2nd in UTC.
        assert_eq!(format_date("Mon, 03 Jun 2024 01:30:00 +0900"), "2024.06.03");
    }

    #[test]
    fn accepts_rfc3339() {
        assert_eq!(format_date("2024-12-01T08:15:00+09:00"), "2024.12.01");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(format_date("\n  Tue, 09 Jan 2024 00:00:00 +0000 \n"), "2024.01.09");
    }

    #[test]
    fn garbage_degrades_to_placeholder() {
        assert_eq!(format_date("not-a-real-date"), PLACEHOLDER_DATE);
        assert_eq!(format_date(""), PLACEHOLDER_DATE);
    }
}
