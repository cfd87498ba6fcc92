use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<item\b[^>]*>([\s\S]*?)</item>").expect("item pattern is valid"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").expect("title pattern is valid"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link>(.*?)</link>").expect("link pattern is valid"));
static PUB_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pubDate>(.*?)</pubDate>").expect("pubDate pattern is valid"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<description>([\s\S]*?)</description>").expect("description pattern is valid")
});

/// Raw fields of one `<item>` block, before any HTML scraping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub word: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
}

impl FeedItem {
    /// Extracts the item fields independently; a missing tag yields `""`.
    pub fn extract(item: &str) -> Self {
        Self {
            word: first_capture(&TITLE_RE, item),
            link: first_capture(&LINK_RE, item),
            pub_date: first_capture(&PUB_DATE_RE, item),
            description: first_capture(&DESCRIPTION_RE, item),
        }
    }
}

/// Yields the body of every `<item>…</item>` pair in document order.
///
/// Matching is non-greedy and spans newlines. No well-formedness checks are
/// made; an unterminated item simply ends the sequence.
pub fn items(document: &str) -> impl Iterator<Item = &str> {
    ITEM_RE
        .captures_iter(document)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

fn first_capture(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Renders a feed `pubDate` as a pt-PT short date (`dd/mm/yyyy`, UTC).
///
/// Accepts RFC 2822 (what the feed emits), RFC 3339 and a bare `05 May 2025`.
/// Returns an empty string when nothing parses.
pub fn display_date(pub_date: &str) -> String {
    let raw = pub_date.trim();
    if raw.is_empty() {
        return String::new();
    }

    let parsed = DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d %b %Y"));

    match parsed {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(e) => {
            tracing::debug!(pub_date = %raw, error = %e, "Unparseable pubDate");
            String::new()
        }
    }
}
