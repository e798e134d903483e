use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use crate::feeds::parser::RawFeedEntry;
use crate::types::feed_item::{FeedItem, NO_LINK, UNTITLED};

/// One way of deriving a field from a raw entry. `None` means "try the next".
pub type Strategy<T> = fn(&RawFeedEntry) -> Option<T>;

/// Image sources, highest priority first. Structured media references beat
/// anything scraped out of markup.
pub const IMAGE_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("media:content", media_content),
    ("media:thumbnail", media_thumbnail),
    ("image enclosure", image_enclosure),
    ("content:encoded <img>", encoded_content_img),
    ("atom content <img>", atom_content_img),
];

/// Descriptions are always plain text; raw HTML bodies are never passed through.
pub const DESCRIPTION_STRATEGIES: &[(&str, Strategy<String>)] = &[
    ("description", description_text),
    ("atom content", content_text),
    ("summary", summary_text),
];

/// Publish date first, then the alternate normalized date. An unparseable
/// value falls through to the next strategy.
pub const DATE_STRATEGIES: &[(&str, Strategy<DateTime<Utc>>)] = &[
    ("published", published_date),
    ("updated", updated_date),
];

lazy_static! {
    static ref IMG_SRC: Regex =
        Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*["']([^"'>]+)["']"#).expect("valid img regex");
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("valid tag regex");
    static ref ENTITY: Regex =
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("valid entity regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Run `strategies` in order and return the first hit.
pub fn first_match<T>(strategies: &[(&str, Strategy<T>)], entry: &RawFeedEntry) -> Option<T> {
    strategies.iter().find_map(|(_, strategy)| strategy(entry))
}

/// Normalize a raw entry. `fetched_at` stands in for entries with no usable date.
pub fn normalize_entry(entry: &RawFeedEntry, source: &str, fetched_at: DateTime<Utc>) -> FeedItem {
    FeedItem {
        title: non_empty(entry.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| UNTITLED.to_string()),
        link: non_empty(entry.link.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| NO_LINK.to_string()),
        date: first_match(DATE_STRATEGIES, entry).unwrap_or(fetched_at),
        description: first_match(DESCRIPTION_STRATEGIES, entry).unwrap_or_default(),
        image: first_match(IMAGE_STRATEGIES, entry),
        source: source.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn media_content(entry: &RawFeedEntry) -> Option<String> {
    non_empty(entry.media_content.as_deref()).map(str::to_string)
}

fn media_thumbnail(entry: &RawFeedEntry) -> Option<String> {
    non_empty(entry.media_thumbnail.as_deref()).map(str::to_string)
}

fn image_enclosure(entry: &RawFeedEntry) -> Option<String> {
    entry
        .enclosures
        .iter()
        .find(|e| e.is_image())
        .map(|e| e.url.clone())
}

fn encoded_content_img(entry: &RawFeedEntry) -> Option<String> {
    entry.content_encoded.as_deref().and_then(first_img_src)
}

fn atom_content_img(entry: &RawFeedEntry) -> Option<String> {
    entry.content.as_deref().and_then(first_img_src)
}

fn description_text(entry: &RawFeedEntry) -> Option<String> {
    plain_text(entry.description.as_deref())
}

fn content_text(entry: &RawFeedEntry) -> Option<String> {
    plain_text(entry.content.as_deref())
}

fn summary_text(entry: &RawFeedEntry) -> Option<String> {
    plain_text(entry.summary.as_deref())
}

fn plain_text(html: Option<&str>) -> Option<String> {
    html.map(html_to_text).filter(|s| !s.is_empty())
}

fn published_date(entry: &RawFeedEntry) -> Option<DateTime<Utc>> {
    entry.published.as_deref().and_then(parse_feed_date)
}

fn updated_date(entry: &RawFeedEntry) -> Option<DateTime<Utc>> {
    entry.updated.as_deref().and_then(parse_feed_date)
}

/// `src` of the first `<img>` tag in an HTML fragment.
pub fn first_img_src(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|src| !src.is_empty())
}

/// Strip tags, decode entities and collapse whitespace.
pub fn html_to_text(html: &str) -> String {
    let without_tags = TAG.replace_all(html, " ");
    let decoded = ENTITY.replace_all(&without_tags, |caps: &Captures| decode_entity(&caps[1], &caps[0]));
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entity(name: &str, raw: &str) -> String {
    let numeric = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    if let Some(code) = numeric {
        return char::from_u32(code).map(String::from).unwrap_or_else(|| raw.to_string());
    }

    let named = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "hellip" => "\u{2026}",
        "copy" => "\u{00A9}",
        _ => return raw.to_string(),
    };
    named.to_string()
}

/// Accepts RFC 2822 (RSS), RFC 3339 (Atom, dc:date) and a couple of common
/// sloppy variants. Zone-less values are read as UTC.
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
