use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use crate::error::{Error, Result};

/// Fields pulled from one `<item>` or `<entry>` before normalization.
///
/// Which fields are populated depends on the feed dialect; the extractor
/// strategies decide how they map onto a `FeedItem`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// `pubDate` (RSS) or `published` (Atom)
    pub published: Option<String>,
    /// `dc:date` (RSS/RDF) or `updated` (Atom)
    pub updated: Option<String>,
    /// RSS `description`
    pub description: Option<String>,
    /// RSS `content:encoded`
    pub content_encoded: Option<String>,
    /// Atom `content`
    pub content: Option<String>,
    pub summary: Option<String>,
    pub media_content: Option<String>,
    pub media_thumbnail: Option<String>,
    pub enclosures: Vec<Enclosure>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime: Option<String>,
}

impl Enclosure {
    pub fn is_image(&self) -> bool {
        self.mime
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().starts_with("image/"))
    }
}

/// Parse an RSS 2.0, RSS 1.0 (RDF) or Atom document into raw entries.
///
/// Fails when the XML is malformed or the document has no feed root.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawFeedEntry>> {
    // Text nodes stay untrimmed so inline XHTML keeps its word boundaries;
    // each captured field is trimmed as a whole.
    let mut reader = Reader::from_reader(xml);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut saw_root = false;

    let mut current: Option<EntryBuilder> = None;
    // element depth below the current entry element
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if let Some(builder) = current.as_mut() {
                    depth += 1;
                    builder.open(&e, depth);
                } else if is_root(&e) {
                    saw_root = true;
                } else if saw_root && is_entry(&e) {
                    current = Some(EntryBuilder::default());
                    depth = 0;
                }
            }
            Event::Empty(e) => {
                if let Some(builder) = current.as_mut() {
                    builder.empty(&e, depth + 1);
                } else if is_root(&e) {
                    saw_root = true;
                }
            }
            Event::End(_) => {
                if current.is_some() {
                    if depth == 0 {
                        if let Some(builder) = current.take() {
                            entries.push(builder.build());
                        }
                    } else {
                        if let Some(builder) = current.as_mut() {
                            builder.close(depth);
                        }
                        depth -= 1;
                    }
                }
            }
            Event::Text(e) => {
                if let Some(builder) = current.as_mut() {
                    builder.push_text(&decode_text(&e));
                }
            }
            Event::CData(e) => {
                if let Some(builder) = current.as_mut() {
                    builder.push_text(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::FeedParse(
            "document has no <rss>, <feed> or <rdf:RDF> root".to_string(),
        ));
    }

    Ok(entries)
}

fn is_root(e: &BytesStart) -> bool {
    matches!(e.local_name().as_ref(), b"rss" | b"feed" | b"RDF")
}

fn is_entry(e: &BytesStart) -> bool {
    matches!(e.local_name().as_ref(), b"item" | b"entry")
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
}

// Feeds routinely carry HTML entities (&nbsp;, &rsquo;) that are not valid
// XML; keep the raw text and let the snippet pass decode them.
fn decode_text(e: &BytesText) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

#[derive(Default)]
struct EntryBuilder {
    entry: RawFeedEntry,
    field: Option<String>,
    text: String,
    alternate_link: Option<String>,
    other_link: Option<String>,
}

impl EntryBuilder {
    fn open(&mut self, e: &BytesStart, depth: usize) {
        self.capture_attributes(e, depth);
        if depth == 1 {
            self.field = Some(element_name(e));
            self.text.clear();
        } else {
            self.nested_markup(e);
        }
    }

    fn empty(&mut self, e: &BytesStart, depth: usize) {
        self.capture_attributes(e, depth);
        if depth > 1 {
            self.nested_markup(e);
        }
    }

    fn close(&mut self, depth: usize) {
        if depth != 1 {
            return;
        }
        if let Some(field) = self.field.take() {
            let text = std::mem::take(&mut self.text);
            self.assign(&field, text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    /// Inline XHTML content arrives as child elements; keep images visible to
    /// the `<img>` scan.
    fn nested_markup(&mut self, e: &BytesStart) {
        if self.field.is_some() && e.local_name().as_ref() == b"img" {
            if let Some(src) = attr(e, b"src") {
                self.text.push_str(&format!("<img src=\"{}\">", src));
            }
        }
    }

    fn capture_attributes(&mut self, e: &BytesStart, depth: usize) {
        match e.name().as_ref() {
            b"media:content" => {
                let medium = attr(e, b"medium");
                if medium.is_none() || medium.as_deref() == Some("image") {
                    set_once(&mut self.entry.media_content, attr(e, b"url"));
                }
            }
            b"media:thumbnail" => set_once(&mut self.entry.media_thumbnail, attr(e, b"url")),
            b"enclosure" => {
                if let Some(url) = attr(e, b"url") {
                    self.entry.enclosures.push(Enclosure {
                        url,
                        mime: attr(e, b"type"),
                    });
                }
            }
            b"link" if depth == 1 => {
                if let Some(href) = attr(e, b"href") {
                    match attr(e, b"rel").as_deref() {
                        None | Some("alternate") => set_once(&mut self.alternate_link, Some(href)),
                        Some(_) => set_once(&mut self.other_link, Some(href)),
                    }
                }
            }
            _ => {}
        }
    }

    fn assign(&mut self, field: &str, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let slot = match field {
            "title" => &mut self.entry.title,
            "link" => &mut self.entry.link,
            "pubDate" | "published" => &mut self.entry.published,
            "dc:date" | "updated" => &mut self.entry.updated,
            "description" => &mut self.entry.description,
            "content:encoded" => &mut self.entry.content_encoded,
            "content" => &mut self.entry.content,
            "summary" | "itunes:summary" => &mut self.entry.summary,
            _ => return,
        };
        set_once(slot, Some(text));
    }

    fn build(mut self) -> RawFeedEntry {
        if self.entry.link.is_none() {
            self.entry.link = self.alternate_link.or(self.other_link);
        }
        self.entry
    }
}

fn set_once(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}
