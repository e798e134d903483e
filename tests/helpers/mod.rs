// Shared fixtures for integration tests: `mod helpers;` then `use helpers::*;`
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use feedhub::config::{AppConfig, FeedSource};
use feedhub::connectors::UpstreamClient;
use feedhub::{Error, Result};

pub const SERIES_URL: &str = "https://series.test/observations";
pub const TEST_API_KEY: &str = "test-key";

/// Canned behavior for one URL.
#[derive(Clone, Debug)]
pub enum Reply {
    Body(String),
    Status(u16),
    Transport(&'static str),
    Panic,
    Delayed(Duration, Box<Reply>),
}

#[derive(Clone, Debug)]
pub struct Recorded {
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// In-memory upstream keyed by URL. Unknown URLs fail with a transport error.
#[derive(Default)]
pub struct FakeUpstream {
    routes: HashMap<String, Reply>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, reply: Reply) -> Self {
        self.routes.insert(url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(Recorded {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let mut reply = self.routes.get(url).cloned();
        loop {
            return match reply {
                Some(Reply::Body(body)) => Ok(body.into_bytes()),
                Some(Reply::Status(status)) => Err(Error::UpstreamStatus {
                    url: url.to_string(),
                    status,
                }),
                Some(Reply::Transport(msg)) => Err(Error::Transport(msg.to_string())),
                Some(Reply::Panic) => panic!("fake upstream asked to panic for {url}"),
                Some(Reply::Delayed(delay, inner)) => {
                    tokio::time::sleep(delay).await;
                    reply = Some(*inner);
                    continue;
                }
                None => Err(Error::Transport(format!("no route for {url}"))),
            };
        }
    }
}

/// Config pointing at the fake series URL with the given feed registry.
pub fn test_config(api_key: Option<&str>, sources: Vec<FeedSource>) -> AppConfig {
    let mut config = AppConfig::default();
    config.series.base_url = SERIES_URL.to_string();
    config.series.api_key = api_key.map(str::to_string);
    config.feeds.sources = sources;
    config
}

pub fn source(n: usize) -> FeedSource {
    FeedSource::new(format!("https://feed{n}.test/rss"), format!("Source {n}"))
}

pub fn observations_json(rows: &[(&str, &str)]) -> String {
    let observations: Vec<_> = rows
        .iter()
        .map(|(date, value)| {
            serde_json::json!({
                "realtime_start": "2024-01-01",
                "realtime_end": "2024-01-01",
                "date": date,
                "value": value,
            })
        })
        .collect();
    serde_json::json!({
        "units": "lin",
        "count": rows.len(),
        "observations": observations,
    })
    .to_string()
}

/// RSS 2.0 document; each item is (title, RFC 2822 date or None).
pub fn rss_feed(items: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel><title>Feed</title>"#,
    );
    for (title, date) in items {
        xml.push_str("<item>");
        xml.push_str(&format!("<title>{title}</title>"));
        xml.push_str(&format!("<link>https://example.test/{}</link>", title.replace(' ', "-")));
        if let Some(date) = date {
            xml.push_str(&format!("<pubDate>{date}</pubDate>"));
        }
        xml.push_str(&format!("<description>About {title}</description>"));
        xml.push_str("</item>");
    }
    xml.push_str("</channel></rss>");
    xml
}

/// Atom document; each entry is (title, RFC 3339 published).
pub fn atom_feed(entries: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?><feed xmlns="http://www.w3.org/2005/Atom"><title>Atom</title>"#,
    );
    for (title, published) in entries {
        xml.push_str(&format!(
            r#"<entry><title>{title}</title><link rel="alternate" href="https://atom.test/{slug}"/><published>{published}</published><summary>Summary of {title}</summary></entry>"#,
            slug = title.replace(' ', "-"),
        ));
    }
    xml.push_str("</feed>");
    xml
}
