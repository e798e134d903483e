use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSource {
    pub url: String,
    pub label: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        FeedSource {
            url: url.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub sources: Vec<FeedSource>,
    pub max_items: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        FeedsConfig {
            sources: vec![
                FeedSource::new(
                    "https://www.thehappychickencoop.com/blog/feed/",
                    "The Happy Chicken Coop",
                ),
                FeedSource::new(
                    "https://www.stdavids-poultryteam.co.uk/news/feed/",
                    "St David's Poultry Team",
                ),
                FeedSource::new(
                    "https://www.fresheggsdaily.blog/feeds/posts/default?alt=rss",
                    "Fresh Eggs Daily",
                ),
                FeedSource::new(
                    "https://www.mypetchicken.com/blogs/our-blog.atom",
                    "My Pet Chicken",
                ),
            ],
            max_items: 10,
        }
    }
}
