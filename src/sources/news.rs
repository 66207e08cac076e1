//! News digest adapter over an RSS feed.
//!
//! The feed is plain RSS 2.0; we only need the first few item titles and
//! links, so extraction is a lightweight scan rather than a full XML parse.

use async_trait::async_trait;

use crate::cache::NewsItem;
use crate::error::FetchError;
use crate::sources::DataSource;

pub struct RssNewsSource {
    client: reqwest::Client,
    url: String,
}

impl RssNewsSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl DataSource for RssNewsSource {
    type Params = usize;
    type Payload = Vec<NewsItem>;

    async fn fetch(&self, limit: usize) -> Result<Vec<NewsItem>, FetchError> {
        let body = self.client.get(&self.url).send().await?.text().await?;
        let items = parse_items(&body, limit);
        if items.is_empty() {
            return Err(FetchError::Payload("no <item> entries in feed".into()));
        }
        Ok(items)
    }
}

fn parse_items(feed: &str, limit: usize) -> Vec<NewsItem> {
    feed.split("<item>")
        .skip(1)
        .take(limit)
        .filter_map(|fragment| {
            let title = extract_tag(fragment, "title")?;
            let link = extract_tag(fragment, "link")?;
            Some(NewsItem { title, link })
        })
        .collect()
}

fn extract_tag(fragment: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = fragment.find(&open)? + open.len();
    let end = fragment[start..].find(&close)? + start;
    let raw = fragment[start..end].trim();
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw);
    Some(raw.trim().to_string())
}
