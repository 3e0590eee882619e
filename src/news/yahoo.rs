use crate::config::config::NewsCfg;
use crate::core::types::NewsItem;
use crate::news::client::NewsClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooNewsEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    publisher: String,
    #[serde(default)]
    link: String,
    // Epoch seconds
    #[serde(default)]
    provider_publish_time: Option<i64>,
}

fn collect_items(resp: YahooSearchResponse, limit: u32) -> Vec<NewsItem> {
    let mut out = Vec::new();

    for entry in resp.news {
        let title = entry.title.trim();
        if title.is_empty() {
            continue; // skip broken entries
        }

        out.push(NewsItem {
            title: title.to_string(),
            publisher: entry.publisher.trim().to_string(),
            url: entry.link,
            published: entry
                .provider_publish_time
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        });

        if out.len() as u32 >= limit {
            break;
        }
    }

    out
}

pub struct YahooNewsClient {
    client: Client,
    cfg: NewsCfg,
}

impl YahooNewsClient {
    pub fn new(cfg: NewsCfg, client: Client) -> Self {
        Self { client, cfg }
    }
}

#[async_trait]
impl NewsClient for YahooNewsClient {
    async fn fetch_news(&self, query: &str, limit: u32) -> Result<Vec<NewsItem>> {
        let count = limit.to_string();
        let resp = self
            .client
            .get(&self.cfg.search_url)
            .query(&[("q", query), ("esCount", "1"), ("newsCount", &count)])
            .send()
            .await
            .context("requesting news search")?;

        if !resp.status().is_success() {
            anyhow::bail!("news search error: {}", resp.status());
        }

        let search: YahooSearchResponse =
            resp.json().await.context("parsing news search response")?;

        Ok(collect_items(search, limit))
    }
}
