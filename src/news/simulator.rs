use crate::core::types::NewsItem;
use crate::news::client::NewsClient;
use anyhow::Result;
use async_trait::async_trait;

/// Canned-batch news source for tests and offline runs.
pub struct SimNewsClient {
    items: Vec<NewsItem>,
}

impl SimNewsClient {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    pub fn from_titles(titles: &[&str]) -> Self {
        let items = titles
            .iter()
            .map(|t| NewsItem {
                title: t.to_string(),
                publisher: "Simulated Wire".to_string(),
                url: "https://example.com/news".to_string(),
                published: None,
            })
            .collect();
        Self { items }
    }
}

#[async_trait]
impl NewsClient for SimNewsClient {
    async fn fetch_news(&self, _query: &str, limit: u32) -> Result<Vec<NewsItem>> {
        Ok(self.items.iter().take(limit as usize).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_and_passthrough() {
        let sim = SimNewsClient::from_titles(&["a", "b", "c"]);
        let items = sim.fetch_news("ignored", 2).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "a");
        assert_eq!(items[0].publisher, "Simulated Wire");
    }
}
