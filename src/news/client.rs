use crate::core::types::NewsItem;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait NewsClient: Send + Sync + 'static {
    async fn fetch_news(&self, query: &str, limit: u32) -> Result<Vec<NewsItem>>;
}
