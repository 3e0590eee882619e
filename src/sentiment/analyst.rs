use crate::core::types::{NewsItem, Sentiment, SentimentProfile, SentimentReport};
use crate::llm::client::LlmClient;
use crate::news::client::NewsClient;
use crate::tickers;
use crate::trace::client::{RunTrace, TraceClient, new_trace_id};
use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Newline-joined headline digest fed to the model.
pub fn digest_news(batch: &[NewsItem]) -> String {
    batch
        .iter()
        .map(|n| n.title.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the output artifact from the model's profile. The company string
/// is echoed back verbatim.
pub fn build_report(
    company: &str,
    stock_code: &str,
    batch: &[NewsItem],
    profile: &SentimentProfile,
) -> Result<SentimentReport> {
    let label = Sentiment::from_str(&profile.sentiment)?;

    Ok(SentimentReport {
        company: company.to_string(),
        stock_code: stock_code.to_string(),
        label,
        rationale: profile.reasoning.clone(),
        confidence: profile.confidence,
        newsdesc: profile.newsdesc.clone(),
        people_names: profile.people_names.clone(),
        places_names: profile.places_names.clone(),
        other_companies_referred: profile.other_companies_referred.clone(),
        related_industries: profile.related_industries.clone(),
        market_implications: profile.market_implications.clone(),
        headlines: batch.iter().map(|n| n.title.clone()).collect(),
    })
}

pub struct SentimentAnalyst {
    news: Arc<dyn NewsClient>,
    llm: LlmClient,
    tracer: TraceClient,
    news_count: u32,
}

impl SentimentAnalyst {
    pub fn new(
        news: Arc<dyn NewsClient>,
        llm: LlmClient,
        tracer: TraceClient,
        news_count: u32,
    ) -> Self {
        Self {
            news,
            llm,
            tracer,
            news_count,
        }
    }

    /// Run the full pipeline for one company: resolve ticker, fetch news,
    /// classify, assemble the report, record the trace.
    pub async fn analyze(
        &self,
        company: &str,
        ticker_override: Option<&str>,
    ) -> Result<SentimentReport> {
        anyhow::ensure!(!company.trim().is_empty(), "company must not be empty");

        let resolved = ticker_override
            .map(str::to_string)
            .or_else(|| tickers::resolve(company));
        // "Unknown" when the name resolves nowhere; the raw string still
        // works as a free-text search query.
        let stock_code = resolved.clone().unwrap_or_else(|| "Unknown".to_string());
        let query = resolved.unwrap_or_else(|| company.to_string());

        info!("Fetching news for {} (query: {})", company, query);
        let batch = self
            .news
            .fetch_news(&query, self.news_count)
            .await
            .context("fetching news")?;
        anyhow::ensure!(!batch.is_empty(), "no news found for '{}'", query);
        info!("Fetched {} headlines", batch.len());

        let digest = digest_news(&batch);
        let (profile, exchange) = self.llm.analyze(company, &stock_code, &digest).await?;
        info!("LLM profile for {}: {:?}", company, profile.sentiment);

        let report = build_report(company, &stock_code, &batch, &profile)?;

        let run = RunTrace {
            trace_id: new_trace_id(),
            company: report.company.clone(),
            stock_code: report.stock_code.clone(),
            query,
            headlines: report.headlines.clone(),
            model: self.llm.model().to_string(),
            prompt: exchange.prompt,
            completion: exchange.completion,
            label: report.label.to_string(),
            confidence: report.confidence,
        };
        if let Err(e) = self.tracer.record_run(&run).await {
            warn!(?e, "failed to record run trace");
        }

        Ok(report)
    }
}
