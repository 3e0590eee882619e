use crate::config::config::LlmCfg;
use crate::core::types::SentimentProfile;
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    cfg: LlmCfg,
    // RateLimiter is shared state, so it lives behind an Arc (LlmClient derives Clone).
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

/// Prompt and raw completion of one classification call, kept for tracing.
#[derive(Debug, Clone)]
pub struct LlmExchange {
    pub prompt: String,
    pub completion: String,
}

pub fn build_prompt(company: &str, stock_code: &str, news: &str) -> String {
    format!(
        "You are a financial analyst. Analyze the following recent news about {} (stock code: {}) and provide a structured sentiment profile of its market outlook.

        News:
        {}

        - Classify the sentiment as Positive, Negative, or Neutral.
        - Summarize the news and explain the reasoning behind your classification.
        - Extract named entities (people, places, other companies).
        - Identify related industries and market implications.
        - Provide a confidence score for your sentiment analysis (between 0 and 1).

        Output strictly valid JSON with fields:
        - 'sentiment' (Positive, Negative, or Neutral),
        - 'reasoning' (A concise explanation of the classification),
        - 'confidence' (0.0 to 1.0),
        - 'newsdesc' (Summary of the news),
        - 'people_names' (List of people mentioned),
        - 'places_names' (List of places mentioned),
        - 'other_companies_referred' (List of other companies mentioned),
        - 'related_industries' (List of related industries),
        - 'market_implications' (Market implications of the news).",
        company, stock_code, news
    )
}

/// Parse the model's completion (handle potential markdown code blocks).
pub fn parse_profile(content: &str) -> Result<SentimentProfile> {
    let clean_content = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```");

    serde_json::from_str(clean_content)
        .context(format!("Failed to parse LLM JSON: {}", clean_content))
}

impl LlmClient {
    pub fn new(cfg: LlmCfg) -> Self {
        let rpm = NonZeroU32::new(cfg.rate_limit_rpm).unwrap_or(NonZeroU32::new(1).unwrap());
        let quota = Quota::per_minute(rpm);
        let limiter = Arc::new(RateLimiter::direct(quota));

        let openai_config = OpenAIConfig::new()
            .with_api_key(&cfg.api_key)
            .with_api_base(&cfg.base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            cfg,
            limiter,
        }
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    pub async fn analyze(
        &self,
        company: &str,
        stock_code: &str,
        news: &str,
    ) -> Result<(SentimentProfile, LlmExchange)> {
        // Enforce Rate Limit
        self.limiter.until_ready().await;

        let prompt = build_prompt(company, stock_code, news);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.cfg.model)
            .temperature(self.cfg.temperature)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content("You are a helpful assistant that outputs JSON.")
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt.clone())
                    .build()?
                    .into(),
            ])
            .build()?;

        info!(
            "Calling LLM at {} with model {}",
            self.cfg.base_url, self.cfg.model
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("LLM request failed")?;

        let choice = response
            .choices
            .first()
            .context("No choices in LLM response")?;
        let content_str = choice
            .message
            .content
            .as_ref()
            .context("No content in LLM response")?;

        let profile = parse_profile(content_str)?;

        Ok((
            profile,
            LlmExchange {
                prompt,
                completion: content_str.clone(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_COMPLETION: &str = r#"{
        "sentiment": "Positive",
        "reasoning": "Revenue beat and raised guidance outweigh supply concerns.",
        "confidence": 0.82,
        "newsdesc": "Quarterly results above estimates with raised full-year guidance.",
        "people_names": ["Tim Cook"],
        "places_names": ["Cupertino"],
        "other_companies_referred": ["TSMC"],
        "related_industries": ["Consumer Electronics", "Semiconductors"],
        "market_implications": "Positive pressure on the stock near term."
    }"#;

    #[test]
    fn test_parse_profile_plain_json() {
        let profile = parse_profile(SAMPLE_COMPLETION).unwrap();
        assert_eq!(profile.sentiment, "Positive");
        assert_eq!(profile.confidence, 0.82);
        assert_eq!(profile.people_names, vec!["Tim Cook"]);
    }

    #[test]
    fn test_parse_profile_strips_markdown_fences() {
        let fenced = format!("```json\n{}\n```", SAMPLE_COMPLETION);
        let profile = parse_profile(&fenced).unwrap();
        assert_eq!(profile.sentiment, "Positive");

        let bare_fence = format!("```\n{}\n```", SAMPLE_COMPLETION);
        assert!(parse_profile(&bare_fence).is_ok());
    }

    #[test]
    fn test_parse_profile_tolerates_missing_entity_lists() {
        let minimal = r#"{"sentiment": "neutral", "reasoning": "Mixed signals.", "confidence": 0.4}"#;
        let profile = parse_profile(minimal).unwrap();
        assert!(profile.people_names.is_empty());
        assert!(profile.market_implications.is_empty());
    }

    #[test]
    fn test_parse_profile_rejects_prose() {
        let err = parse_profile("The sentiment is positive overall.").unwrap_err();
        assert!(err.to_string().contains("Failed to parse LLM JSON"));
    }

    #[test]
    fn test_prompt_carries_inputs() {
        let prompt = build_prompt("Apple Inc", "AAPL", "Apple beats estimates");
        assert!(prompt.contains("Apple Inc"));
        assert!(prompt.contains("stock code: AAPL"));
        assert!(prompt.contains("Apple beats estimates"));
        assert!(prompt.contains("'sentiment'"));
        assert!(prompt.contains("'confidence'"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_real_llm_call() -> Result<()> {
        use crate::config::config::AppCfg;

        let mut cfg = AppCfg::load("config.yml").expect("Failed to load config");
        cfg.llm.api_key = "api-key here".to_string();
        let client = LlmClient::new(cfg.llm.clone());
        println!("Testing with model: {}", client.model());

        // Test Case: Clear Positive
        let news = "Apple posts record quarterly revenue, beating analyst estimates by a wide margin.";

        let (profile, _exchange) = client.analyze("Apple Inc", "AAPL", news).await?;

        println!("Response: {:?}", profile);

        assert_eq!(profile.sentiment.to_ascii_lowercase(), "positive");
        assert!(profile.confidence > 0.5);

        Ok(())
    }
}
