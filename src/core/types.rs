use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ----------- Domain messages -----------------
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published: Option<chrono::DateTime<chrono::Utc>>,
}

/// Sentiment of the news toward the company's market outlook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    // Models answer "Positive"/"positive"/"POSITIVE" depending on the day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(anyhow!("unrecognized sentiment label: '{}'", other)),
        }
    }
}

/// Structured profile the model is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentProfile {
    pub sentiment: String, // "Positive", "Negative", "Neutral"
    pub reasoning: String,
    pub confidence: f64, // 0.0 to 1.0
    #[serde(default)]
    pub newsdesc: String,
    #[serde(default)]
    pub people_names: Vec<String>,
    #[serde(default)]
    pub places_names: Vec<String>,
    #[serde(default)]
    pub other_companies_referred: Vec<String>,
    #[serde(default)]
    pub related_industries: Vec<String>,
    #[serde(default)]
    pub market_implications: String,
}

/// The sole output artifact of a run, printed as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub company: String,
    pub stock_code: String,
    pub label: Sentiment,
    pub rationale: String,
    pub confidence: f64,
    pub newsdesc: String,
    pub people_names: Vec<String>,
    pub places_names: Vec<String>,
    pub other_companies_referred: Vec<String>,
    pub related_industries: Vec<String>,
    pub market_implications: String,
    pub headlines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_parses_any_casing() {
        assert_eq!(Sentiment::from_str("Positive").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_str("NEUTRAL").unwrap(), Sentiment::Neutral);
        assert_eq!(Sentiment::from_str(" negative ").unwrap(), Sentiment::Negative);
        assert!(Sentiment::from_str("bullish").is_err());
    }

    #[test]
    fn test_sentiment_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Positive).unwrap(),
            "\"positive\""
        );
        assert_eq!(Sentiment::Negative.to_string(), "negative");
    }
}
