use crate::config::config::TraceCfg;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

/// Everything worth recording about one pipeline run.
#[derive(Debug, Clone)]
pub struct RunTrace {
    pub trace_id: String,
    pub company: String,
    pub stock_code: String,
    pub query: String,
    pub headlines: Vec<String>,
    pub model: String,
    pub prompt: String,
    pub completion: String,
    pub label: String,
    pub confidence: f64,
}

pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Serialize)]
struct IngestionEvent {
    id: String,
    timestamp: String,
    #[serde(rename = "type")]
    kind: String,
    body: Value,
}

#[derive(Debug, Serialize)]
struct IngestionBatch {
    batch: Vec<IngestionEvent>,
}

fn event(kind: &str, body: Value) -> IngestionEvent {
    IngestionEvent {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        kind: kind.to_string(),
        body,
    }
}

fn build_batch(run: &RunTrace, release: &str) -> IngestionBatch {
    let now = Utc::now().to_rfc3339();

    let trace = event(
        "trace-create",
        json!({
            "id": run.trace_id,
            "timestamp": now,
            "name": "market-sentiment",
            "release": release,
            "input": { "company": run.company, "stockCode": run.stock_code },
            "output": { "sentiment": run.label, "confidence": run.confidence },
        }),
    );

    let fetch_span = event(
        "span-create",
        json!({
            "id": Uuid::new_v4().to_string(),
            "traceId": run.trace_id,
            "name": "fetch-news",
            "input": { "query": run.query },
            "output": { "count": run.headlines.len(), "headlines": run.headlines },
        }),
    );

    let generation = event(
        "generation-create",
        json!({
            "id": Uuid::new_v4().to_string(),
            "traceId": run.trace_id,
            "name": "classify-sentiment",
            "model": run.model,
            "input": run.prompt,
            "output": run.completion,
        }),
    );

    IngestionBatch {
        batch: vec![trace, fetch_span, generation],
    }
}

/// Write-only client for a Langfuse-compatible ingestion endpoint.
pub struct TraceClient {
    client: Client,
    cfg: TraceCfg,
}

impl TraceClient {
    pub fn new(cfg: TraceCfg, client: Client) -> Self {
        Self { client, cfg }
    }

    pub fn enabled(&self) -> bool {
        self.cfg.enabled && !self.cfg.public_key.is_empty() && !self.cfg.secret_key.is_empty()
    }

    /// Ship the run to the observability service. Callers treat failures as
    /// non-fatal: tracing never affects pipeline results.
    pub async fn record_run(&self, run: &RunTrace) -> Result<()> {
        if !self.enabled() {
            debug!("trace client disabled or unconfigured, skipping ingestion");
            return Ok(());
        }

        let batch = build_batch(run, &self.cfg.release);
        let url = format!("{}/api/public/ingestion", self.cfg.host);

        let res = self
            .client
            .post(&url)
            .basic_auth(&self.cfg.public_key, Some(&self.cfg.secret_key))
            .json(&batch)
            .send()
            .await
            .context("trace ingestion request failed")?;

        // Langfuse answers 207 on partial success, still a 2xx
        if !res.status().is_success() {
            let status = res.status();
            let err_text = res.text().await.unwrap_or_default();
            anyhow::bail!("trace ingestion error {}: {}", status, err_text);
        }

        debug!("recorded run trace {}", run.trace_id);
        Ok(())
    }
}
