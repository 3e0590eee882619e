mod cli;
mod config;
mod core;
mod llm;
mod news;
mod sentiment;
mod tickers;
mod trace;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use crate::config::config::AppCfg;
use llm::client::LlmClient;
use news::yahoo::YahooNewsClient;
use reqwest::Client;
use sentiment::analyst::SentimentAnalyst;
use std::sync::Arc;
use trace::client::TraceClient;
use tracing::{info, info_span};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let args = Cli::parse();
    let cfg = AppCfg::load(&args.config)?;

    // Root span for the run
    let span = info_span!(
        "Pipeline",
        pid = %std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
    );
    let _enter = span.enter();

    info!("Starting up");

    info!("Initializing Client");
    let client = Client::builder()
        .user_agent(cfg.http.user_agent.clone())
        .pool_idle_timeout(cfg.http.pool_idle_timeout)
        .pool_max_idle_per_host(cfg.http.pool_max_idle_per_host)
        .tcp_keepalive(cfg.http.tcp_keep_alive)
        .timeout(cfg.http.timeout)
        .build()
        .expect("client");

    info!("Building pipeline");
    let news = Arc::new(YahooNewsClient::new(cfg.news.clone(), client.clone()));
    let llm_client = LlmClient::new(cfg.llm.clone());
    let tracer = TraceClient::new(cfg.trace.clone(), client.clone());
    let analyst = SentimentAnalyst::new(news, llm_client, tracer, cfg.news.news_count);

    let report = analyst
        .analyze(&args.company, args.ticker.as_deref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
