use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub news: NewsCfg,
    #[serde(default)]
    pub llm: LlmCfg,
    #[serde(default)]
    pub trace: TraceCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(rename = "userAgent", default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(rename = "poolIdleTimeout", with = "humantime_serde", default = "default_pool_idle")]
    pub pool_idle_timeout: Duration,
    #[serde(rename = "tcpKeepAlive", with = "humantime_serde", default = "default_keep_alive")]
    pub tcp_keep_alive: Duration,
    #[serde(rename = "poolMaxIdlePerHost", default = "default_pool")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle(),
            tcp_keep_alive: default_keep_alive(),
            pool_max_idle_per_host: default_pool(),
        }
    }
}
fn default_ua() -> String {
    "marketmind/0.1".into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_pool_idle() -> Duration {
    Duration::from_secs(90)
}
fn default_keep_alive() -> Duration {
    Duration::from_secs(60)
}
fn default_pool() -> usize {
    16
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsCfg {
    #[serde(rename = "searchUrl", default = "default_search_url")]
    pub search_url: String,
    #[serde(rename = "newsCount", default = "default_news_count")]
    pub news_count: u32,
}

impl Default for NewsCfg {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            news_count: default_news_count(),
        }
    }
}
fn default_search_url() -> String {
    "https://query1.finance.yahoo.com/v1/finance/search".to_string()
}
fn default_news_count() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmCfg {
    #[serde(rename = "baseUrl", default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(rename = "rateLimitRpm", default = "default_rpm")]
    pub rate_limit_rpm: u32,
    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmCfg {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: "".to_string(),
            model: default_model(),
            rate_limit_rpm: default_rpm(),
            temperature: 0.0,
        }
    }
}
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_rpm() -> u32 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceCfg {
    #[serde(default = "default_trace_host")]
    pub host: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub release: String,
}

impl Default for TraceCfg {
    fn default() -> Self {
        Self {
            host: default_trace_host(),
            public_key: "".to_string(),
            secret_key: "".to_string(),
            enabled: default_enabled(),
            release: "".to_string(),
        }
    }
}
fn default_trace_host() -> String {
    "https://cloud.langfuse.com".to_string()
}
fn default_enabled() -> bool {
    true
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            // Missing file is fine, every section has defaults and secrets
            // arrive via the environment.
            .add_source(File::with_name(path).required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.news.search_url.is_empty(), "news.searchUrl missing");
        anyhow::ensure!(self.news.news_count > 0, "news.newsCount must be > 0");
        anyhow::ensure!(!self.llm.base_url.is_empty(), "llm.baseUrl missing");
        anyhow::ensure!(!self.llm.model.is_empty(), "llm.model missing");
        anyhow::ensure!(self.llm.rate_limit_rpm > 0, "llm.rateLimitRpm must be > 0");
        anyhow::ensure!(!self.trace.host.is_empty(), "trace.host missing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_env_var_override() {
        // Set environment variable
        unsafe {
            env::set_var("LLM__API_KEY", "env-key-123");
        }

        // Test that config::Environment picks it up
        let cfg = Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()
            .unwrap();

        let val = cfg.get_string("llm.api_key").unwrap();
        assert_eq!(val, "env-key-123");

        unsafe {
            env::remove_var("LLM__API_KEY");
        }
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = AppCfg::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.news.news_count, 5);
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_validate_rejects_zero_news_count() {
        let mut cfg = AppCfg::default();
        cfg.news.news_count = 0;
        assert!(cfg.validate().is_err());
    }
}
