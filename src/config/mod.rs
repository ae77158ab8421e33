pub mod cli;
pub mod dashboard;
pub mod file;
pub mod sequencer;

use crate::domain::model::CoinSpec;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COINS: &str =
    "bitcoin:BTC-USD:Bitcoin,ethereum:ETH-USD:Ethereum,ripple:XRP-USD:XRP";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "daily-runner")]
#[command(about = "Daily crypto forecasting and sentiment analysis")]
pub struct RunnerConfig {
    /// Base URL of the CoinGecko-compatible market data API
    #[arg(long, default_value = "https://api.coingecko.com")]
    pub market_api_base: String,

    /// Base URL of the NewsAPI-compatible news endpoint
    #[arg(long, default_value = "https://newsapi.org")]
    pub news_api_base: String,

    /// Base URL of the chat-completions endpoint used for sentiment scoring
    #[arg(long, default_value = "https://api.openai.com")]
    pub llm_api_base: String,

    /// News API key; falls back to the NEWS_API_KEY environment variable
    #[arg(long)]
    pub news_api_key: Option<String>,

    /// LLM API key; falls back to the OPENAI_API_KEY environment variable
    #[arg(long)]
    pub llm_api_key: Option<String>,

    #[arg(long, default_value = "gpt-4")]
    pub llm_model: String,

    /// Directory the CSV outputs are written into
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Days of daily history to fetch per coin
    #[arg(long, default_value = "180")]
    pub history_days: u32,

    /// Watchlist as comma-separated id:TICKER:Name entries
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_COINS)]
    pub coins: Vec<CoinSpec>,

    /// Optional TOML configuration file; values set there override flags
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl RunnerConfig {
    /// Fills the API keys from the environment when no flag was given.
    pub fn resolve_env_keys(&mut self) {
        if self.news_api_key.is_none() {
            self.news_api_key = std::env::var("NEWS_API_KEY").ok().filter(|k| !k.is_empty());
        }
        if self.llm_api_key.is_none() {
            self.llm_api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty());
        }
    }
}

impl ConfigProvider for RunnerConfig {
    fn market_api_base(&self) -> &str {
        &self.market_api_base
    }

    fn news_api_base(&self) -> &str {
        &self.news_api_base
    }

    fn llm_api_base(&self) -> &str {
        &self.llm_api_base
    }

    fn news_api_key(&self) -> Option<&str> {
        self.news_api_key.as_deref()
    }

    fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref()
    }

    fn llm_model(&self) -> &str {
        &self.llm_model
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn history_days(&self) -> u32 {
        self.history_days
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("market_api_base", &self.market_api_base)?;
        validate_url("news_api_base", &self.news_api_base)?;
        validate_url("llm_api_base", &self.llm_api_base)?;
        validate_path("output_path", &self.output_path)?;
        // The smoothing model looks back 60 days and needs one more.
        validate_positive_number("history_days", self.history_days as usize, 61)?;
        if self.coins.is_empty() {
            return Err(ForecastError::ConfigError {
                message: "Watchlist cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
