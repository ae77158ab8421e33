use crate::config::RunnerConfig;
use crate::domain::model::CoinSpec;
use crate::utils::error::{ForecastError, Result};
use serde::Deserialize;

/// Optional TOML overrides for the runner. Only the fields present in the
/// file are applied; everything else keeps its flag or default value.
///
/// ```toml
/// [market]
/// api_base = "https://api.coingecko.com"
/// history_days = 180
///
/// [news]
/// api_key = "..."
///
/// [llm]
/// model = "gpt-4"
///
/// [output]
/// path = "/srv/forecasts"
///
/// coins = ["bitcoin:BTC-USD:Bitcoin"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RunnerFileConfig {
    pub market: Option<MarketSection>,
    pub news: Option<NewsSection>,
    pub llm: Option<LlmSection>,
    pub output: Option<OutputSection>,
    pub coins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MarketSection {
    pub api_base: Option<String>,
    pub history_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewsSection {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LlmSection {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
}

impl RunnerFileConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ForecastError::ConfigError {
            message: format!("Failed to parse {}: {}", path, e),
        })
    }

    pub fn apply(self, config: &mut RunnerConfig) -> Result<()> {
        if let Some(market) = self.market {
            if let Some(api_base) = market.api_base {
                config.market_api_base = api_base;
            }
            if let Some(days) = market.history_days {
                config.history_days = days;
            }
        }
        if let Some(news) = self.news {
            if let Some(api_base) = news.api_base {
                config.news_api_base = api_base;
            }
            if let Some(api_key) = news.api_key {
                config.news_api_key = Some(api_key);
            }
        }
        if let Some(llm) = self.llm {
            if let Some(api_base) = llm.api_base {
                config.llm_api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm_api_key = Some(api_key);
            }
            if let Some(model) = llm.model {
                config.llm_model = model;
            }
        }
        if let Some(output) = self.output {
            if let Some(path) = output.path {
                config.output_path = path;
            }
        }
        if let Some(coins) = self.coins {
            config.coins = coins
                .iter()
                .map(|raw| {
                    raw.parse::<CoinSpec>()
                        .map_err(|reason| ForecastError::InvalidConfigValueError {
                            field: "coins".to_string(),
                            value: raw.clone(),
                            reason,
                        })
                })
                .collect::<Result<Vec<_>>>()?;
        }
        Ok(())
    }
}
