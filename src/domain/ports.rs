use crate::domain::model::{Candle, CoinAnalysis, CoinSpec, ForecastRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn market_api_base(&self) -> &str;
    fn news_api_base(&self) -> &str;
    fn llm_api_base(&self) -> &str;
    fn news_api_key(&self) -> Option<&str>;
    fn llm_api_key(&self) -> Option<&str>;
    fn llm_model(&self) -> &str;
    fn output_path(&self) -> &str;
    fn history_days(&self) -> u32;
}

/// The per-coin analysis pipeline. `extract` and `transform` failures are
/// fail-soft (the engine skips the coin); `load` and `summarize` failures are
/// fatal to the run.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, coin: &CoinSpec) -> Result<Vec<Candle>>;
    async fn transform(&self, coin: &CoinSpec, candles: Vec<Candle>) -> Result<CoinAnalysis>;
    async fn load(&self, coin: &CoinSpec, analysis: &CoinAnalysis) -> Result<()>;
    async fn summarize(&self, records: &[ForecastRecord]) -> Result<String>;
}
