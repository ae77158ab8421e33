use crate::domain::model::{CoinSpec, ForecastRecord};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Minimum number of daily candles before a coin is analyzed; the smoothing
/// model looks back 60 days and needs one more.
pub const MIN_HISTORY_ROWS: usize = 61;

/// Orchestrates the daily run across the watchlist: extract, transform, and
/// load per coin, then write the summary. Extraction and analysis failures
/// skip the coin; failures writing outputs abort the run.
pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Returns the summary path, or `None` when no coin produced results
    /// (the previous summary is left untouched in that case).
    pub async fn run(&self, coins: &[CoinSpec]) -> Result<Option<String>> {
        println!("✅ [START] Kicking off daily crypto forecasting run...");

        let mut records: Vec<ForecastRecord> = Vec::new();
        for coin in coins {
            println!("\nProcessing {} ({})...", coin.ticker, coin.name);

            let candles = match self.pipeline.extract(coin).await {
                Ok(candles) => candles,
                Err(e) => {
                    tracing::warn!("Market data fetch failed for {}: {}. Skipping.", coin.ticker, e);
                    continue;
                }
            };
            if candles.len() < MIN_HISTORY_ROWS {
                tracing::warn!(
                    "Insufficient data for {} ({} of {} required rows). Skipping.",
                    coin.ticker,
                    candles.len(),
                    MIN_HISTORY_ROWS
                );
                continue;
            }

            let analysis = match self.pipeline.transform(coin, candles).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    tracing::warn!("Analysis failed for {}: {}. Skipping.", coin.ticker, e);
                    continue;
                }
            };

            self.pipeline.load(coin, &analysis).await?;
            print_report(&analysis.record);
            records.push(analysis.record);
        }

        println!("\n✅ [FINISH] Daily crypto forecasting run complete.");

        if records.is_empty() {
            tracing::warn!("No results were generated; the forecast summary was not updated.");
            return Ok(None);
        }

        let path = self.pipeline.summarize(&records).await?;
        tracing::info!("Saved {} records to {}", records.len(), path);
        Ok(Some(path))
    }
}

fn print_report(record: &ForecastRecord) {
    println!("\n--- 📈 Daily Report ---");
    println!("Coin                : {}", record.coin);
    println!("Actual Price        : ${:.2}", record.actual_price);
    println!("Trend Forecast      : ${:.2}", record.trend_forecast);
    println!("Smoothing Forecast  : ${:.2}", record.smoothing_forecast);
    println!("Sentiment Score     : {:.2}", record.sentiment_score);
    println!("-------------------------\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Candle, CoinAnalysis};
    use crate::utils::error::ForecastError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn coin(ticker: &str) -> CoinSpec {
        CoinSpec {
            id: ticker.to_lowercase(),
            ticker: ticker.to_string(),
            name: ticker.to_string(),
        }
    }

    fn candles(n: usize) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (0..n)
            .map(|i| Candle {
                date: start + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 102.0,
                low: 98.0,
                close: 101.0,
                volume: 1_000.0,
            })
            .collect()
    }

    fn record_for(ticker: &str) -> ForecastRecord {
        ForecastRecord {
            date: NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            coin: ticker.to_string(),
            actual_price: 101.0,
            trend_forecast: 102.0,
            smoothing_forecast: 101.5,
            sentiment_score: 0.0,
            rsi: 55.0,
            macd: 0.1,
            all_time_high: 102.0,
            high_forecast_5_day: "[]".to_string(),
        }
    }

    struct MockPipeline {
        extract_rows: usize,
        fail_extract_for: Option<String>,
        fail_transform_for: Option<String>,
        fail_load: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockPipeline {
        fn new(extract_rows: usize) -> Self {
            Self {
                extract_rows,
                fail_extract_for: None,
                fail_transform_for: None,
                fail_load: false,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Pipeline for MockPipeline {
        async fn extract(&self, coin: &CoinSpec) -> Result<Vec<Candle>> {
            self.calls.lock().await.push(format!("extract:{}", coin.ticker));
            if self.fail_extract_for.as_deref() == Some(&coin.ticker) {
                return Err(ForecastError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(candles(self.extract_rows))
        }

        async fn transform(&self, coin: &CoinSpec, _candles: Vec<Candle>) -> Result<CoinAnalysis> {
            self.calls.lock().await.push(format!("transform:{}", coin.ticker));
            if self.fail_transform_for.as_deref() == Some(&coin.ticker) {
                return Err(ForecastError::ProcessingError {
                    message: "bad math".to_string(),
                });
            }
            Ok(CoinAnalysis {
                record: record_for(&coin.ticker),
                rows: vec![],
            })
        }

        async fn load(&self, coin: &CoinSpec, _analysis: &CoinAnalysis) -> Result<()> {
            self.calls.lock().await.push(format!("load:{}", coin.ticker));
            if self.fail_load {
                return Err(ForecastError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            Ok(())
        }

        async fn summarize(&self, records: &[ForecastRecord]) -> Result<String> {
            self.calls
                .lock()
                .await
                .push(format!("summarize:{}", records.len()));
            Ok("out/forecast_results.csv".to_string())
        }
    }

    #[tokio::test]
    async fn test_happy_path_processes_all_coins_in_order() {
        let pipeline = MockPipeline::new(61);
        let calls = pipeline.calls.clone();
        let engine = AnalysisEngine::new(pipeline);

        let path = engine
            .run(&[coin("BTC-USD"), coin("ETH-USD")])
            .await
            .unwrap();

        assert_eq!(path.as_deref(), Some("out/forecast_results.csv"));
        let calls = calls.lock().await;
        assert_eq!(
            *calls,
            vec![
                "extract:BTC-USD",
                "transform:BTC-USD",
                "load:BTC-USD",
                "extract:ETH-USD",
                "transform:ETH-USD",
                "load:ETH-USD",
                "summarize:2",
            ]
        );
    }

    #[tokio::test]
    async fn test_extract_failure_skips_coin_but_not_run() {
        let mut pipeline = MockPipeline::new(61);
        pipeline.fail_extract_for = Some("BTC-USD".to_string());
        let calls = pipeline.calls.clone();
        let engine = AnalysisEngine::new(pipeline);

        let path = engine
            .run(&[coin("BTC-USD"), coin("ETH-USD")])
            .await
            .unwrap();

        assert!(path.is_some());
        let calls = calls.lock().await;
        assert!(!calls.contains(&"transform:BTC-USD".to_string()));
        assert!(calls.contains(&"load:ETH-USD".to_string()));
        assert!(calls.contains(&"summarize:1".to_string()));
    }

    #[tokio::test]
    async fn test_insufficient_history_skips_coin() {
        let pipeline = MockPipeline::new(MIN_HISTORY_ROWS - 1);
        let calls = pipeline.calls.clone();
        let engine = AnalysisEngine::new(pipeline);

        let path = engine.run(&[coin("BTC-USD")]).await.unwrap();

        assert!(path.is_none());
        let calls = calls.lock().await;
        assert_eq!(*calls, vec!["extract:BTC-USD"]);
    }

    #[tokio::test]
    async fn test_transform_failure_skips_coin() {
        let mut pipeline = MockPipeline::new(61);
        pipeline.fail_transform_for = Some("ETH-USD".to_string());
        let calls = pipeline.calls.clone();
        let engine = AnalysisEngine::new(pipeline);

        let path = engine
            .run(&[coin("BTC-USD"), coin("ETH-USD")])
            .await
            .unwrap();

        assert!(path.is_some());
        let calls = calls.lock().await;
        assert!(!calls.contains(&"load:ETH-USD".to_string()));
        assert!(calls.contains(&"summarize:1".to_string()));
    }

    #[tokio::test]
    async fn test_load_failure_aborts_run() {
        let mut pipeline = MockPipeline::new(61);
        pipeline.fail_load = true;
        let engine = AnalysisEngine::new(pipeline);

        let result = engine.run(&[coin("BTC-USD"), coin("ETH-USD")]).await;
        assert!(matches!(result, Err(ForecastError::IoError(_))));
    }

    #[tokio::test]
    async fn test_no_results_means_no_summary() {
        let mut pipeline = MockPipeline::new(61);
        pipeline.fail_extract_for = Some("BTC-USD".to_string());
        let calls = pipeline.calls.clone();
        let engine = AnalysisEngine::new(pipeline);

        let path = engine.run(&[coin("BTC-USD")]).await.unwrap();

        assert!(path.is_none());
        let calls = calls.lock().await;
        assert!(!calls.iter().any(|c| c.starts_with("summarize")));
    }
}
