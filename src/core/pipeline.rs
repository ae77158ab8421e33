use crate::analysis::{forecast, indicators, sentiment};
use crate::domain::model::{Candle, CoinAnalysis, CoinSpec, ForecastRecord};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    total_volumes: Vec<(f64, f64)>,
}

/// The daily analysis pipeline: fetch OHLCV history, compute indicators and
/// forecasts, score sentiment, and write the CSV outputs.
pub struct ForecastPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ForecastPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ForecastPipeline<S, C> {
    async fn extract(&self, coin: &CoinSpec) -> Result<Vec<Candle>> {
        let base = self.config.market_api_base().trim_end_matches('/');
        let days = self.config.history_days().to_string();
        tracing::info!(
            "Fetching {} days of historical data for {}...",
            days,
            coin.ticker
        );

        let ohlc_url = format!("{}/api/v3/coins/{}/ohlc", base, coin.id);
        let ohlc: Vec<(f64, f64, f64, f64, f64)> = self
            .client
            .get(&ohlc_url)
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let chart_url = format!("{}/api/v3/coins/{}/market_chart", base, coin.id);
        let chart: MarketChart = self
            .client
            .get(&chart_url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut volumes: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (ts, volume) in chart.total_volumes {
            if let Some(date) = date_of_ms(ts) {
                volumes.insert(date, volume);
            }
        }

        // One candle per UTC day; days the chart is missing get zero volume.
        let mut candles: BTreeMap<NaiveDate, Candle> = BTreeMap::new();
        for (ts, open, high, low, close) in ohlc {
            let Some(date) = date_of_ms(ts) else {
                continue;
            };
            let volume = volumes.get(&date).copied().unwrap_or(0.0);
            candles.insert(
                date,
                Candle {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                },
            );
        }

        tracing::debug!("Joined {} candles for {}", candles.len(), coin.ticker);
        Ok(candles.into_values().collect())
    }

    async fn transform(&self, coin: &CoinSpec, candles: Vec<Candle>) -> Result<CoinAnalysis> {
        tracing::info!("Calculating technical indicators for {}...", coin.ticker);
        let rows = indicators::compute_frame(&candles);
        let Some(last_row) = rows.last() else {
            return Err(ForecastError::ProcessingError {
                message: format!("No rows with complete indicators for {}", coin.ticker),
            });
        };

        let dates: Vec<NaiveDate> = candles.iter().map(|c| c.date).collect();
        let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let actual_price = close.last().copied().unwrap_or(0.0);

        let trend = forecast::trend_forecast(&dates, &close);
        let smoothing = forecast::smoothing_forecast(&close, forecast::LOOK_BACK);
        let highs = forecast::high_forecast(&dates, &high, 5);

        let sentiment_score = sentiment::news_sentiment(&self.client, &self.config, coin).await;

        let record = ForecastRecord {
            date: Utc::now().date_naive(),
            coin: coin.ticker.clone(),
            actual_price,
            trend_forecast: trend.unwrap_or(0.0),
            smoothing_forecast: smoothing.unwrap_or(0.0),
            sentiment_score,
            rsi: last_row.rsi,
            macd: last_row.macd,
            all_time_high: high.iter().cloned().fold(f64::MIN, f64::max),
            high_forecast_5_day: serde_json::to_string(&highs)?,
        };

        Ok(CoinAnalysis {
            record,
            rows,
        })
    }

    async fn load(&self, coin: &CoinSpec, analysis: &CoinAnalysis) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &analysis.rows {
            writer.serialize(row)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| ForecastError::ProcessingError {
                message: format!("CSV buffer error: {}", e),
            })?;

        let path = format!("data/{}_data.csv", coin.ticker);
        tracing::debug!("Writing {} indicator rows to {}", analysis.rows.len(), path);
        self.storage.write_file(&path, &data).await
    }

    async fn summarize(&self, records: &[ForecastRecord]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| ForecastError::ProcessingError {
                message: format!("CSV buffer error: {}", e),
            })?;

        self.storage.write_file("forecast_results.csv", &data).await?;
        Ok(format!(
            "{}/forecast_results.csv",
            self.config.output_path().trim_end_matches('/')
        ))
    }
}

fn date_of_ms(ts: f64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ts as i64).map(|dt| dt.date_naive())
}
