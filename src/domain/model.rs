use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One coin on the watchlist: market-data id, display ticker, and the full
/// name used for news queries. Parsed from `id:TICKER:Name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSpec {
    pub id: String,
    pub ticker: String,
    pub name: String,
}

impl FromStr for CoinSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(ticker), Some(name))
                if !id.is_empty() && !ticker.is_empty() && !name.is_empty() =>
            {
                Ok(CoinSpec {
                    id: id.to_string(),
                    ticker: ticker.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!(
                "Invalid coin spec '{}', expected 'id:TICKER:Name' (e.g. 'bitcoin:BTC-USD:Bitcoin')",
                s
            )),
        }
    }
}

impl fmt::Display for CoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.id, self.ticker, self.name)
    }
}

/// A daily OHLCV candle, joined from the market API's candle and volume series.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One row of the per-coin indicator CSV. Column names follow the summary the
/// dashboard reads: OHLCV plus the full technical indicator set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "SMA")]
    pub sma: f64,
    #[serde(rename = "EMA")]
    pub ema: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "MACD_Signal")]
    pub macd_signal: f64,
    #[serde(rename = "BB_High")]
    pub bb_high: f64,
    #[serde(rename = "BB_Low")]
    pub bb_low: f64,
    #[serde(rename = "Stoch_k")]
    pub stoch_k: f64,
    #[serde(rename = "Stoch_d")]
    pub stoch_d: f64,
    #[serde(rename = "OBV")]
    pub obv: f64,
    #[serde(rename = "Ichimoku_a")]
    pub ichimoku_a: f64,
    #[serde(rename = "Ichimoku_b")]
    pub ichimoku_b: f64,
}

/// One row of `forecast_results.csv`: the daily summary per coin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Coin")]
    pub coin: String,
    #[serde(rename = "Actual_Price")]
    pub actual_price: f64,
    #[serde(rename = "Trend_Forecast")]
    pub trend_forecast: f64,
    #[serde(rename = "Smoothing_Forecast")]
    pub smoothing_forecast: f64,
    #[serde(rename = "Sentiment_Score")]
    pub sentiment_score: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "All_Time_High")]
    pub all_time_high: f64,
    /// JSON array of `{ds, yhat}` points, 5 days ahead.
    #[serde(rename = "High_Forecast_5_Day")]
    pub high_forecast_5_day: String,
}

/// A point of the multi-day high forecast, serialized into
/// [`ForecastRecord::high_forecast_5_day`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighForecast {
    pub ds: NaiveDate,
    pub yhat: f64,
}

/// Everything the transform stage produces for one coin.
#[derive(Debug, Clone)]
pub struct CoinAnalysis {
    pub record: ForecastRecord,
    pub rows: Vec<IndicatorRow>,
}
