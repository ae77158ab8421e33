pub mod pipeline;
pub mod runner;
pub mod sequencer;

pub use crate::domain::model::{Candle, CoinAnalysis, CoinSpec, ForecastRecord, IndicatorRow};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
