pub mod analysis;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod utils;

pub use crate::config::{
    cli::LocalStorage, dashboard::DashboardConfig, sequencer::SequencerConfig, RunnerConfig,
};
pub use crate::core::{pipeline::ForecastPipeline, runner::AnalysisEngine, sequencer::Sequencer};
pub use crate::utils::error::{ForecastError, Result};
