use clap::Parser;
use crypto_forecast::config::file::RunnerFileConfig;
use crypto_forecast::utils::error::ErrorSeverity;
use crypto_forecast::utils::{logger, validation::Validate};
use crypto_forecast::{AnalysisEngine, ForecastPipeline, LocalStorage, RunnerConfig};

#[tokio::main]
async fn main() {
    let mut config = RunnerConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting daily-runner");
    if config.verbose {
        tracing::debug!("Runner config: {:?}", config);
    }

    if let Some(path) = config.config.clone() {
        match RunnerFileConfig::load(&path).and_then(|file| file.apply(&mut config)) {
            Ok(()) => tracing::info!("Applied configuration overrides from {}", path),
            Err(e) => {
                tracing::error!("❌ Failed to apply {}: {}", path, e);
                eprintln!("❌ {}", e);
                std::process::exit(e.exit_code());
            }
        }
    }
    config.resolve_env_keys();

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let coins = config.coins.clone();
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ForecastPipeline::new(storage, config);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run(&coins).await {
        Ok(Some(path)) => {
            tracing::info!("✅ Daily analysis completed successfully!");
            tracing::info!("📁 Summary saved to: {}", path);
        }
        Ok(None) => {
            tracing::warn!("Daily analysis finished with no results; summary not updated.");
        }
        Err(e) => {
            tracing::error!("❌ Daily analysis failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
