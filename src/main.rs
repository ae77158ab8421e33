use clap::Parser;
use crypto_forecast::utils::{logger, validation::Validate};
use crypto_forecast::{Sequencer, SequencerConfig};

#[tokio::main]
async fn main() {
    let config = SequencerConfig::parse();

    logger::init_cli_logger(config.verbose);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let sequencer = match config
        .analysis_step()
        .and_then(|analysis| Ok(Sequencer::new(analysis, config.dashboard_step()?)))
    {
        Ok(sequencer) => sequencer,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = sequencer.run().await {
        tracing::error!("❌ Startup sequence aborted: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        // A failed step exits with the child's own code.
        std::process::exit(e.exit_code());
    }
}
