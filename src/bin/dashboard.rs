use clap::Parser;
use crypto_forecast::dashboard::{router, AppState};
use crypto_forecast::utils::{logger, validation::Validate};
use crypto_forecast::DashboardConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::parse();

    logger::init_cli_logger(config.verbose);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let state = AppState {
        data_dir: PathBuf::from(&config.data_dir),
    };
    let app = router(state);

    let addr = config.socket_addr()?;
    tracing::info!("Starting dashboard server on {}", addr);
    tracing::info!("Serving forecast data from {}", config.data_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
