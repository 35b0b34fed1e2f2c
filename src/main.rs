use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clap_serde_derive::ClapSerde;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crop_price_runner::api::{self, AppState};
use crop_price_runner::config::{Config, DEFAULT_CONFIG_FILE};
use crop_price_runner::generation::GeminiClient;
use crop_price_runner::pricing::PriceAdvisor;
use crop_price_runner::telemetry::init_telemetry;

#[cfg(unix)]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(&args.config_file, args.opt_config)?;
    init_telemetry(&config)?;

    let generator = GeminiClient::from_config(&config)?;
    let advisor = PriceAdvisor::new(Arc::new(generator));
    if !advisor.is_configured() {
        warn!("GEMINI_API_KEY is not set, every model probe will fail");
    }

    let router = api::router(AppState::new(advisor, &config), &config.cors_origins);

    let listener = TcpListener::bind(format!("{}:{}", config.address, config.port)).await?;
    info!(
        "Starting Gemini AI Price Suggestion API Service on {}",
        listener.local_addr()?
    );
    info!("Environment: {}", config.environment);
    info!("Debug mode: {}", config.debug);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
