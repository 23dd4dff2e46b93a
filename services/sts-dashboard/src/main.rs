use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod domain;
mod error;
mod handlers;
mod render;
mod repositories;
mod session;

use cli::Cli;
use config::{AppConfig, AppState};
use error::AppResult;

#[tokio::main]
async fn main() {
    // .env opsional, fallback ke system env
    dotenvy::dotenv().ok();

    // Log ke stderr supaya output tabel di stdout tetap bersih
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sts_dashboard=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(err) = start(cli).await {
        tracing::debug!("Command gagal: {:?}", err);
        eprintln!("❌ {}", err.user_message());
        std::process::exit(err.exit_code());
    }
}

async fn start(cli: Cli) -> AppResult {
    let config = AppConfig::from_env()?;
    tracing::debug!("🔧 Environment: {}, API: {}", config.environment, config.api_url);

    if config.is_production() && config.api_url.starts_with("http://") {
        tracing::warn!("⚠️  Production tapi STS_API_URL tidak memakai HTTPS");
    }

    let state = AppState::new(config)?;
    cli::run(cli, &state).await
}
