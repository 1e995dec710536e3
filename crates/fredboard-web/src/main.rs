use std::process::ExitCode;

use clap::Parser;
use fredboard_core::{FredConfig, KeyStatus};
use fredboard_web::{serve, AppState, ServerArgs, ServerError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "fredboard stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let config = FredConfig::from_env()?;
    let keys = KeyStatus::from_env();
    tracing::info!(
        fred = keys.fred,
        openai = keys.openai,
        base_url = %config.base_url,
        rate_limit_per_minute = config.rate_limit_per_minute,
        "starting fredboard"
    );

    let state = AppState::new(&config, keys)?;
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: args.bind,
            source,
        })?;

    serve(listener, state).await
}
