use kyc_portal::application::SubmitUseCase;
use kyc_portal::handlers::AppState;
use kyc_portal::infrastructure::{
    config::Config,
    database::{SqliteRepository, SubmissionRepository},
};
use kyc_portal::server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "starting KYC submission service");

    let repository = SqliteRepository::from_config(&config)?;
    tracing::info!(
        "database initialized with {} submissions",
        repository.count().unwrap_or(0)
    );

    let usecase = SubmitUseCase::new(Arc::new(repository));
    let state = Arc::new(AppState::new(usecase, config.max_body_bytes));

    let (addr, server) = server::bind(config.listen_addr, state, server::shutdown_signal())?;
    tracing::info!(%addr, "listening");

    server.await?;
    tracing::info!("server stopped");

    Ok(())
}
