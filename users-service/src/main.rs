use anyhow::Context;
use users_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    tracing::info!(
        environment = %config.service.environment,
        create_profile = ?config.validation.create_profile(),
        "Starting users service"
    );

    let app = router(AppState::new(config.clone()));

    Server::new(config)
        .serve(app)
        .await
        .context("server terminated with an error")?;

    Ok(())
}
