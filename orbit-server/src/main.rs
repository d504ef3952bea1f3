use orbit_server::{router, OpenAiAgent, ServerConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = ServerConfig::from_env()?;

    info!("Using OpenAI model: {}", config.model);
    let agent = Arc::new(OpenAiAgent::new(config.api_key, config.model));

    let app = router(agent);

    info!("Server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
