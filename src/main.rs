use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use pdf_summarizer::{
    config::Config,
    routes::create_router,
    utils::{init_logger, LogFormat},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(LogFormat::Pretty);

    // Missing credentials stop the process here, before any request is served
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let state = AppState::from_config(config.clone())?;
    let app = create_router(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("HOST must be an IP address: {}", e))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
