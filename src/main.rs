use entity_service::{logging, routes::make_app, Config};
use std::error::Error;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logging();
    let config = Config::init()?;
    let bind_address = config.bind_address.clone();
    let app = make_app(config).await?;
    let listener = TcpListener::bind(&bind_address).await?;
    info!(%bind_address, "🚀 Server started successfully");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down");
    }
}
