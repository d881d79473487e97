mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::create_router;
pub use state::{AppState, DEFAULT_MAX_SESSIONS};

/// Server configuration
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Start the calltree server
pub async fn run_server(
    state: AppState,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
