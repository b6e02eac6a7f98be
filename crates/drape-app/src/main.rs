use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use drape_app::config::Config;
use drape_app::routes::api_routes;
use drape_app::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState::new(config));

    let app = api_routes().with_state(state);

    info!("starting inference server on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
