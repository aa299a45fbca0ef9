//! Bus Monitor - Main Entry Point

use dashboard::{
    init_logging, run_server, AppState, MonitorConfig, MonitorSession, SharedDashboard,
};
use message_router::MessageRouter;
use std::sync::Arc;
use stream_client::{ConnectionManager, WsConnector};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = MonitorConfig::load()?;
    init_logging(&config.log_level, config.log_json)?;

    info!("=== Bus Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Tracking bus {}", config.bus_id);

    let endpoint = config.stream_endpoint()?;
    let dashboard = SharedDashboard::new(&config.bus_id);

    let listener = TcpListener::bind(&config.http_addr).await?;

    let mut session = MonitorSession::new(MessageRouter::new(&config.bus_id), dashboard.clone());
    let state = Arc::new(AppState::new(dashboard, session.stats()));

    let mut manager = ConnectionManager::new(WsConnector, endpoint, config.connection());
    info!("Subscribing to {}", manager.endpoint());

    tokio::select! {
        _ = manager.run(&mut session) => {}
        result = run_server(listener, state) => result?,
    }

    Ok(())
}
