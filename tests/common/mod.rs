//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use svg_optimizer::pipeline::{default_engine, Reducer};
use svg_optimizer::{HttpServer, OptimizerConfig, Shutdown};

/// Start a server on an ephemeral port with the default engine.
///
/// The returned `Shutdown` must be kept alive for the duration of the test;
/// dropping it stops the server.
#[allow(dead_code)]
pub async fn spawn_server(config: OptimizerConfig) -> (SocketAddr, Arc<Shutdown>) {
    spawn_server_with_engine(config, default_engine()).await
}

/// Start a server on an ephemeral port with a custom engine.
#[allow(dead_code)]
pub async fn spawn_server_with_engine(
    mut config: OptimizerConfig,
    engine: Arc<dyn Reducer>,
) -> (SocketAddr, Arc<Shutdown>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config, engine);
    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for the accept loop to come up.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}
