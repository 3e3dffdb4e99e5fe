use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, Instrument};
use crate::config::Config;
use crate::http::connection::Connection;
use crate::todo::{ListHandler, Store};

/// Bind the configured address and serve until the task is dropped.
pub async fn run(cfg: &Config, store: Store) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, store, cfg.server.max_request_size).await
}

/// Accept connections on an already bound listener.
///
/// Every connection gets its own task; there is no limit on how many run at
/// once. A failed accept is logged and the loop carries on.
pub async fn serve(listener: TcpListener, store: Store, max_request_size: usize) -> anyhow::Result<()> {
    let handler = ListHandler::new(store);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let handler = handler.clone();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, handler, max_request_size);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(tracing::debug_span!("conn", %peer)),
        );
    }
}
