//! Metrics exposition server.
//!
//! Serves `GET /metrics` on its own listener, independent of the product API.

use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::MonitorError;
use crate::metrics::MetricsEndpoint;
use crate::playbooks::PlaybooksMetrics;

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// Upper bound on waiting for in-flight scrapes at shutdown.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Router with the `/metrics` route.
pub fn router(metrics: &PlaybooksMetrics) -> Router {
    let endpoint = MetricsEndpoint::new(metrics.registry().clone());
    Router::new().route(
        "/metrics",
        get(move || {
            let endpoint = endpoint.clone();
            async move { endpoint.handler().await }
        }),
    )
}

/// Turn `:9093` style addresses into bindable ones.
pub fn bind_address(address: &str) -> Result<String, MonitorError> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| MonitorError::InvalidAddress(address.to_string()))?;
    port.parse::<u16>()
        .map_err(|_| MonitorError::InvalidAddress(address.to_string()))?;
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    Ok(format!("{host}:{port}"))
}

pub struct MetricsServer {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<Result<(), MonitorError>>>>,
}

impl MetricsServer {
    /// Bind `address` and serve in the background.
    pub async fn start(address: &str, metrics: &PlaybooksMetrics) -> Result<Self, MonitorError> {
        let address = bind_address(address)?;
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| MonitorError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| MonitorError::Bind { address, source })?;

        let app = router(metrics);
        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
                .map_err(MonitorError::Serve)
        });

        info!(address = %local_addr, "metrics server listening");
        Ok(Self {
            local_addr,
            cancel,
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting scrapes and wait for the server task, bounded by
    /// [`SHUTDOWN_TIMEOUT`]. Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<(), MonitorError> {
        self.cancel.cancel();
        let Some(handle) = self.handle.lock().await.take() else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
            Ok(Ok(result)) => {
                debug!(address = %self.local_addr, "metrics server stopped");
                result
            }
            Ok(Err(e)) => Err(MonitorError::Join(e.to_string())),
            Err(_) => Err(MonitorError::ShutdownTimeout(SHUTDOWN_TIMEOUT)),
        }
    }
}

impl Drop for MetricsServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
