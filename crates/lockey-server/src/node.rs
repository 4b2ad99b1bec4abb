//! Node lifecycle: bind, serve, drain.
//!
//! The node owns the listening socket. The lock service is shared between
//! the router (built once, before serving) and every request handler.
//!
//! The node never exits the process. [`Node::serve_until`] returns a
//! [`ShutdownReport`] and the hosting binary decides what to do with it.

use std::{
    future::{Future, IntoFuture},
    io,
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};

use axum::Router;
use lockey_core::LockService;
use tokio::{net::TcpListener, sync::watch, time::Instant};

use crate::{
    config::NodeConfig,
    error::NodeError,
    routing,
    shutdown::{self, DrainOutcome, ShutdownReport, ShutdownSignal},
};

/// A bound, not yet serving, node.
pub struct Node {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
    grace_period: Duration,
}

impl Node {
    /// Validate `config`, build the router and bind the listener.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The port is not numeric or exceeds 65535 (no socket is created)
    /// - Binding to the address fails
    pub async fn bind<L: LockService>(
        lock_service: Arc<L>,
        config: &NodeConfig,
    ) -> Result<Self, NodeError> {
        let addr = config.bind_address()?;
        let router = routing::setup_routing(lock_service, Router::new());

        let listener = TcpListener::bind(addr.as_str())
            .await
            .map_err(|source| NodeError::Bind { addr: addr.clone(), source })?;
        let local_addr = listener.local_addr().map_err(|source| NodeError::Bind { addr, source })?;

        Ok(Self { listener, router, local_addr, grace_period: config.grace_period() })
    }

    /// Get the local address the node is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until SIGINT or SIGTERM, then drain.
    pub async fn serve(self) -> Result<ShutdownReport, NodeError> {
        self.serve_until(shutdown::termination_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain for at most the grace
    /// period.
    ///
    /// `shutdown` runs on its own task, armed before the listener starts
    /// accepting. Its first value is published once and both the drain
    /// trigger and this method observe it.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<ShutdownReport, NodeError>
    where
        F: Future<Output = ShutdownSignal> + Send + 'static,
    {
        let Self { listener, router, local_addr, grace_period } = self;

        let (signal_tx, mut signal_rx) = watch::channel(None);
        let watcher = tokio::spawn(async move {
            let signal = shutdown.await;
            tracing::info!(%signal, "Shutdown signal received");
            signal_tx.send_replace(Some(signal));
        });

        let mut trigger_rx = signal_rx.clone();
        let trigger = async move {
            shutdown::signalled(&mut trigger_rx).await;
        };

        tracing::info!("Starting server on {}", local_addr);

        let serve = axum::serve(listener, router).with_graceful_shutdown(trigger);
        let mut serve = std::pin::pin!(serve.into_future());

        let signal = tokio::select! {
            result = &mut serve => {
                let fired = *signal_rx.borrow();
                return match fired {
                    // The trigger fired and serving already wound down.
                    Some(signal) => Ok(ShutdownReport {
                        signal,
                        drain: if result.is_ok() {
                            DrainOutcome::Completed
                        } else {
                            DrainOutcome::Failed
                        },
                        elapsed: Duration::ZERO,
                    }),
                    None => {
                        watcher.abort();
                        Err(NodeError::Serve(
                            result.err().unwrap_or_else(|| io::Error::other("listener closed")),
                        ))
                    },
                };
            },
            signal = shutdown::signalled(&mut signal_rx) => signal,
        };

        tracing::info!(
            grace_ms = grace_period.as_millis(),
            "Stopped accepting connections, draining in-flight requests"
        );

        let started = Instant::now();
        let drain = shutdown::drain(serve, grace_period).await;

        Ok(ShutdownReport { signal, drain, elapsed: started.elapsed() })
    }
}

/// Bring up a node for `lock_service` and serve until a termination signal.
///
/// Returns once the node has drained (or the grace period elapsed). Startup
/// failures are returned as errors; the caller decides the exit status.
pub async fn start<L: LockService>(
    lock_service: Arc<L>,
    config: NodeConfig,
) -> Result<ShutdownReport, NodeError> {
    Node::bind(lock_service, &config).await?.serve().await
}
