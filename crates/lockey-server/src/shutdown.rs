//! Shutdown watcher and bounded drain.
//!
//! ```text
//! Serving ──(SIGINT | SIGTERM)──▶ Draining ──(drained | grace elapsed)──▶ Exited
//! ```
//!
//! The watcher reacts to the first signal only. Draining is best effort:
//! requests still running when the grace period ends are abandoned, and that
//! is reported as [`DrainOutcome::TimedOut`], not as an error.

use std::{fmt, future::Future, io, time::Duration};

use tokio::sync::watch;

/// The signal that started a shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// How the drain step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every in-flight request finished within the grace period.
    Completed,
    /// The grace period elapsed; remaining requests were abandoned.
    TimedOut,
    /// The listener reported an error while closing.
    Failed,
}

/// Summary of a finished shutdown, handed back to the hosting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Signal that triggered the shutdown.
    pub signal: ShutdownSignal,
    /// How draining ended.
    pub drain: DrainOutcome,
    /// Time spent draining.
    pub elapsed: Duration,
}

/// Resolves on the first interrupt or termination signal.
///
/// If a handler cannot be installed the failure is logged and that source
/// never fires.
pub async fn termination_signal() -> ShutdownSignal {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => ShutdownSignal::Interrupt,
        () = terminate => ShutdownSignal::Terminate,
    }
}

/// Waits until the watcher publishes a signal.
///
/// Never resolves if the watcher goes away without publishing one.
pub(crate) async fn signalled(rx: &mut watch::Receiver<Option<ShutdownSignal>>) -> ShutdownSignal {
    let signal = rx.wait_for(Option::is_some).await.ok().and_then(|signal| *signal);
    match signal {
        Some(signal) => signal,
        None => std::future::pending().await,
    }
}

/// Give `serve` up to `grace_period` to finish.
pub(crate) async fn drain<F>(serve: F, grace_period: Duration) -> DrainOutcome
where
    F: Future<Output = io::Result<()>>,
{
    match tokio::time::timeout(grace_period, serve).await {
        Ok(Ok(())) => {
            tracing::info!("In-flight requests drained");
            DrainOutcome::Completed
        },
        Ok(Err(e)) => {
            tracing::warn!("Listener failed while draining: {}", e);
            DrainOutcome::Failed
        },
        Err(_) => {
            tracing::warn!(
                grace_ms = grace_period.as_millis(),
                "Grace period elapsed, abandoning in-flight requests"
            );
            DrainOutcome::TimedOut
        },
    }
}
