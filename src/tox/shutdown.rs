//! Signal-driven shutdown flag
//!
//! SIGINT/SIGTERM set a flag; the bot loop checks it between ticks. A tick
//! already in progress is never interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{info, warn};

/// Cloneable shutdown flag shared between the signal listener and the loop
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag and spawn a task that sets it on SIGINT or SIGTERM
    ///
    /// The signal handlers are installed before this returns, so a signal
    /// that arrives while the caller is still blocked in startup work is
    /// recorded rather than killing the process. Must be called from within
    /// a tokio runtime.
    pub fn listen() -> Self {
        let shutdown = Self::new();
        let flag = shutdown.clone();
        let signals = Signals::install();
        tokio::spawn(async move {
            signals.recv().await;
            flag.trigger();
        });
        shutdown
    }

    /// Request shutdown
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown was requested
    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Registered termination signal streams
#[cfg(unix)]
struct Signals {
    interrupt: Option<Signal>,
    terminate: Option<Signal>,
}

#[cfg(unix)]
impl Signals {
    fn install() -> Self {
        Self {
            interrupt: register(SignalKind::interrupt(), "SIGINT"),
            terminate: register(SignalKind::terminate(), "SIGTERM"),
        }
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = next(&mut self.interrupt) => info!("received SIGINT, shutting down"),
            _ = next(&mut self.terminate) => info!("received SIGTERM, shutting down"),
        }
    }
}

#[cfg(unix)]
fn register(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(stream) => Some(stream),
        Err(e) => {
            warn!("failed to install {} handler: {}", name, e);
            None
        }
    }
}

/// Next delivery on `stream`; never resolves without a handler
#[cfg(unix)]
async fn next(stream: &mut Option<Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn install() -> Self {
        Signals
    }

    async fn recv(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                // Without a handler the only way out is killing the process
                warn!("failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
