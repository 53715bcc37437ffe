//! Shutdown signal plumbing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

/// Broadcast-based shutdown signal shared between the runtime and the
/// trigger loop.
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new signal.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            sender,
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to the shutdown broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Request shutdown. Idempotent.
    pub fn request(&self) {
        debug!("Shutdown requested");
        self.requested.store(true, Ordering::SeqCst);
        let _ = self.sender.send(());
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Install OS signal handlers that request shutdown (Unix only).
    #[cfg(unix)]
    pub fn install_os_handlers(&self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let sigterm_signal = self.clone();
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                info!("Received SIGTERM");
                sigterm_signal.request();
            }
        });

        let mut sigint = signal(SignalKind::interrupt())?;
        let sigint_signal = self.clone();
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                info!("Received SIGINT");
                sigint_signal.request();
            }
        });

        info!("OS signal handlers installed (SIGTERM, SIGINT)");
        Ok(())
    }

    /// Install OS signal handlers (non-Unix fallback).
    #[cfg(not(unix))]
    pub fn install_os_handlers(&self) -> std::io::Result<()> {
        let handler = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C");
                handler.request();
            }
        });

        info!("OS signal handlers installed (Ctrl+C only)");
        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
