/*!
 * Shutdown Signal Handler
 *
 * Listens for the signals that end a supervisor run:
 * - SIGINT (Ctrl-C in terminal)
 * - SIGTERM (default kill signal, used by systemd/Kubernetes)
 *
 * Listeners are registered in `install`, not on first poll, so a signal that
 * arrives while workers are still being spawned is kept until `recv` runs.
 */

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Which signal ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownTrigger {
    Interrupt,
    Terminate,
}

#[cfg(unix)]
pub struct ShutdownSignal {
    sigint: Signal,
    sigterm: Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    /// Register SIGINT and SIGTERM listeners
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first SIGINT or SIGTERM
    pub async fn recv(&mut self) -> ShutdownTrigger {
        tokio::select! {
            _ = self.sigint.recv() => ShutdownTrigger::Interrupt,
            _ = self.sigterm.recv() => ShutdownTrigger::Terminate,
        }
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) -> ShutdownTrigger {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownTrigger::Interrupt,
            Err(e) => {
                tracing::error!(error = %e, "Ctrl-C listener failed, shutting down");
                ShutdownTrigger::Terminate
            }
        }
    }
}
