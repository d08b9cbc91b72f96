/*!
 * Signal Types
 * Signals the supervisor sends to its workers
 */

use std::fmt;

/// Signals sent to a worker during shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerSignal {
    /// Ask the worker to shut down on its own (SIGTERM)
    Terminate,
    /// Unconditional termination (SIGKILL, cannot be caught or ignored)
    Kill,
}

impl WorkerSignal {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerSignal::Terminate => "SIGTERM",
            WorkerSignal::Kill => "SIGKILL",
        }
    }

    pub fn is_graceful(&self) -> bool {
        matches!(self, WorkerSignal::Terminate)
    }

    #[cfg(unix)]
    pub fn to_unix(self) -> nix::sys::signal::Signal {
        match self {
            WorkerSignal::Terminate => nix::sys::signal::Signal::SIGTERM,
            WorkerSignal::Kill => nix::sys::signal::Signal::SIGKILL,
        }
    }
}

impl fmt::Display for WorkerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why the OS refused a signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// No process with that pid (ESRCH)
    NoSuchProcess,
    Other(String),
}
