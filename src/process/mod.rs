/*!
 * Process Module
 * Worker spawning, exit tracking and shutdown escalation
 */

pub mod executor;
pub mod shutdown;
pub mod supervisor;
pub mod types;

// Re-export for convenience
pub use executor::{exit_outcome, SpawnedWorker, WorkerExecutor};
pub use shutdown::{shutdown_all, ShutdownReport, WorkerShutdown};
pub use supervisor::{RunSummary, Supervisor};
pub use types::{worker_name, SupervisedProcess, WorkerSpec, WorkerState};
