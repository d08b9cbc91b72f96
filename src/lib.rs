/*!
 * Microservice Supervisor Library
 * Fetches work items, runs one worker process per item and shuts them down
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod signals;
pub mod source;

// Re-exports
pub use crate::core::errors::*;
pub use config::{SupervisorConfig, WorkerCommand};
pub use monitoring::init_tracing;
pub use process::{RunSummary, ShutdownReport, SupervisedProcess, Supervisor, WorkerState};
pub use signals::{ShutdownSignal, UnixSignaler, WorkerSignal};
pub use source::{HttpWorkSource, StaticWorkSource, WorkItem, WorkSource};
