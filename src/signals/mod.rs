/*!
 * Signals Module
 * Signals sent to workers and signals that stop the supervisor
 */

mod delivery;
mod handler;
pub mod traits;
pub mod types;

pub use delivery::UnixSignaler;
pub use handler::{ShutdownSignal, ShutdownTrigger};
pub use traits::ProcessSignaler;
pub use types::{DeliveryFailure, WorkerSignal};
