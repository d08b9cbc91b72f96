/*!
 * Signal Traits
 */

use super::types::{DeliveryFailure, WorkerSignal};
use crate::core::OsPid;

/// Delivers a signal to an OS process
pub trait ProcessSignaler: Send + Sync {
    fn send(&self, os_pid: OsPid, signal: WorkerSignal) -> Result<(), DeliveryFailure>;
}

impl<T: ProcessSignaler + ?Sized> ProcessSignaler for std::sync::Arc<T> {
    fn send(&self, os_pid: OsPid, signal: WorkerSignal) -> Result<(), DeliveryFailure> {
        (**self).send(os_pid, signal)
    }
}
