/*!
 * Process Types
 * Worker identity, lifecycle state and the per-worker tracking record
 */

use crate::core::limits::WORKER_NAME_PREFIX;
use crate::core::{ChildExitError, OsPid, SignalDeliveryError, WorkerIndex};
use crate::signals::{DeliveryFailure, ProcessSignaler, WorkerSignal};
use crate::source::WorkItem;
use parking_lot::Mutex;
use std::sync::Arc;

/// Derived worker name: `microservice-{index+1}-{first_name}`
///
/// Uniqueness comes from the index prefix; two items with the same first
/// name still get distinct names.
pub fn worker_name(index: WorkerIndex, first_name: &str) -> String {
    format!("{}-{}-{}", WORKER_NAME_PREFIX, index + 1, first_name)
}

/// Worker lifecycle state
///
/// `Running -> Terminating -> Exited`, or `Running -> Exited` when the worker
/// dies on its own. `Exited` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    /// Graceful signal delivered, grace period running
    Terminating,
    /// `None` on clean exit
    Exited(Option<ChildExitError>),
}

impl WorkerState {
    pub fn is_exited(&self) -> bool {
        matches!(self, WorkerState::Exited(_))
    }

    pub fn is_alive(&self) -> bool {
        !self.is_exited()
    }
}

/// What a worker is launched with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    pub index: WorkerIndex,
    pub name: String,
    pub person_id: String,
    pub last_name: String,
}

impl WorkerSpec {
    pub fn from_item(index: WorkerIndex, item: &WorkItem) -> Self {
        Self {
            index,
            name: worker_name(index, &item.first_name),
            person_id: item.person_id.clone(),
            last_name: item.last_name.clone(),
        }
    }

    /// Positional identity arguments: service name, person id, last name
    pub fn identity_args(&self) -> [&str; 3] {
        [self.name.as_str(), self.person_id.as_str(), self.last_name.as_str()]
    }
}

/// One spawned worker
///
/// The state cell is shared with the worker's wait task, which is the only
/// writer of `Exited`. Shutdown only ever moves `Running` to `Terminating`.
#[derive(Debug, Clone)]
pub struct SupervisedProcess {
    pub index: WorkerIndex,
    pub name: String,
    pub os_pid: OsPid,
    state: Arc<Mutex<WorkerState>>,
}

impl SupervisedProcess {
    pub fn new(index: WorkerIndex, name: String, os_pid: OsPid) -> Self {
        Self {
            index,
            name,
            os_pid,
            state: Arc::new(Mutex::new(WorkerState::Running)),
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state.lock().clone()
    }

    /// Record the exit outcome. Called once, by the wait task.
    pub fn mark_exited(&self, outcome: Option<ChildExitError>) -> WorkerState {
        let mut state = self.state.lock();
        std::mem::replace(&mut *state, WorkerState::Exited(outcome))
    }

    /// Send a signal unless the worker is already known to have exited
    ///
    /// The state lock is held across the send so the wait task cannot publish
    /// `Exited` in between. The wait task reaps the child before it takes the
    /// lock, so a signal can still reach a pid freed in that short window; ESRCH
    /// from that window is reported as `AlreadyExited`.
    /// A successful graceful signal moves `Running` to `Terminating`.
    pub fn send_signal<S>(&self, signaler: &S, signal: WorkerSignal) -> Result<(), SignalDeliveryError>
    where
        S: ProcessSignaler + ?Sized,
    {
        let mut state = self.state.lock();
        if state.is_exited() {
            return Err(self.already_exited());
        }

        match signaler.send(self.os_pid, signal) {
            Ok(()) => {
                if signal.is_graceful() && *state == WorkerState::Running {
                    *state = WorkerState::Terminating;
                }
                Ok(())
            }
            Err(DeliveryFailure::NoSuchProcess) => Err(self.already_exited()),
            Err(DeliveryFailure::Other(reason)) => Err(SignalDeliveryError::DeliveryFailed {
                name: self.name.clone(),
                os_pid: self.os_pid,
                signal: signal.name(),
                reason,
            }),
        }
    }

    fn already_exited(&self) -> SignalDeliveryError {
        SignalDeliveryError::AlreadyExited {
            name: self.name.clone(),
            os_pid: self.os_pid,
        }
    }
}
