/*!
 * Signal Delivery
 * OS-level signal delivery to worker processes
 */

use super::traits::ProcessSignaler;
use super::types::{DeliveryFailure, WorkerSignal};
use crate::core::OsPid;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::kill;
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// Sends real signals with kill(2)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSignaler;

impl UnixSignaler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ProcessSignaler for UnixSignaler {
    fn send(&self, os_pid: OsPid, signal: WorkerSignal) -> Result<(), DeliveryFailure> {
        let pid = i32::try_from(os_pid)
            .map_err(|_| DeliveryFailure::Other(format!("pid {} out of range", os_pid)))?;

        match kill(NixPid::from_raw(pid), signal.to_unix()) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(DeliveryFailure::NoSuchProcess),
            Err(e) => Err(DeliveryFailure::Other(e.desc().to_string())),
        }
    }
}

#[cfg(not(unix))]
impl ProcessSignaler for UnixSignaler {
    fn send(&self, os_pid: OsPid, signal: WorkerSignal) -> Result<(), DeliveryFailure> {
        Err(DeliveryFailure::Other(format!(
            "{} to OS PID {} not supported on this platform",
            signal, os_pid
        )))
    }
}
