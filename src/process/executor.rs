/*!
 * Worker Executor
 * Handles OS-level worker spawning and exit classification
 */

use super::types::WorkerSpec;
use crate::config::WorkerCommand;
use crate::core::{ChildExitError, OsPid, SpawnError};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::debug;

/// A freshly started worker
#[derive(Debug)]
pub struct SpawnedWorker {
    pub os_pid: OsPid,
    pub child: Child,
}

/// Launches worker processes from a fixed command
#[derive(Debug, Clone)]
pub struct WorkerExecutor {
    command: WorkerCommand,
}

impl WorkerExecutor {
    pub fn new(command: WorkerCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &WorkerCommand {
        &self.command
    }

    /// Spawn one worker with its identity arguments
    ///
    /// Output goes straight to the supervisor's stdout/stderr so operators see
    /// every worker interleaved with the supervisor log.
    pub fn spawn(&self, spec: &WorkerSpec) -> Result<SpawnedWorker, SpawnError> {
        self.validate_command()?;

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.leading_args)
            .args(spec.identity_args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| SpawnError::SpawnFailed {
            name: spec.name.clone(),
            reason: format!("{}: {}", self.command.program.display(), e),
        })?;

        let os_pid = child.id().ok_or_else(|| SpawnError::SpawnFailed {
            name: spec.name.clone(),
            reason: "process exited before its pid could be read".to_string(),
        })?;

        debug!(worker = %spec.name, os_pid, "Spawned OS process");
        Ok(SpawnedWorker { os_pid, child })
    }

    fn validate_command(&self) -> Result<(), SpawnError> {
        let program = self.command.program.as_os_str();
        if program.is_empty() {
            return Err(SpawnError::InvalidCommand("empty worker program".to_string()));
        }

        let has_nul = program.to_string_lossy().contains('\0')
            || self.command.leading_args.iter().any(|a| a.contains('\0'));
        if has_nul {
            return Err(SpawnError::InvalidCommand(
                "worker command contains a NUL byte".to_string(),
            ));
        }

        Ok(())
    }
}

/// Classify a wait result: `None` for a clean exit
pub fn exit_outcome(name: &str, status: std::io::Result<ExitStatus>) -> Option<ChildExitError> {
    let status = match status {
        Ok(status) => status,
        Err(e) => {
            return Some(ChildExitError::WaitFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })
        }
    };

    if status.success() {
        return None;
    }

    if let Some(code) = status.code() {
        return Some(ChildExitError::Status {
            name: name.to_string(),
            code,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(ChildExitError::Signaled {
                name: name.to_string(),
                signal,
            });
        }
    }

    Some(ChildExitError::Status {
        name: name.to_string(),
        code: -1,
    })
}
