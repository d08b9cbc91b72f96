/*!
 * Graceful Shutdown
 *
 * Escalation per worker: SIGTERM, grace period, SIGKILL. Workers are
 * escalated concurrently, so total latency is one grace period rather than
 * one per worker. Ordering guarantees:
 * - every graceful signal goes out (in spawn order) before any forceful one
 * - a worker's SIGKILL is never sent before its own grace period has elapsed
 * - a worker whose SIGTERM could not be delivered is not killed
 */

use super::types::SupervisedProcess;
use crate::core::{OsPid, SignalDeliveryError, WorkerIndex};
use crate::signals::{ProcessSignaler, WorkerSignal};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Outcome of the escalation for one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerShutdown {
    pub index: WorkerIndex,
    pub name: String,
    pub os_pid: OsPid,
    pub graceful: Result<(), SignalDeliveryError>,
    /// `None` when no kill was attempted
    pub forceful: Option<Result<(), SignalDeliveryError>>,
}

impl WorkerShutdown {
    pub fn graceful_sent(&self) -> bool {
        self.graceful.is_ok()
    }

    pub fn kill_attempted(&self) -> bool {
        self.forceful.is_some()
    }

    /// SIGKILL actually reached a live process
    pub fn killed(&self) -> bool {
        matches!(self.forceful, Some(Ok(())))
    }
}

/// Per-worker outcomes in spawn order
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub workers: Vec<WorkerShutdown>,
    pub elapsed: Duration,
}

impl ShutdownReport {
    pub fn graceful_count(&self) -> usize {
        self.workers.iter().filter(|w| w.graceful_sent()).count()
    }

    pub fn killed_count(&self) -> usize {
        self.workers.iter().filter(|w| w.killed()).count()
    }

    /// Workers that were gone before the graceful signal reached them
    pub fn already_exited_count(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| matches!(w.graceful, Err(SignalDeliveryError::AlreadyExited { .. })))
            .count()
    }
}

/// Drive every tracked worker through graceful-then-forceful termination
pub async fn shutdown_all<S>(processes: &[SupervisedProcess], signaler: &S, grace_period: Duration) -> ShutdownReport
where
    S: ProcessSignaler + ?Sized,
{
    let started = Instant::now();

    // Graceful signals first, strictly in spawn order
    let graceful: Vec<_> = processes
        .iter()
        .map(|process| {
            let result = process.send_signal(signaler, WorkerSignal::Terminate);
            match &result {
                Ok(()) => info!(
                    worker = %process.name,
                    os_pid = process.os_pid,
                    grace_ms = grace_period.as_millis() as u64,
                    "Sent SIGTERM, waiting for graceful exit"
                ),
                Err(e) => warn!(
                    worker = %process.name,
                    os_pid = process.os_pid,
                    "Failed to terminate process: {}",
                    e
                ),
            }
            (process, result, Instant::now())
        })
        .collect();

    let escalations = graceful
        .into_iter()
        .map(move |(process, graceful, sent_at)| async move {
            let forceful = match graceful {
                Ok(()) => {
                    sleep_until(sent_at + grace_period).await;
                    Some(force_kill(process, signaler))
                }
                Err(_) => None,
            };

            WorkerShutdown {
                index: process.index,
                name: process.name.clone(),
                os_pid: process.os_pid,
                graceful,
                forceful,
            }
        });

    let workers = join_all(escalations).await;
    let elapsed = started.elapsed();

    debug!(workers = workers.len(), elapsed_ms = elapsed.as_millis() as u64, "Shutdown escalation finished");
    ShutdownReport { workers, elapsed }
}

fn force_kill<S>(process: &SupervisedProcess, signaler: &S) -> Result<(), SignalDeliveryError>
where
    S: ProcessSignaler + ?Sized,
{
    let result = process.send_signal(signaler, WorkerSignal::Kill);
    match &result {
        Ok(()) => info!(worker = %process.name, os_pid = process.os_pid, "Grace period elapsed, sent SIGKILL"),
        Err(SignalDeliveryError::AlreadyExited { .. }) => {
            debug!(worker = %process.name, os_pid = process.os_pid, "Exited within grace period")
        }
        Err(e) => warn!(
            worker = %process.name,
            os_pid = process.os_pid,
            "Failed to kill process: {}",
            e
        ),
    }
    result
}
