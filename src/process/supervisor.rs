/*!
 * Process Supervisor
 *
 * Owns the run: selects work items, spawns one worker per item, watches every
 * worker's exit from its own task, and on the shutdown trigger escalates all
 * of them and waits for each wait task to observe its worker's exit.
 */

use super::executor::{exit_outcome, WorkerExecutor};
use super::shutdown::{shutdown_all, ShutdownReport};
use super::types::{SupervisedProcess, WorkerSpec, WorkerState};
use crate::config::{SupervisorConfig, WorkerCommand};
use crate::core::{ConfigError, OsPid, SpawnError, SupervisorError, SupervisorResult};
use crate::monitoring::{generate_run_id, span_run, span_worker, PhaseTimer};
use crate::signals::{ProcessSignaler, UnixSignaler};
use crate::source::{WorkItem, WorkSource};
use futures::future::join_all;
use futures::FutureExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    /// (name, OS pid) in spawn order
    pub spawned: Vec<(String, OsPid)>,
    pub shutdown: ShutdownReport,
    /// Shutdown was requested before every worker had been started
    pub interrupted: bool,
}

/// Supervises a set of worker processes
pub struct Supervisor<S: ProcessSignaler = UnixSignaler> {
    executor: WorkerExecutor,
    signaler: S,
    grace_period: Duration,
    processes: Vec<SupervisedProcess>,
    waiters: Vec<JoinHandle<()>>,
}

impl Supervisor<UnixSignaler> {
    pub fn new(worker: WorkerCommand, grace_period: Duration) -> Self {
        Self::with_signaler(worker, grace_period, UnixSignaler::new())
    }

    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self::new(config.worker.clone(), config.grace_period)
    }
}

impl<S: ProcessSignaler> Supervisor<S> {
    pub fn with_signaler(worker: WorkerCommand, grace_period: Duration, signaler: S) -> Self {
        Self {
            executor: WorkerExecutor::new(worker),
            signaler,
            grace_period,
            processes: Vec::new(),
            waiters: Vec::new(),
        }
    }

    /// The first `count` items, or an error when there are not enough
    pub fn select_items(count: usize, items: &[WorkItem]) -> SupervisorResult<&[WorkItem]> {
        if count == 0 {
            return Err(ConfigError::NonPositiveCount(0).into());
        }
        if count > items.len() {
            return Err(SupervisorError::InsufficientData {
                requested: count,
                available: items.len(),
            });
        }
        Ok(&items[..count])
    }

    /// Tracked workers in spawn order
    pub fn processes(&self) -> &[SupervisedProcess] {
        &self.processes
    }

    pub fn signaler(&self) -> &S {
        &self.signaler
    }

    /// Workers whose exit has not been observed yet
    pub fn alive_count(&self) -> usize {
        self.processes.iter().filter(|p| p.state().is_alive()).count()
    }

    /// Spawn one worker per item, in order; stops at the first failure
    ///
    /// Must be called from within a tokio runtime: each worker gets a wait
    /// task right after it starts.
    pub fn spawn_all(&mut self, items: &[WorkItem]) -> Result<(), SpawnError> {
        let offset = self.processes.len();
        for (i, item) in items.iter().enumerate() {
            self.spawn_one(WorkerSpec::from_item(offset + i, item))?;
        }
        Ok(())
    }

    fn spawn_one(&mut self, spec: WorkerSpec) -> Result<(), SpawnError> {
        let spawned = self.executor.spawn(&spec)?;
        let process = SupervisedProcess::new(spec.index, spec.name, spawned.os_pid);

        info!(
            worker = %process.name,
            os_pid = process.os_pid,
            "[{}] Microservice created successfully with PID {}",
            process.name,
            process.os_pid
        );

        let span = span_worker(&process.name, process.os_pid);
        let record = process.clone();
        let mut child = spawned.child;
        let waiter = tokio::spawn(
            async move {
                let outcome = exit_outcome(&record.name, child.wait().await);
                let previous = record.mark_exited(outcome.clone());

                match (&outcome, previous) {
                    (Some(e), WorkerState::Running) => warn!("Microservice exited unexpectedly: {}", e),
                    (Some(e), _) => info!("Microservice exited: {}", e),
                    (None, WorkerState::Running) => warn!("Microservice exited on its own"),
                    (None, _) => info!("Microservice exited cleanly"),
                }
            }
            .instrument(span),
        );

        self.processes.push(process);
        self.waiters.push(waiter);
        Ok(())
    }

    /// Escalate every tracked worker, then wait for all wait tasks
    pub async fn shutdown(&mut self) -> ShutdownReport {
        let timer = PhaseTimer::start("shutdown");
        let report = shutdown_all(&self.processes, &self.signaler, self.grace_period).await;
        self.wait_all().await;
        timer.finish();
        report
    }

    /// Block until every worker's exit has been observed
    pub async fn wait_all(&mut self) {
        let waiters = std::mem::take(&mut self.waiters);
        for result in join_all(waiters).await {
            if let Err(e) = result {
                error!(error = %e, "Wait task failed");
            }
        }
    }

    /// Fetch, validate, spawn, wait for `trigger`, shut down
    ///
    /// `trigger` is raced against the fetch and checked before every spawn, so
    /// a shutdown request that arrives early ends the run without starting the
    /// remaining workers. If a spawn fails, the workers already started are
    /// shut down with the same escalation before the error is returned.
    pub async fn run<W, F>(&mut self, count: usize, source: &W, trigger: F) -> SupervisorResult<RunSummary>
    where
        W: WorkSource,
        F: Future,
    {
        let run_id = generate_run_id();
        let span = span_run(&run_id, count);
        self.run_inner(run_id, count, source, trigger)
            .instrument(span)
            .await
    }

    async fn run_inner<W, F>(
        &mut self,
        run_id: String,
        count: usize,
        source: &W,
        trigger: F,
    ) -> SupervisorResult<RunSummary>
    where
        W: WorkSource,
        F: Future,
    {
        tokio::pin!(trigger);

        let timer = PhaseTimer::start("fetch");
        let items = tokio::select! {
            biased;
            _ = &mut trigger => {
                info!("Shutdown requested while fetching, no worker started");
                return Ok(self.interrupted(run_id).await);
            }
            fetched = source.fetch() => fetched?,
        };
        timer.finish();

        let selected = Self::select_items(count, &items)?;

        let timer = PhaseTimer::start("spawn");
        let offset = self.processes.len();
        for (i, item) in selected.iter().enumerate() {
            if (&mut trigger).now_or_never().is_some() {
                info!(
                    spawned = self.processes.len(),
                    requested = count,
                    "Shutdown requested while spawning, remaining workers not started"
                );
                return Ok(self.interrupted(run_id).await);
            }

            if let Err(e) = self.spawn_one(WorkerSpec::from_item(offset + i, item)) {
                if !self.processes.is_empty() {
                    warn!(
                        spawned = self.processes.len(),
                        "Shutting down already started workers before aborting"
                    );
                    self.shutdown().await;
                }
                return Err(e.into());
            }
        }
        timer.finish();

        info!(workers = self.processes.len(), "Waiting for shutdown signal");
        trigger.await;
        info!("Shutdown requested, terminating workers");

        let summary = self.finish(run_id, false).await;
        info!("All microservices have been shut down.");
        Ok(summary)
    }

    /// Shut down whatever was started before an early shutdown request
    async fn interrupted(&mut self, run_id: String) -> RunSummary {
        self.finish(run_id, true).await
    }

    async fn finish(&mut self, run_id: String, interrupted: bool) -> RunSummary {
        let spawned = self
            .processes
            .iter()
            .map(|p| (p.name.clone(), p.os_pid))
            .collect();
        let shutdown = self.shutdown().await;

        RunSummary {
            run_id,
            spawned,
            shutdown,
            interrupted,
        }
    }
}
