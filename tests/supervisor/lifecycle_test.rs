/*!
 * Supervisor Lifecycle Tests
 * Real worker processes through spawn, spontaneous exit and shutdown
 */

use microservice_supervisor::signals::{DeliveryFailure, ProcessSignaler};
use microservice_supervisor::{
    ChildExitError, SignalDeliveryError, StaticWorkSource, Supervisor, UnixSignaler, WorkItem,
    WorkerCommand, WorkerSignal, WorkerState,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

fn items(names: &[&str]) -> Vec<WorkItem> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| WorkItem::new(format!("p-{}", i + 1), *n, format!("Family{}", i + 1)))
        .collect()
}

fn worker_binary() -> WorkerCommand {
    WorkerCommand::new(env!("CARGO_BIN_EXE_worker"))
}

/// Ignores SIGTERM, so only the forceful kill stops it
fn stubborn_worker() -> WorkerCommand {
    WorkerCommand::new("sh").with_args(["-c", "trap '' TERM; exec sleep 30", "sh"])
}

/// Real signals, recorded with send time
#[derive(Clone, Default)]
struct Recorder {
    inner: UnixSignaler,
    sent: Arc<Mutex<Vec<(u32, WorkerSignal, Instant)>>>,
}

impl ProcessSignaler for Recorder {
    fn send(&self, os_pid: u32, signal: WorkerSignal) -> Result<(), DeliveryFailure> {
        let result = self.inner.send(os_pid, signal);
        if result.is_ok() {
            self.sent.lock().push((os_pid, signal, Instant::now()));
        }
        result
    }
}

async fn wait_until_exited(supervisor: &Supervisor<impl ProcessSignaler>) {
    for _ in 0..200 {
        if supervisor.alive_count() == 0 {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("workers did not exit in time");
}

#[tokio::test]
async fn test_worker_binary_exits_on_graceful_signal() {
    let mut supervisor = Supervisor::new(worker_binary(), Duration::from_secs(1));
    supervisor.spawn_all(&items(&["Ada", "Alan"])).unwrap();
    assert_eq!(supervisor.alive_count(), 2);

    // let the workers install their signal handlers
    sleep(Duration::from_millis(500)).await;

    let report = supervisor.shutdown().await;

    assert_eq!(report.graceful_count(), 2);
    assert_eq!(report.killed_count(), 0);
    for worker in &report.workers {
        assert!(matches!(
            worker.forceful,
            Some(Err(SignalDeliveryError::AlreadyExited { .. }))
        ));
    }
    for process in supervisor.processes() {
        assert_eq!(process.state(), WorkerState::Exited(None));
    }
}

#[tokio::test]
async fn test_stubborn_worker_is_killed_after_grace_period() {
    let grace = Duration::from_millis(300);
    let recorder = Recorder::default();
    let mut supervisor = Supervisor::with_signaler(stubborn_worker(), grace, recorder.clone());
    supervisor.spawn_all(&items(&["Ada", "Alan"])).unwrap();
    sleep(Duration::from_millis(100)).await;

    let report = supervisor.shutdown().await;
    assert_eq!(report.killed_count(), 2);

    let sent = recorder.sent.lock().clone();
    let order: Vec<_> = sent.iter().map(|(_, sig, _)| *sig).collect();
    assert_eq!(
        order,
        vec![
            WorkerSignal::Terminate,
            WorkerSignal::Terminate,
            WorkerSignal::Kill,
            WorkerSignal::Kill
        ]
    );

    // graceful signals follow spawn order
    let pids: Vec<_> = supervisor.processes().iter().map(|p| p.os_pid).collect();
    assert_eq!(sent[0].0, pids[0]);
    assert_eq!(sent[1].0, pids[1]);

    for pid in pids {
        let term = sent.iter().find(|(p, s, _)| *p == pid && *s == WorkerSignal::Terminate).unwrap().2;
        let kill = sent.iter().find(|(p, s, _)| *p == pid && *s == WorkerSignal::Kill).unwrap().2;
        assert!(kill.duration_since(term) >= grace);
    }

    for process in supervisor.processes() {
        assert!(matches!(
            process.state(),
            WorkerState::Exited(Some(ChildExitError::Signaled { signal: 9, .. }))
        ));
    }
}

#[tokio::test]
async fn test_spontaneous_exit_is_not_fatal() {
    let command = WorkerCommand::new("sh").with_args(["-c", r#"test "$2" = p-1 && exit 7; exec sleep 30"#, "sh"]);
    let mut supervisor = Supervisor::new(command, Duration::from_millis(100));
    supervisor.spawn_all(&items(&["Ada", "Alan"])).unwrap();

    for _ in 0..200 {
        if supervisor.processes()[0].state().is_exited() {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    assert!(matches!(
        supervisor.processes()[0].state(),
        WorkerState::Exited(Some(ChildExitError::Status { code: 7, .. }))
    ));
    assert_eq!(supervisor.processes()[1].state(), WorkerState::Running);

    let report = supervisor.shutdown().await;

    // the dead worker gets neither signal, the live one is escalated
    assert!(!report.workers[0].graceful_sent());
    assert!(!report.workers[0].kill_attempted());
    assert!(report.workers[1].graceful_sent());
    wait_until_exited(&supervisor).await;
}

#[tokio::test]
async fn test_run_end_to_end_with_static_source() {
    let source = StaticWorkSource::new(items(&["Ada", "Alan", "Grace"]));
    let mut supervisor = Supervisor::new(worker_binary(), Duration::from_secs(1));

    let summary = supervisor
        .run(2, &source, sleep(Duration::from_millis(500)))
        .await
        .unwrap();

    let names: Vec<_> = summary.spawned.iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["microservice-1-Ada", "microservice-2-Alan"]);
    assert_eq!(summary.shutdown.graceful_count(), 2);
    assert_eq!(supervisor.alive_count(), 0);
}

#[tokio::test]
async fn test_shutdown_latency_does_not_scale_with_workers() {
    let grace = Duration::from_millis(400);
    let mut supervisor = Supervisor::new(stubborn_worker(), grace);
    supervisor
        .spawn_all(&items(&["A", "B", "C", "D", "E"]))
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    let report = supervisor.shutdown().await;

    assert_eq!(report.killed_count(), 5);
    assert!(started.elapsed() < grace * 3);
}
