/*!
 * End-to-End Tests
 * The supervisor binary against a mock persons endpoint, with real workers
 */

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde_json::json;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUPERVISOR: &str = env!("CARGO_BIN_EXE_microservice-supervisor");
const WORKER: &str = env!("CARGO_BIN_EXE_worker");

async fn persons_endpoint(status: u16, count: usize) -> MockServer {
    let first_names = ["Ada", "Alan", "Grace", "Edsger", "Barbara"];
    let persons: Vec<_> = first_names
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, first)| {
            json!({
                "address": "1 Main St",
                "date_of_birth": "1990-01-01",
                "email": "someone@example.com",
                "first_name": first,
                "gender": null,
                "last_name": format!("Family{}", i + 1),
                "person_id": format!("p-{}", i + 1),
                "phone_number": "555-0100"
            })
        })
        .collect();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/persons"))
        .respond_with(ResponseTemplate::new(status).set_body_json(persons))
        .mount(&server)
        .await;
    server
}

fn supervisor(server: &MockServer, args: &[&str]) -> Command {
    let mut cmd = Command::new(SUPERVISOR);
    cmd.args(args)
        .env("SUPERVISOR_SOURCE_URL", format!("{}/api/persons", server.uri()))
        .env("SUPERVISOR_WORKER_BIN", WORKER)
        .env("SUPERVISOR_GRACE_PERIOD_MS", "500")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .kill_on_drop(true);
    cmd
}

async fn run_to_completion(mut cmd: Command) -> (Output, String) {
    let output = timeout(Duration::from_secs(30), cmd.output())
        .await
        .expect("supervisor did not exit")
        .unwrap();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output, text)
}

/// Read stdout until a line containing `needle` shows up; returns everything read
async fn read_until(child: &mut Child, lines: &mut tokio::io::Lines<BufReader<tokio::process::ChildStdout>>, needle: &str) -> String {
    let mut seen = String::new();
    let found = timeout(Duration::from_secs(20), async {
        while let Some(line) = lines.next_line().await.unwrap() {
            seen.push_str(&line);
            seen.push('\n');
            if line.contains(needle) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    if !found {
        let _ = child.start_kill();
        panic!("never saw {:?} in output:\n{}", needle, seen);
    }
    seen
}

#[tokio::test]
async fn test_full_lifecycle_with_interrupt() {
    let server = persons_endpoint(200, 3).await;
    let mut cmd = supervisor(&server, &["2"]);
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());

    let mut child = cmd.spawn().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();

    let mut output = read_until(&mut child, &mut lines, "Waiting for shutdown signal").await;
    // give the workers time to install their own handlers
    tokio::time::sleep(Duration::from_millis(500)).await;

    let pid = Pid::from_raw(child.id().unwrap() as i32);
    kill(pid, Signal::SIGTERM).unwrap();

    output.push_str(&read_until(&mut child, &mut lines, "All microservices have been shut down.").await);
    let status = timeout(Duration::from_secs(10), child.wait())
        .await
        .expect("supervisor did not exit")
        .unwrap();

    assert!(status.success(), "exit status {:?}, output:\n{}", status, output);
    assert!(output.contains("[microservice-1-Ada] Microservice created successfully with PID"));
    assert!(output.contains("[microservice-2-Alan] Microservice created successfully with PID"));
    assert!(!output.contains("microservice-3-Grace"));
    assert!(output.contains("[microservice-1-Ada] Person ID: p-1, Last Name: Family1"));
}

#[tokio::test]
async fn test_interrupt_signal_also_stops_run() {
    let server = persons_endpoint(200, 1).await;
    let mut cmd = supervisor(&server, &["1"]);
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());

    let mut child = cmd.spawn().unwrap();
    let mut lines = BufReader::new(child.stdout.take().unwrap()).lines();
    read_until(&mut child, &mut lines, "Waiting for shutdown signal").await;

    kill(Pid::from_raw(child.id().unwrap() as i32), Signal::SIGINT).unwrap();
    read_until(&mut child, &mut lines, "All microservices have been shut down.").await;

    let status = timeout(Duration::from_secs(10), child.wait()).await.unwrap().unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_interrupt_during_fetch_starts_no_worker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/persons"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut cmd = supervisor(&server, &["2"]);
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());

    let mut child = cmd.spawn().unwrap();
    let mut lines = BufReader::new(child.stdout.take().unwrap()).lines();
    let mut output = read_until(&mut child, &mut lines, "Microservice supervisor starting").await;
    // the fetch is now in flight
    tokio::time::sleep(Duration::from_millis(400)).await;

    kill(Pid::from_raw(child.id().unwrap() as i32), Signal::SIGINT).unwrap();
    output.push_str(&read_until(&mut child, &mut lines, "Supervisor exiting").await);

    let status = timeout(Duration::from_secs(3), child.wait())
        .await
        .expect("supervisor kept waiting on the fetch")
        .unwrap();
    assert!(status.success(), "exit status {:?}, output:\n{}", status, output);
    assert!(output.contains("Shutdown requested while fetching"), "output:\n{}", output);
    assert!(!output.contains("created successfully"));
}

#[tokio::test]
async fn test_more_workers_than_items() {
    let server = persons_endpoint(200, 3).await;
    let (output, text) = run_to_completion(supervisor(&server, &["5"])).await;

    assert!(!output.status.success());
    assert!(text.contains("Requested: 5, Available: 3"), "output:\n{}", text);
    assert!(!text.contains("created successfully"));
}

#[tokio::test]
async fn test_upstream_error_status() {
    let server = persons_endpoint(500, 3).await;
    let (output, text) = run_to_completion(supervisor(&server, &["2"])).await;

    assert!(!output.status.success());
    assert!(text.contains("non-success response code 500"), "output:\n{}", text);
    assert!(!text.contains("created successfully"));
}

#[tokio::test]
async fn test_missing_count_argument() {
    let server = persons_endpoint(200, 3).await;
    let (output, text) = run_to_completion(supervisor(&server, &[])).await;

    assert!(!output.status.success());
    assert!(text.contains("number of workers"), "output:\n{}", text);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_numeric_count() {
    let server = persons_endpoint(200, 3).await;
    let (output, text) = run_to_completion(supervisor(&server, &["three"])).await;

    assert!(!output.status.success());
    assert!(text.contains("Invalid number of workers"), "output:\n{}", text);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_count() {
    let server = persons_endpoint(200, 3).await;
    let (output, _) = run_to_completion(supervisor(&server, &["0"])).await;

    assert!(!output.status.success());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_worker_binary() {
    let server = persons_endpoint(200, 3).await;
    let mut cmd = supervisor(&server, &["2"]);
    cmd.env("SUPERVISOR_WORKER_BIN", "/nonexistent/worker");
    let (output, text) = run_to_completion(cmd).await;

    assert!(!output.status.success());
    assert!(text.contains("Failed to start worker"), "output:\n{}", text);
}
