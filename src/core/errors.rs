/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

/// Fatal supervisor result
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Work source result
pub type SourceResult<T> = Result<T, SourceError>;

/// Configuration errors (bad or missing count argument, bad overrides)
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Please provide the number of workers as an argument")]
    #[diagnostic(
        code(config::missing_count),
        help("Usage: microservice-supervisor <count>")
    )]
    MissingCount,

    #[error("Invalid number of workers: {0:?}")]
    #[diagnostic(
        code(config::invalid_count),
        help("The worker count must be a positive integer, e.g. `microservice-supervisor 3`.")
    )]
    InvalidCount(String),

    #[error("Number of workers must be positive, got {0}")]
    #[diagnostic(
        code(config::non_positive_count),
        help("Request at least one worker.")
    )]
    NonPositiveCount(i64),

    #[error("Invalid value for {key}: {reason}")]
    #[diagnostic(
        code(config::invalid_override),
        help("Unset the variable to fall back to the default.")
    )]
    InvalidOverride { key: String, reason: String },

    #[error("Cannot locate worker binary: {0}")]
    #[diagnostic(
        code(config::worker_binary),
        help("Set SUPERVISOR_WORKER_BIN to the worker executable.")
    )]
    WorkerBinary(String),
}

/// Work source errors (the fetch failure class)
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SourceError {
    #[error("Failed to make request to {url}: {reason}")]
    #[diagnostic(
        code(source::request_failed),
        help("Check that the upstream API is running and reachable.")
    )]
    Request { url: String, reason: String },

    #[error("Received non-success response code {status} from {url}")]
    #[diagnostic(
        code(source::bad_status),
        help("The upstream API answered but refused the request. Check its logs.")
    )]
    Status { url: String, status: u16 },

    #[error("Failed to decode work items from {url}: {reason}")]
    #[diagnostic(
        code(source::decode_failed),
        help("The endpoint must return a JSON array of person records.")
    )]
    Decode { url: String, reason: String },
}

/// Errors starting a single worker process
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SpawnError {
    #[error("Invalid worker command: {0}")]
    #[diagnostic(code(spawn::invalid_command))]
    InvalidCommand(String),

    #[error("[{name}] Failed to start worker: {reason}")]
    #[diagnostic(
        code(spawn::failed),
        help("Check that the worker binary exists and is executable.")
    )]
    SpawnFailed { name: String, reason: String },
}

/// Signal delivery failures (non-fatal, logged per worker)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalDeliveryError {
    #[error("[{name}] Process with PID {os_pid} has already exited")]
    AlreadyExited { name: String, os_pid: u32 },

    #[error("[{name}] Failed to send {signal} to process with PID {os_pid}: {reason}")]
    DeliveryFailed {
        name: String,
        os_pid: u32,
        signal: &'static str,
        reason: String,
    },
}

/// Non-clean worker exits (non-fatal, logged per worker)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChildExitError {
    #[error("[{name}] Worker exited with status {code}")]
    Status { name: String, code: i32 },

    #[error("[{name}] Worker terminated by signal {signal}")]
    Signaled { name: String, signal: i32 },

    #[error("[{name}] Failed to wait for worker: {reason}")]
    WaitFailed { name: String, reason: String },
}

/// Fatal errors: any of these aborts the run
#[derive(Error, Debug, Diagnostic)]
pub enum SupervisorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] SourceError),

    #[error("Not enough work items in the response. Requested: {requested}, Available: {available}")]
    #[diagnostic(
        code(supervisor::insufficient_data),
        help("Request fewer workers or add records upstream.")
    )]
    InsufficientData { requested: usize, available: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Spawn(#[from] SpawnError),

    #[error("Failed to install shutdown signal handlers: {0}")]
    #[diagnostic(code(supervisor::signal_setup))]
    SignalSetup(#[source] std::io::Error),
}
