/*!
 * Supervisor Configuration
 *
 * The worker count comes from the single positional CLI argument. Everything
 * else has a default that a handful of environment variables can override:
 * - SUPERVISOR_SOURCE_URL: work source endpoint
 * - SUPERVISOR_WORKER_BIN: worker executable (default: `worker` next to this binary)
 * - SUPERVISOR_WORKER_ARGS: leading worker arguments, whitespace separated
 * - SUPERVISOR_GRACE_PERIOD_MS: grace period between SIGTERM and SIGKILL
 */

use crate::core::limits::{
    DEFAULT_SOURCE_URL, ENV_GRACE_PERIOD_MS, ENV_SOURCE_URL, ENV_WORKER_ARGS, ENV_WORKER_BIN,
    GRACE_PERIOD, WORKER_BINARY_NAME,
};
use crate::core::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Program used to launch a worker, plus arguments placed before the identity arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The `worker` binary installed alongside the running executable
    pub fn sibling_worker() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe().map_err(|e| ConfigError::WorkerBinary(e.to_string()))?;
        let file_name = format!("{}{}", WORKER_BINARY_NAME, std::env::consts::EXE_SUFFIX);
        Ok(Self::new(exe.with_file_name(file_name)))
    }
}

/// Full supervisor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub count: usize,
    pub source_url: String,
    pub worker: WorkerCommand,
    pub grace_period: Duration,
}

impl SupervisorConfig {
    pub fn new(count: usize, worker: WorkerCommand) -> Self {
        Self {
            count,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            worker,
            grace_period: GRACE_PERIOD,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Build from process arguments (program name first) and the real environment
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let count_arg = args.into_iter().nth(1);
        Self::from_parts(count_arg.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build from the count argument and an environment lookup
    pub fn from_parts<F>(count_arg: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let count = parse_count(count_arg)?;

        let mut worker = match env(ENV_WORKER_BIN).filter(|v| !v.trim().is_empty()) {
            Some(path) => WorkerCommand::new(path),
            None => WorkerCommand::sibling_worker()?,
        };
        if let Some(args) = env(ENV_WORKER_ARGS) {
            worker = worker.with_args(args.split_whitespace());
        }

        let mut config = Self::new(count, worker);

        if let Some(url) = env(ENV_SOURCE_URL) {
            reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidOverride {
                key: ENV_SOURCE_URL.to_string(),
                reason: e.to_string(),
            })?;
            config = config.with_source_url(url);
        }

        if let Some(raw) = env(ENV_GRACE_PERIOD_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidOverride {
                    key: ENV_GRACE_PERIOD_MS.to_string(),
                    reason: e.to_string(),
                })?;
            config = config.with_grace_period(Duration::from_millis(millis));
        }

        Ok(config)
    }
}

/// Parse the requested worker count; must be a positive integer
pub fn parse_count(raw: Option<&str>) -> Result<usize, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingCount)?;
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidCount(raw.to_string()))?;

    if value <= 0 {
        return Err(ConfigError::NonPositiveCount(value));
    }

    usize::try_from(value).map_err(|_| ConfigError::InvalidCount(raw.to_string()))
}
