/*!
 * Structured Tracing
 * Logging setup and run/phase spans using the tracing crate
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SUPERVISOR_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        debug!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .init();
        debug!("Structured tracing initialized");
    }
}

/// Generate a unique run ID for log correlation
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Root span of one supervisor run
pub fn span_run(run_id: &str, requested: usize) -> Span {
    span!(Level::INFO, "supervisor", run_id = %run_id, requested = requested)
}

/// Span for a single worker, carrying its name and OS pid
pub fn span_worker(name: &str, os_pid: u32) -> Span {
    span!(Level::INFO, "worker", worker = %name, os_pid = os_pid)
}

/// Times one phase of the run (fetch, spawn, shutdown) and logs its duration on finish
pub struct PhaseTimer {
    phase: &'static str,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(phase: &'static str) -> Self {
        debug!(phase, "phase started");
        Self {
            phase,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            phase = self.phase,
            duration_ms = elapsed.as_millis() as u64,
            "phase completed"
        );
        elapsed
    }
}
