/*!
 * System Limits and Constants
 *
 * Centralized location for the grace period, defaults and naming constants.
 */

use std::time::Duration;

// =============================================================================
// SHUTDOWN
// =============================================================================

/// Time a worker gets between the graceful signal and the forceful kill
pub const GRACE_PERIOD: Duration = Duration::from_secs(2);

// =============================================================================
// WORK SOURCE
// =============================================================================

/// Upstream endpoint listing person records
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:5000/api/persons";

/// User agent sent with the fetch request
pub const SERVICE_USER_AGENT: &str = concat!("microservice-supervisor/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// WORKERS
// =============================================================================

/// Prefix of every derived worker name
pub const WORKER_NAME_PREFIX: &str = "microservice";

/// Default worker executable, looked up next to the supervisor binary
pub const WORKER_BINARY_NAME: &str = "worker";

/// Interval between two activity lines of a worker
pub const WORKER_TICK: Duration = Duration::from_secs(10);

// =============================================================================
// ENVIRONMENT OVERRIDES
// =============================================================================

pub const ENV_SOURCE_URL: &str = "SUPERVISOR_SOURCE_URL";
pub const ENV_WORKER_BIN: &str = "SUPERVISOR_WORKER_BIN";
pub const ENV_WORKER_ARGS: &str = "SUPERVISOR_WORKER_ARGS";
pub const ENV_GRACE_PERIOD_MS: &str = "SUPERVISOR_GRACE_PERIOD_MS";
pub const ENV_TRACE_JSON: &str = "SUPERVISOR_TRACE_JSON";
