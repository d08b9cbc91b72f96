/*!
 * Core Types
 * Common types used across the supervisor
 */

/// OS-level process ID
pub type OsPid = u32;

/// Zero-based spawn index; the true key of a worker
pub type WorkerIndex = usize;
