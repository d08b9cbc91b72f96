/*!
 * Core Module
 * Errors, limits and shared type aliases
 */

pub mod errors;
pub mod limits;
pub mod types;

pub use errors::*;
pub use types::{OsPid, WorkerIndex};
