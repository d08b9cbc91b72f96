/*!
 * Work Source Traits
 */

use super::types::WorkItem;
use crate::core::SourceResult;
use std::future::Future;

/// Produces the list of work items a run is parameterized with
///
/// One round trip per call: no retries, no caching, no pagination.
pub trait WorkSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = SourceResult<Vec<WorkItem>>> + Send;
}
