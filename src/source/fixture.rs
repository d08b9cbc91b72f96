/*!
 * Static Work Source
 * Fixed list of work items, for tests and offline runs
 */

use super::traits::WorkSource;
use super::types::WorkItem;
use crate::core::SourceResult;

#[derive(Debug, Clone, Default)]
pub struct StaticWorkSource {
    items: Vec<WorkItem>,
}

impl StaticWorkSource {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }
}

impl WorkSource for StaticWorkSource {
    async fn fetch(&self) -> SourceResult<Vec<WorkItem>> {
        Ok(self.items.clone())
    }
}
