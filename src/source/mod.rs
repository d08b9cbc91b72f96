/*!
 * Work Source Module
 * Retrieves the work items that parameterize workers
 */

mod fixture;
mod http;
pub mod traits;
pub mod types;

pub use fixture::StaticWorkSource;
pub use http::HttpWorkSource;
pub use traits::WorkSource;
pub use types::WorkItem;
