/*!
 * HTTP Work Source
 * Single GET against the persons endpoint, decoded as a JSON array
 */

use super::traits::WorkSource;
use super::types::WorkItem;
use crate::core::limits::SERVICE_USER_AGENT;
use crate::core::{SourceError, SourceResult};
use tracing::{debug, info, warn};

/// Fetches work items from a REST endpoint
#[derive(Debug, Clone)]
pub struct HttpWorkSource {
    url: String,
    client: reqwest::Client,
}

impl HttpWorkSource {
    /// No request timeout: a slow endpoint is only abandoned by a shutdown
    /// request
    pub fn new(url: impl Into<String>) -> SourceResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .user_agent(SERVICE_USER_AGENT)
            .build()
            .map_err(|e| SourceError::Request {
                url: url.clone(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WorkSource for HttpWorkSource {
    async fn fetch(&self) -> SourceResult<Vec<WorkItem>> {
        debug!(url = %self.url, "Fetching work items");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Request {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "Work source returned non-success status");
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| SourceError::Request {
            url: self.url.clone(),
            reason: format!("failed to read response body: {}", e),
        })?;

        let items: Vec<WorkItem> =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        info!(
            url = %self.url,
            count = items.len(),
            bytes = body.len(),
            "Fetched work items"
        );
        Ok(items)
    }
}
