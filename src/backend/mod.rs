mod http;
mod types;

pub use http::HttpBackend;
pub use types::*;

use crate::Result;
use async_trait::async_trait;

/// Most entries the backend's `/history` endpoint ever returns.
pub const HISTORY_LIMIT: usize = 20;

/// The remote portfolio assistant, reached over its HTTP contract.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat`. One request, one reply; never retried.
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// `GET /history`, trimmed to the last `limit` entries in chronological order.
    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// `GET /`
    async fn health(&self) -> Result<HealthStatus>;

    /// `GET /resume`
    async fn resume_status(&self) -> Result<ResumeStatus>;

    /// `GET /config-status`
    async fn config_status(&self) -> Result<ConfigStatus>;
}
