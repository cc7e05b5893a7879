use super::{
    ChatBackend, ChatRequest, ChatResponse, ConfigStatus, ErrorBody, HealthStatus, HistoryEntry,
    HistoryResponse, ResumeStatus,
};
use crate::{Error, Result, config::BackendConfig};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        debug!(
            "Creating HTTP backend for {} (timeout {}s)",
            config.base_url, config.timeout_secs
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to reach backend: {}", e)))?;

        Self::read_json(response).await
    }

    /// Turns a response into `T`, or into the error a chat front end should show.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status().as_u16();

        if !response.status().is_success() {
            // An unreadable or non-JSON error body is not worth reporting; the
            // status fallback covers it.
            let detail = match response.bytes().await {
                Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
                    .ok()
                    .and_then(|body| body.detail_text().map(str::to_string)),
                Err(_) => None,
            };
            let message = detail.unwrap_or_else(|| Error::status_fallback(status));
            warn!("Backend responded with status {}: {}", status, message);
            return Err(Error::Server { status, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Backend returned an unparseable body with status {}: {}", status, e);
            Error::MalformedResponse {
                status,
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("/chat");
        debug!("POST {} ({} chars)", url, request.message.chars().count());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to send chat request: {}", e)))?;

        Self::read_json(response).await
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let history: HistoryResponse = self.get_json("/history").await?;
        let skip = history.messages.len().saturating_sub(limit);

        debug!(
            "Backend returned {} history entries, keeping {}",
            history.messages.len(),
            history.messages.len() - skip
        );
        Ok(history.messages.into_iter().skip(skip).collect())
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/").await
    }

    async fn resume_status(&self) -> Result<ResumeStatus> {
        self.get_json("/resume").await
    }

    async fn config_status(&self) -> Result<ConfigStatus> {
        self.get_json("/config-status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let backend = HttpBackend::new(&config("http://localhost:8000//")).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.endpoint("/chat"), "http://localhost:8000/chat");
    }

    #[test]
    fn test_health_endpoint_is_root() {
        let backend = HttpBackend::new(&config("https://api.example.com")).unwrap();
        assert_eq!(backend.endpoint("/"), "https://api.example.com/");
    }
}
