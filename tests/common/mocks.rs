use async_trait::async_trait;
use portfolio_chat::{
    Error, Result,
    backend::{
        ChatBackend, ChatRequest, ChatResponse, ConfigStatus, HealthStatus, HistoryEntry,
        ResumeStatus,
    },
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock backend that records every chat request and plays back scripted replies
#[derive(Debug)]
pub struct MockBackend {
    pub replies: Arc<Mutex<Vec<Result<ChatResponse>>>>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
    pub history: Arc<Mutex<Vec<HistoryEntry>>>,
    pub delay: Option<Duration>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            history: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push(Ok(create_chat_response(reply)));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.replies.lock().unwrap().push(Err(error));
        self
    }

    pub fn with_history(self, entries: Vec<HistoryEntry>) -> Self {
        *self.history.lock().unwrap() = entries;
        self
    }

    /// Holds every reply back for `delay`, keeping the exchange pending meanwhile
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::internal("No more mock replies available"));
        }
        replies.remove(0)
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let history = self.history.lock().unwrap();
        let skip = history.len().saturating_sub(limit);
        Ok(history.iter().skip(skip).cloned().collect())
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "running".to_string(),
            message: "Sriram's Portfolio API is live!".to_string(),
        })
    }

    async fn resume_status(&self) -> Result<ResumeStatus> {
        Ok(ResumeStatus {
            source: "resume.txt".to_string(),
            characters: 2048,
            preview: "Name: Sriram Karthik Eunni".to_string(),
        })
    }

    async fn config_status(&self) -> Result<ConfigStatus> {
        Ok(ConfigStatus {
            dotenv_path: "/app/backend/.env".to_string(),
            dotenv_exists: true,
            openrouter_key_set: false,
            openrouter_key_length: 0,
        })
    }
}

pub fn create_chat_response(reply: &str) -> ChatResponse {
    ChatResponse {
        reply: reply.to_string(),
    }
}

pub fn create_history_entry(role: &str, content: &str, timestamp: &str) -> HistoryEntry {
    HistoryEntry {
        role: role.to_string(),
        content: content.to_string(),
        timestamp: Some(timestamp.to_string()),
    }
}
