use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Body of a failed response. Only a string `detail` is meaningful to users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    /// Parses the backend's SQLite `CURRENT_TIMESTAMP` text.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// `GET /resume`: which resume text the backend feeds the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeStatus {
    pub source: String,
    pub characters: usize,
    #[serde(default)]
    pub preview: String,
}

/// `GET /config-status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigStatus {
    #[serde(default)]
    pub dotenv_path: String,
    #[serde(default)]
    pub dotenv_exists: bool,
    pub openrouter_key_set: bool,
    #[serde(default)]
    pub openrouter_key_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "What is Sriram studying?".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "What is Sriram studying?"})
        );
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "Message cannot be empty"})).unwrap();
        assert_eq!(body.detail_text(), Some("Message cannot be empty"));
    }

    #[test]
    fn test_error_body_ignores_structured_detail() {
        // FastAPI validation failures carry a list, not a string
        let body: ErrorBody = serde_json::from_value(json!({
            "detail": [{"loc": ["body", "message"], "msg": "field required"}]
        }))
        .unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn test_error_body_without_detail() {
        let body: ErrorBody = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn test_history_entry_timestamp_parsing() {
        let entry = HistoryEntry {
            role: "user".to_string(),
            content: "hi".to_string(),
            timestamp: Some("2025-03-14 09:26:53".to_string()),
        };
        let ts = entry.recorded_at().unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.second(), 53);
    }

    #[test]
    fn test_history_entry_unparseable_timestamp() {
        let entry = HistoryEntry {
            role: "assistant".to_string(),
            content: "hello".to_string(),
            timestamp: Some("yesterday".to_string()),
        };
        assert!(entry.recorded_at().is_none());
    }
}
