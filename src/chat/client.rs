use super::{
    fsm::{ExchangeEvent, ExchangeStateMachine},
    types::{ChatMessage, Transcript},
};
use crate::{
    Error, Result,
    backend::{ChatBackend, ChatRequest, ChatResponse},
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why a submission was dropped without contacting the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Replied,
    Failed,
}

/// Chat state for one session: transcript, input buffer, pending flag and
/// the current error line.
pub struct ChatClient {
    backend: Arc<dyn ChatBackend>,
    transcript: Transcript,
    input: String,
    exchange: ExchangeStateMachine,
    error: String,
    session_id: Uuid,
}

impl ChatClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let session_id = Uuid::new_v4();
        info!("Starting chat session {}", session_id);

        Self {
            backend,
            transcript: Transcript::new(),
            input: String::new(),
            exchange: ExchangeStateMachine::new(),
            error: String::new(),
            session_id,
        }
    }

    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.exchange.is_pending()
    }

    /// Current error line; empty when the last exchange did not fail.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a send control should be enabled right now.
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty() && !self.is_pending()
    }

    /// Validates `text`, shows it in the transcript and marks the exchange
    /// pending. The returned request must be resolved through [`Self::complete`].
    pub fn begin(&mut self, text: &str) -> std::result::Result<ChatRequest, SkipReason> {
        let message = text.trim();
        if message.is_empty() {
            debug!("Session {}: ignoring empty submission", self.session_id);
            return Err(SkipReason::Empty);
        }
        if self.exchange.is_pending() {
            debug!(
                "Session {}: ignoring submission while a request is pending",
                self.session_id
            );
            return Err(SkipReason::Pending);
        }
        self.exchange
            .transition(ExchangeEvent::Submit)
            .map_err(|_| SkipReason::Pending)?;

        self.transcript.push(ChatMessage::user(message));
        self.input.clear();
        self.error.clear();

        info!(
            "Session {}: submitting message {} ({} chars)",
            self.session_id,
            self.transcript.len(),
            message.chars().count()
        );
        Ok(ChatRequest {
            message: message.to_string(),
        })
    }

    /// Applies the result of the request handed out by [`Self::begin`].
    ///
    /// Fails with [`crate::Error::InvalidTransition`], leaving all state
    /// untouched, when no request is in flight.
    pub fn complete(&mut self, result: Result<ChatResponse>) -> Result<SubmitOutcome> {
        self.exchange.transition(ExchangeEvent::Concluded)?;

        match result {
            Ok(response) => {
                info!(
                    "Session {}: received reply ({} chars)",
                    self.session_id,
                    response.reply.chars().count()
                );
                self.transcript.push(ChatMessage::assistant(response.reply));
                Ok(SubmitOutcome::Replied)
            }
            Err(e) => {
                warn!("Session {}: chat exchange failed: {}", self.session_id, e);
                self.error = e.user_message();
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    /// Sends `text` and waits for the exchange to conclude. Failures end up in
    /// [`Self::error`]; nothing is retried.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let request = match self.begin(text) {
            Ok(request) => request,
            Err(reason) => return SubmitOutcome::Skipped(reason),
        };

        let result = self.backend.send_message(request).await;

        // begin() left the exchange Pending, so completion is always accepted
        self.complete(result).unwrap_or(SubmitOutcome::Failed)
    }

    /// Submits the current input buffer, as pressing Enter would.
    pub async fn submit_input(&mut self) -> SubmitOutcome {
        let text = self.input.clone();
        self.submit(&text).await
    }

    /// Asks a single question and returns the reply text. Any outcome other
    /// than a reply is an [`Error::Chat`] carrying the line a user would see.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        match self.submit(question).await {
            SubmitOutcome::Replied => self
                .transcript
                .last()
                .map(|reply| reply.content.clone())
                .ok_or_else(|| Error::internal("reply missing from transcript")),
            SubmitOutcome::Failed => Err(Error::Chat(self.error.clone())),
            SubmitOutcome::Skipped(SkipReason::Empty) => {
                Err(Error::Chat("Nothing to send.".to_string()))
            }
            SubmitOutcome::Skipped(SkipReason::Pending) => Err(Error::Chat(
                "Still waiting for the previous reply.".to_string(),
            )),
        }
    }
}
