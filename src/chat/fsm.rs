use crate::{Error, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeEvent {
    Submit,
    Concluded,
}

/// Tracks whether a chat request is in flight. At most one ever is.
#[derive(Debug)]
pub struct ExchangeStateMachine {
    state: ExchangeState,
}

impl Default for ExchangeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeStateMachine {
    pub fn new() -> Self {
        Self {
            state: ExchangeState::Idle,
        }
    }

    pub fn current_state(&self) -> ExchangeState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == ExchangeState::Pending
    }

    pub fn transition(&mut self, event: ExchangeEvent) -> Result<()> {
        debug!("Exchange processing event {:?} in state {:?}", event, self.state);

        let new_state = match (self.state, event) {
            (ExchangeState::Idle, ExchangeEvent::Submit) => ExchangeState::Pending,
            (ExchangeState::Pending, ExchangeEvent::Concluded) => ExchangeState::Idle,
            _ => {
                warn!(
                    "Invalid exchange transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        info!(
            "Exchange state transition: {:?} -> {:?} (event: {:?})",
            self.state, new_state, event
        );
        self.state = new_state;
        Ok(())
    }
}
