mod client;
pub mod fsm;
mod types;

pub use client::{ChatClient, SkipReason, SubmitOutcome};
pub use fsm::{ExchangeEvent, ExchangeState, ExchangeStateMachine};
pub use types::{ChatMessage, Role, Transcript};
