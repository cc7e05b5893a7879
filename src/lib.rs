pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod repl;

pub use error::{Error, Result};
