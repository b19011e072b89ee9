pub mod config;
pub mod journal;

pub use config::{Config, ConfigError};
pub use journal::{Change, Journal, JournalError, PendingChange};
