// src/lib.rs
//! receiver-config - Decoding and validation of alert notification receivers.

pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use cli::LogFormat;
pub use config::{Config, Receiver, ReceiverConfig, ReceiverKind};
pub use error::{ConfigError, ReceiverError};
