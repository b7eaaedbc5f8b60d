//! Centralized error types using thiserror.
//!
//! [`ReceiverError`] describes a mistake inside a single receiver block,
//! [`ConfigError`] wraps it with the location of that block in the document.

use thiserror::Error;

use crate::config::ReceiverKind;

/// Errors raised while decoding and validating one receiver block.
///
/// Every variant is an operator-fixable configuration mistake.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReceiverError {
    #[error("missing {field} in {kind} config")]
    MissingField {
        kind: ReceiverKind,
        field: &'static str,
    },
    #[error(
        "invalid {field} value {value:?} in {kind} config (expected one of: {})",
        .allowed.join(", ")
    )]
    InvalidValue {
        kind: ReceiverKind,
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("duplicate header {name:?} in email config")]
    DuplicateHeader { name: String },
    #[error("unrecognized field(s) in {kind} config: {}", .keys.join(", "))]
    UnrecognizedFields { kind: ReceiverKind, keys: Vec<String> },
    #[error("invalid type for {field} in {kind} config: expected {expected}: {message}")]
    InvalidType {
        kind: ReceiverKind,
        field: &'static str,
        expected: &'static str,
        message: String,
    },
    #[error("{kind} config must be a mapping, found {found}")]
    InvalidBlock { kind: ReceiverKind, found: String },
}

/// Errors related to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    LoadError(String),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
    #[error("invalid receiver '{receiver}': {}[{index}]: {source}", .kind.block_key())]
    InvalidReceiver {
        receiver: String,
        kind: ReceiverKind,
        index: usize,
        #[source]
        source: ReceiverError,
    },
}
