//! Receiver configuration decoding and validation.
//!
//! This module turns the receiver section of a YAML document into typed,
//! validated receiver configurations: defaults are applied, unknown keys are
//! rejected, required fields and value domains are checked.

mod decode;
mod defaults;
mod headers;
mod receivers;
mod secret;
mod types;

// Re-exports publics
pub use decode::{Decoded, FieldType, decode, residual_keys};
pub use defaults::{DEFAULT_EMAIL_SUBJECT, defaults_for};
pub use headers::{canonical_header_name, normalize_headers};
pub use receivers::{
    EmailConfig, FlowdockConfig, HipchatConfig, MessageFormat, OpsGenieConfig, PagerdutyConfig,
    PushoverConfig, ReceiverConfig, ReceiverKind, ReceiverSchema, SlackConfig, WebhookConfig,
    decode_receiver,
};
pub use secret::SecretString;
pub use types::{Config, DEFAULT_CONFIG_PATH, Receiver};

#[cfg(test)]
mod tests;
