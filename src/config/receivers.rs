//! Receiver configurations (email, chat, incident and push integrations).
//!
//! Every variant implements [`ReceiverSchema`]; [`ReceiverConfig::decode`]
//! runs the shared pipeline: copy defaults, bind the block, reject residual
//! keys, validate.

use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;

use super::decode::{Decoded, assign, decode, residual_keys};
use super::defaults;
use super::headers::normalize_headers;
use super::secret::SecretString;
use crate::error::ReceiverError;

/// Receiver integration kinds, tagged by the block key holding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    Email,
    Pagerduty,
    Hipchat,
    Slack,
    Webhook,
    OpsGenie,
    Pushover,
    Flowdock,
}

impl ReceiverKind {
    /// All kinds, in the order receivers list them.
    pub const ALL: [ReceiverKind; 8] = [
        ReceiverKind::Email,
        ReceiverKind::Pagerduty,
        ReceiverKind::Hipchat,
        ReceiverKind::Slack,
        ReceiverKind::Webhook,
        ReceiverKind::OpsGenie,
        ReceiverKind::Pushover,
        ReceiverKind::Flowdock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReceiverKind::Email => "email",
            ReceiverKind::Pagerduty => "pagerduty",
            ReceiverKind::Hipchat => "hipchat",
            ReceiverKind::Slack => "slack",
            ReceiverKind::Webhook => "webhook",
            ReceiverKind::OpsGenie => "opsgenie",
            ReceiverKind::Pushover => "pushover",
            ReceiverKind::Flowdock => "flowdock",
        }
    }

    /// Key of the receiver definition listing blocks of this kind.
    pub fn block_key(self) -> &'static str {
        match self {
            ReceiverKind::Email => "email_configs",
            ReceiverKind::Pagerduty => "pagerduty_configs",
            ReceiverKind::Hipchat => "hipchat_configs",
            ReceiverKind::Slack => "slack_configs",
            ReceiverKind::Webhook => "webhook_configs",
            ReceiverKind::OpsGenie => "opsgenie_configs",
            ReceiverKind::Pushover => "pushover_configs",
            ReceiverKind::Flowdock => "flowdock_configs",
        }
    }

    pub fn from_block_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.block_key() == key)
    }
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The contract shared by all receiver variants.
pub trait ReceiverSchema: Clone + Sized + 'static {
    const KIND: ReceiverKind;

    /// Canonical default value. Never mutated; decoding clones it.
    fn defaults() -> &'static Self;

    /// Overlays one field onto `self`. Returns `false` for a key the
    /// variant does not know.
    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError>;

    /// Checks required fields, then domains, then runs derivations.
    fn validate(self) -> Result<Self, ReceiverError>;
}

fn require(kind: ReceiverKind, field: &'static str, value: &str) -> Result<(), ReceiverError> {
    if value.is_empty() {
        return Err(ReceiverError::MissingField { kind, field });
    }
    Ok(())
}

fn require_secret(
    kind: ReceiverKind,
    field: &'static str,
    value: &SecretString,
) -> Result<(), ReceiverError> {
    if value.is_empty() {
        return Err(ReceiverError::MissingField { kind, field });
    }
    Ok(())
}

/// Runs the full pipeline for one block of variant `T`.
///
/// # Errors
/// Returns the first [`ReceiverError`] encountered. Unknown keys are
/// reported before any variant-specific check.
pub fn decode_receiver<T: ReceiverSchema>(node: &Value) -> Result<T, ReceiverError> {
    let Decoded { value, residual } = decode(node, T::defaults().clone())?;
    if !residual.is_empty() {
        return Err(ReceiverError::UnrecognizedFields {
            kind: T::KIND,
            keys: residual_keys(&residual),
        });
    }
    value.validate()
}

/// A validated receiver block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReceiverConfig {
    Email(EmailConfig),
    Pagerduty(PagerdutyConfig),
    Hipchat(HipchatConfig),
    Slack(SlackConfig),
    Webhook(WebhookConfig),
    OpsGenie(OpsGenieConfig),
    Pushover(PushoverConfig),
    Flowdock(FlowdockConfig),
}

impl ReceiverConfig {
    /// Decodes and validates a block found under `kind`'s block key.
    pub fn decode(kind: ReceiverKind, node: &Value) -> Result<Self, ReceiverError> {
        match kind {
            ReceiverKind::Email => decode_receiver(node).map(ReceiverConfig::Email),
            ReceiverKind::Pagerduty => decode_receiver(node).map(ReceiverConfig::Pagerduty),
            ReceiverKind::Hipchat => decode_receiver(node).map(ReceiverConfig::Hipchat),
            ReceiverKind::Slack => decode_receiver(node).map(ReceiverConfig::Slack),
            ReceiverKind::Webhook => decode_receiver(node).map(ReceiverConfig::Webhook),
            ReceiverKind::OpsGenie => decode_receiver(node).map(ReceiverConfig::OpsGenie),
            ReceiverKind::Pushover => decode_receiver(node).map(ReceiverConfig::Pushover),
            ReceiverKind::Flowdock => decode_receiver(node).map(ReceiverConfig::Flowdock),
        }
    }

    pub fn kind(&self) -> ReceiverKind {
        match self {
            ReceiverConfig::Email(_) => ReceiverKind::Email,
            ReceiverConfig::Pagerduty(_) => ReceiverKind::Pagerduty,
            ReceiverConfig::Hipchat(_) => ReceiverKind::Hipchat,
            ReceiverConfig::Slack(_) => ReceiverKind::Slack,
            ReceiverConfig::Webhook(_) => ReceiverKind::Webhook,
            ReceiverConfig::OpsGenie(_) => ReceiverKind::OpsGenie,
            ReceiverConfig::Pushover(_) => ReceiverKind::Pushover,
            ReceiverConfig::Flowdock(_) => ReceiverKind::Flowdock,
        }
    }
}

/// Configuration for notifications via mail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailConfig {
    /// Address to notify.
    pub to: String,
    pub from: String,
    pub smarthost: String,
    /// Keyed by canonical header name once validated.
    pub headers: HashMap<String, String>,
    pub html: String,
}

impl ReceiverSchema for EmailConfig {
    const KIND: ReceiverKind = ReceiverKind::Email;

    fn defaults() -> &'static Self {
        &defaults::EMAIL
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "to" => assign(&mut self.to, kind, "to", value)?,
            "from" => assign(&mut self.from, kind, "from", value)?,
            "smarthost" => assign(&mut self.smarthost, kind, "smarthost", value)?,
            "headers" => assign(&mut self.headers, kind, "headers", value)?,
            "html" => assign(&mut self.html, kind, "html", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(mut self) -> Result<Self, ReceiverError> {
        require(Self::KIND, "to", &self.to)?;
        self.headers = normalize_headers(&self.headers, &self.to, &self.from)?;
        Ok(self)
    }
}

/// Message formats accepted by Hipchat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    Html,
    Text,
}

impl MessageFormat {
    pub const ALLOWED: &'static [&'static str] = &["html", "text"];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageFormat::Html => "html",
            MessageFormat::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "html" => Some(MessageFormat::Html),
            "text" => Some(MessageFormat::Text),
            _ => None,
        }
    }
}

/// Configuration for Hipchat room notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HipchatConfig {
    pub auth_token: SecretString,
    pub room_id: i64,
    /// Message color.
    pub color: String,
    /// Whether the message triggers a user notification.
    pub notify: bool,
    /// Put in front of the message (useful for @mentions).
    pub prefix: String,
    pub message_format: MessageFormat,
    /// A `message_format` outside [`MessageFormat::ALLOWED`], kept until
    /// validation reports it.
    #[serde(skip)]
    pub(super) rejected_format: Option<String>,
}

impl ReceiverSchema for HipchatConfig {
    const KIND: ReceiverKind = ReceiverKind::Hipchat;

    fn defaults() -> &'static Self {
        &defaults::HIPCHAT
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "auth_token" => assign(&mut self.auth_token, kind, "auth_token", value)?,
            "room_id" => assign(&mut self.room_id, kind, "room_id", value)?,
            "color" => assign(&mut self.color, kind, "color", value)?,
            "notify" => assign(&mut self.notify, kind, "notify", value)?,
            "prefix" => assign(&mut self.prefix, kind, "prefix", value)?,
            "message_format" => {
                let mut raw = self.message_format.as_str().to_string();
                assign(&mut raw, kind, "message_format", value)?;
                match MessageFormat::parse(&raw) {
                    Some(format) => {
                        self.message_format = format;
                        self.rejected_format = None;
                    }
                    None => self.rejected_format = Some(raw),
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(mut self) -> Result<Self, ReceiverError> {
        require_secret(Self::KIND, "auth_token", &self.auth_token)?;
        if let Some(value) = self.rejected_format.take() {
            return Err(ReceiverError::InvalidValue {
                kind: Self::KIND,
                field: "message_format",
                value,
                allowed: MessageFormat::ALLOWED,
            });
        }
        Ok(self)
    }
}

/// Configuration for PagerDuty incidents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PagerdutyConfig {
    pub service_key: SecretString,
    pub url: String,
    pub client: String,
    pub client_url: String,
    pub description: String,
    pub details: HashMap<String, String>,
}

impl ReceiverSchema for PagerdutyConfig {
    const KIND: ReceiverKind = ReceiverKind::Pagerduty;

    fn defaults() -> &'static Self {
        &defaults::PAGERDUTY
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "service_key" => assign(&mut self.service_key, kind, "service_key", value)?,
            "url" => assign(&mut self.url, kind, "url", value)?,
            "client" => assign(&mut self.client, kind, "client", value)?,
            "client_url" => assign(&mut self.client_url, kind, "client_url", value)?,
            "description" => assign(&mut self.description, kind, "description", value)?,
            "details" => assign(&mut self.details, kind, "details", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require_secret(Self::KIND, "service_key", &self.service_key)?;
        Ok(self)
    }
}

/// Configuration for Pushover notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushoverConfig {
    pub token: SecretString,
    pub user_key: SecretString,
}

impl ReceiverSchema for PushoverConfig {
    const KIND: ReceiverKind = ReceiverKind::Pushover;

    fn defaults() -> &'static Self {
        &defaults::PUSHOVER
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "token" => assign(&mut self.token, kind, "token", value)?,
            "user_key" => assign(&mut self.user_key, kind, "user_key", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require_secret(Self::KIND, "token", &self.token)?;
        require_secret(Self::KIND, "user_key", &self.user_key)?;
        Ok(self)
    }
}

/// Configuration for Slack messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlackConfig {
    pub url: String,
    /// Channel override, like `#other-channel` or `@username`.
    pub channel: String,
    pub username: String,
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub pretext: String,
    pub text: String,
    pub fallback: String,
}

impl ReceiverSchema for SlackConfig {
    const KIND: ReceiverKind = ReceiverKind::Slack;

    fn defaults() -> &'static Self {
        &defaults::SLACK
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "url" => assign(&mut self.url, kind, "url", value)?,
            "channel" => assign(&mut self.channel, kind, "channel", value)?,
            "username" => assign(&mut self.username, kind, "username", value)?,
            "color" => assign(&mut self.color, kind, "color", value)?,
            "title" => assign(&mut self.title, kind, "title", value)?,
            "title_link" => assign(&mut self.title_link, kind, "title_link", value)?,
            "pretext" => assign(&mut self.pretext, kind, "pretext", value)?,
            "text" => assign(&mut self.text, kind, "text", value)?,
            "fallback" => assign(&mut self.fallback, kind, "fallback", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require(Self::KIND, "channel", &self.channel)?;
        Ok(self)
    }
}

/// Configuration for a generic webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookConfig {
    /// URL to send the POST request to.
    pub url: String,
}

impl ReceiverSchema for WebhookConfig {
    const KIND: ReceiverKind = ReceiverKind::Webhook;

    fn defaults() -> &'static Self {
        &defaults::WEBHOOK
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        match field {
            "url" => assign(&mut self.url, Self::KIND, "url", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require(Self::KIND, "url", &self.url)?;
        Ok(self)
    }
}

/// Configuration for OpsGenie alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpsGenieConfig {
    pub api_key: SecretString,
    pub api_host: String,
    pub description: String,
    pub source: String,
    pub details: HashMap<String, String>,
}

impl ReceiverSchema for OpsGenieConfig {
    const KIND: ReceiverKind = ReceiverKind::OpsGenie;

    fn defaults() -> &'static Self {
        &defaults::OPSGENIE
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "api_key" => assign(&mut self.api_key, kind, "api_key", value)?,
            "api_host" => assign(&mut self.api_host, kind, "api_host", value)?,
            "description" => assign(&mut self.description, kind, "description", value)?,
            "source" => assign(&mut self.source, kind, "source", value)?,
            "details" => assign(&mut self.details, kind, "details", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require_secret(Self::KIND, "api_key", &self.api_key)?;
        Ok(self)
    }
}

/// Configuration for Flowdock messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowdockConfig {
    /// Flow API token.
    pub api_token: SecretString,
    pub from_address: String,
    pub tags: Vec<String>,
}

impl ReceiverSchema for FlowdockConfig {
    const KIND: ReceiverKind = ReceiverKind::Flowdock;

    fn defaults() -> &'static Self {
        &defaults::FLOWDOCK
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<bool, ReceiverError> {
        let kind = Self::KIND;
        match field {
            "api_token" => assign(&mut self.api_token, kind, "api_token", value)?,
            "from_address" => assign(&mut self.from_address, kind, "from_address", value)?,
            "tags" => assign(&mut self.tags, kind, "tags", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(self) -> Result<Self, ReceiverError> {
        require_secret(Self::KIND, "api_token", &self.api_token)?;
        require(Self::KIND, "from_address", &self.from_address)?;
        Ok(self)
    }
}
