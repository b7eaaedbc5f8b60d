//! Default values for every receiver variant.
//!
//! The canonical defaults are built once and only handed out by shared
//! reference. Decoding clones them before overlaying supplied fields.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::receivers::{
    EmailConfig, FlowdockConfig, HipchatConfig, MessageFormat, OpsGenieConfig, PagerdutyConfig,
    PushoverConfig, ReceiverConfig, ReceiverKind, SlackConfig, WebhookConfig,
};

/// Default `Subject` header of an email.
pub const DEFAULT_EMAIL_SUBJECT: &str = r#"{{ template "email.default.subject" . }}"#;

pub(crate) static EMAIL: LazyLock<EmailConfig> = LazyLock::new(|| EmailConfig {
    html: r#"{{ template "email.default.html" . }}"#.to_string(),
    ..Default::default()
});

pub(crate) static HIPCHAT: LazyLock<HipchatConfig> = LazyLock::new(|| HipchatConfig {
    color: r#"{{ if eq .Status "firing" }}purple{{ else }}green{{ end }}"#.to_string(),
    message_format: MessageFormat::Html,
    ..Default::default()
});

pub(crate) static PAGERDUTY: LazyLock<PagerdutyConfig> = LazyLock::new(|| PagerdutyConfig {
    description: r#"{{ template "pagerduty.default.description" .}}"#.to_string(),
    client: r#"{{ template "pagerduty.default.client" . }}"#.to_string(),
    client_url: r#"{{ template "pagerduty.default.clientURL" . }}"#.to_string(),
    details: HashMap::from([
        (
            "firing".to_string(),
            r#"{{ template "pagerduty.default.instances" (.Alerts | firing) }}"#.to_string(),
        ),
        (
            "resolved".to_string(),
            r#"{{ template "pagerduty.default.instances" (.Alerts | resolved) }}"#.to_string(),
        ),
        (
            "num_firing".to_string(),
            "{{ .Alerts | firing | len }}".to_string(),
        ),
        (
            "num_resolved".to_string(),
            "{{ .Alerts | resolved | len }}".to_string(),
        ),
    ]),
    ..Default::default()
});

pub(crate) static SLACK: LazyLock<SlackConfig> = LazyLock::new(|| SlackConfig {
    color: r#"{{ if eq .Status "firing" }}danger{{ else }}good{{ end }}"#.to_string(),
    username: r#"{{ template "slack.default.username" . }}"#.to_string(),
    title: r#"{{ template "slack.default.title" . }}"#.to_string(),
    title_link: r#"{{ template "slack.default.titlelink" . }}"#.to_string(),
    pretext: r#"{{ template "slack.default.pretext" . }}"#.to_string(),
    text: r#"{{ template "slack.default.text" . }}"#.to_string(),
    fallback: r#"{{ template "slack.default.fallback" . }}"#.to_string(),
    ..Default::default()
});

pub(crate) static OPSGENIE: LazyLock<OpsGenieConfig> = LazyLock::new(|| OpsGenieConfig {
    description: r#"{{ template "opsgenie.default.description" . }}"#.to_string(),
    source: r#"{{ template "opsgenie.default.source" . }}"#.to_string(),
    ..Default::default()
});

pub(crate) static PUSHOVER: LazyLock<PushoverConfig> = LazyLock::new(PushoverConfig::default);

pub(crate) static WEBHOOK: LazyLock<WebhookConfig> = LazyLock::new(WebhookConfig::default);

pub(crate) static FLOWDOCK: LazyLock<FlowdockConfig> = LazyLock::new(FlowdockConfig::default);

/// Returns a private copy of the default value for `kind`.
pub fn defaults_for(kind: ReceiverKind) -> ReceiverConfig {
    match kind {
        ReceiverKind::Email => ReceiverConfig::Email(EMAIL.clone()),
        ReceiverKind::Pagerduty => ReceiverConfig::Pagerduty(PAGERDUTY.clone()),
        ReceiverKind::Hipchat => ReceiverConfig::Hipchat(HIPCHAT.clone()),
        ReceiverKind::Slack => ReceiverConfig::Slack(SLACK.clone()),
        ReceiverKind::Webhook => ReceiverConfig::Webhook(WEBHOOK.clone()),
        ReceiverKind::OpsGenie => ReceiverConfig::OpsGenie(OPSGENIE.clone()),
        ReceiverKind::Pushover => ReceiverConfig::Pushover(PUSHOVER.clone()),
        ReceiverKind::Flowdock => ReceiverConfig::Flowdock(FLOWDOCK.clone()),
    }
}
