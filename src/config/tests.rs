//! Integration tests for Config loading and receiver validation.

use super::*;
use crate::error::{ConfigError, ReceiverError};
use serde_yaml::Value;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_error(name: &str) -> ConfigError {
    match Config::load(&fixture_path(name)) {
        Ok(_) => panic!("{} should be rejected", name),
        Err(e) => e,
    }
}

fn receiver_error(err: ConfigError) -> (String, ReceiverKind, usize, ReceiverError) {
    match err {
        ConfigError::InvalidReceiver {
            receiver,
            kind,
            index,
            source,
        } => (receiver, kind, index, source),
        e => panic!("Expected InvalidReceiver, got {:?}", e),
    }
}

// ============================================================
// Config Loading Tests
// ============================================================

#[test]
fn load_valid_config() {
    let config = Config::load(&fixture_path("receivers_valid.yaml")).unwrap();
    assert_eq!(config.receivers.len(), 4);

    let ops = config.receiver("team-ops").unwrap();
    assert_eq!(ops.configs.len(), 3);
    assert_eq!(ops.configs_of(ReceiverKind::Email).count(), 2);
    assert_eq!(ops.configs_of(ReceiverKind::Pagerduty).count(), 1);

    let chat = config.receiver("team-chat").unwrap();
    let hipchat = chat.configs_of(ReceiverKind::Hipchat).next().unwrap();
    match hipchat {
        ReceiverConfig::Hipchat(cfg) => {
            assert_eq!(cfg.room_id, 4242);
            assert!(cfg.notify);
            assert_eq!(cfg.message_format, MessageFormat::Text);
        }
        _ => panic!("Expected Hipchat variant"),
    }

    let mobile = config.receiver("team-mobile").unwrap();
    match mobile.configs_of(ReceiverKind::Flowdock).next().unwrap() {
        ReceiverConfig::Flowdock(cfg) => assert_eq!(cfg.tags, vec!["prod", "paging"]),
        _ => panic!("Expected Flowdock variant"),
    }

    let blackhole = config.receiver("blackhole").unwrap();
    assert!(blackhole.configs.is_empty());
}

#[test]
fn load_valid_config_normalizes_email_headers() {
    let config = Config::load(&fixture_path("receivers_valid.yaml")).unwrap();
    let ops = config.receiver("team-ops").unwrap();
    let emails: Vec<&EmailConfig> = ops
        .configs_of(ReceiverKind::Email)
        .map(|c| match c {
            ReceiverConfig::Email(cfg) => cfg,
            _ => panic!("Expected Email variant"),
        })
        .collect();

    assert_eq!(emails[0].headers["X-Team"], "ops");
    assert_eq!(emails[0].headers["To"], "ops@example.com");
    assert_eq!(emails[0].headers["From"], "alertmanager@example.com");
    assert_eq!(emails[0].headers["Subject"], DEFAULT_EMAIL_SUBJECT);

    assert_eq!(emails[1].headers["Subject"], "[ops] paging");
    assert_eq!(emails[1].headers["From"], "");
}

#[test]
fn load_nonexistent_file_returns_load_error() {
    let result = Config::load(std::path::Path::new("/nonexistent/path/alertmanager.yml"));
    match result.unwrap_err() {
        ConfigError::LoadError(msg) => {
            assert!(msg.contains("/nonexistent/path/alertmanager.yml"));
        }
        e => panic!("Expected LoadError, got {:?}", e),
    }
}

#[test]
fn load_invalid_yaml_returns_validation_error() {
    match load_error("receivers_invalid_yaml.yaml") {
        ConfigError::ValidationError(_) => {}
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn config_example_yaml_is_valid() {
    let example_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("config.example.yaml");

    let config = Config::load(&example_path).expect("config.example.yaml should be valid");
    assert_eq!(config.receivers.len(), 3);
    let kinds: usize = ReceiverKind::ALL
        .into_iter()
        .filter(|kind| config.receivers.iter().any(|r| r.configs_of(*kind).next().is_some()))
        .count();
    assert_eq!(kinds, ReceiverKind::ALL.len(), "example should show every integration");
}

#[test]
fn default_config_path_is_correct() {
    assert_eq!(DEFAULT_CONFIG_PATH, "/etc/alertmanager/alertmanager.yml");
}

// ============================================================
// Receiver Error Tests
// ============================================================

#[test]
fn unknown_field_is_located() {
    let (receiver, kind, index, source) =
        receiver_error(load_error("receivers_unknown_field.yaml"));
    assert_eq!(receiver, "team-web");
    assert_eq!(kind, ReceiverKind::Webhook);
    assert_eq!(index, 0);
    assert_eq!(
        source,
        ReceiverError::UnrecognizedFields {
            kind: ReceiverKind::Webhook,
            keys: vec!["send_resolvd".to_string()],
        }
    );
}

#[test]
fn missing_required_field_rejects_the_whole_document() {
    let (receiver, kind, _, source) =
        receiver_error(load_error("receivers_missing_required.yaml"));
    assert_eq!(receiver, "team-pager");
    assert_eq!(kind, ReceiverKind::Pushover);
    assert_eq!(
        source,
        ReceiverError::MissingField {
            kind: ReceiverKind::Pushover,
            field: "user_key",
        }
    );
}

#[test]
fn duplicate_header_is_reported() {
    let (_, _, _, source) = receiver_error(load_error("receivers_duplicate_header.yaml"));
    assert_eq!(
        source,
        ReceiverError::DuplicateHeader {
            name: "Content-Type".to_string()
        }
    );
}

#[test]
fn invalid_message_format_is_reported() {
    let err = load_error("receivers_invalid_format.yaml");
    assert!(err.to_string().contains("markdown"));
    let (_, _, _, source) = receiver_error(err);
    assert!(matches!(
        source,
        ReceiverError::InvalidValue {
            field: "message_format",
            ..
        }
    ));
}

#[test]
fn wrong_field_type_is_reported() {
    let (_, _, _, source) = receiver_error(load_error("receivers_wrong_type.yaml"));
    assert!(matches!(
        source,
        ReceiverError::InvalidType {
            kind: ReceiverKind::Hipchat,
            field: "room_id",
            ..
        }
    ));
}

#[test]
fn error_index_points_at_failing_block() {
    let yaml = r#"
        receivers:
          - name: web
            webhook_configs:
              - url: http://a
              - url: http://b
              - url: ""
    "#;
    let (_, _, index, _) = receiver_error(Config::from_yaml(yaml).unwrap_err());
    assert_eq!(index, 2);
}

// ============================================================
// Document Structure Tests
// ============================================================

#[test]
fn duplicate_receiver_name_is_rejected() {
    match load_error("receivers_duplicate_name.yaml") {
        ConfigError::ValidationError(msg) => assert!(msg.contains("team-ops")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn receiver_without_name_is_rejected() {
    let yaml = "receivers:\n  - webhook_configs:\n      - url: http://a\n";
    match Config::from_yaml(yaml).unwrap_err() {
        ConfigError::ValidationError(msg) => assert!(msg.contains("missing name")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn unknown_receiver_key_is_rejected() {
    let yaml = "receivers:\n  - name: web\n    sms_configs:\n      - to: '123'\n";
    match Config::from_yaml(yaml).unwrap_err() {
        ConfigError::ValidationError(msg) => assert!(msg.contains("sms_configs")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn block_list_must_be_a_sequence() {
    let yaml = "receivers:\n  - name: web\n    webhook_configs:\n      url: http://a\n";
    match Config::from_yaml(yaml).unwrap_err() {
        ConfigError::ValidationError(msg) => assert!(msg.contains("must be a list")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let yaml = "receivers: []\nrecievers: []\n";
    match Config::from_yaml(yaml).unwrap_err() {
        ConfigError::ValidationError(msg) => assert!(msg.contains("recievers")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

#[test]
fn foreign_sections_are_ignored() {
    let yaml = r#"
        global:
          smtp_smarthost: localhost:25
        route:
          receiver: web
        inhibit_rules: []
        templates: ['/etc/alertmanager/*.tmpl']
        receivers:
          - name: web
            webhook_configs:
              - url: http://a
    "#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.receivers.len(), 1);
}

#[test]
fn document_must_be_a_mapping() {
    match Config::from_yaml("- receivers\n").unwrap_err() {
        ConfigError::ValidationError(msg) => assert!(msg.contains("must be a mapping")),
        e => panic!("Expected ValidationError, got {:?}", e),
    }
}

// ============================================================
// Pipeline Properties
// ============================================================

#[test]
fn dumped_config_reloads_identically() {
    let config = Config::load(&fixture_path("receivers_valid.yaml")).unwrap();
    let dumped = serde_yaml::to_string(&config).unwrap();
    let reloaded = Config::from_yaml(&dumped).unwrap();

    for receiver in &config.receivers {
        let again = reloaded.receiver(&receiver.name).unwrap();
        for kind in ReceiverKind::ALL {
            let before: Vec<_> = receiver.configs_of(kind).collect();
            let after: Vec<_> = again.configs_of(kind).collect();
            assert_eq!(before, after, "{} / {} changed on reload", receiver.name, kind);
        }
    }
}

#[test]
fn defaults_for_returns_unvalidated_copies() {
    let ReceiverConfig::Hipchat(mut copy) = defaults_for(ReceiverKind::Hipchat) else {
        panic!("Expected Hipchat variant");
    };
    copy.color = "red".to_string();
    assert_ne!(HipchatConfig::defaults().color, "red");

    // The default value alone lacks the required token.
    let err = copy.validate().unwrap_err();
    assert_eq!(
        err,
        ReceiverError::MissingField {
            kind: ReceiverKind::Hipchat,
            field: "auth_token",
        }
    );
}

#[test]
fn concurrent_decodes_are_independent() {
    let defaults_before = SlackConfig::defaults().clone();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                scope.spawn(move || {
                    let yaml = format!("channel: '#team-{i}'\ncolor: color-{i}\n");
                    let node: Value = serde_yaml::from_str(&yaml).unwrap();
                    (i, decode_receiver::<SlackConfig>(&node).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (i, cfg) = handle.join().unwrap();
            assert_eq!(cfg.channel, format!("#team-{i}"));
            assert_eq!(cfg.color, format!("color-{i}"));
            assert_eq!(cfg.title, defaults_before.title);
        }
    });

    assert_eq!(SlackConfig::defaults(), &defaults_before);
}

#[test]
fn decode_exposes_residual_without_failing() {
    let node: Value = serde_yaml::from_str("url: http://a\nextra: true\n").unwrap();
    let decoded = decode(&node, WebhookConfig::default()).unwrap();
    assert_eq!(residual_keys(&decoded.residual), vec!["extra"]);
    assert_eq!(decoded.value.url, "http://a");
}
