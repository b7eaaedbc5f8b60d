//! Receiver definitions and document loading.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::decode::{key_name, value_type_name};
use super::receivers::{ReceiverConfig, ReceiverKind};
use crate::error::ConfigError;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/alertmanager/alertmanager.yml";

/// Top-level sections read by other components. Accepted and skipped here.
const FOREIGN_SECTIONS: &[&str] = &["global", "route", "inhibit_rules", "templates"];

/// All receivers of a configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub receivers: Vec<Receiver>,
}

/// A named receiver with its validated integration blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    pub name: String,
    /// Blocks in document order.
    pub configs: Vec<ReceiverConfig>,
}

impl Receiver {
    /// Decodes a receiver definition.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationError`] for a malformed definition
    /// and [`ConfigError::InvalidReceiver`] for the first invalid block.
    pub fn from_value(node: &Value) -> Result<Self, ConfigError> {
        let Value::Mapping(mapping) = node else {
            return Err(ConfigError::ValidationError(format!(
                "receiver definition must be a mapping, found {}",
                value_type_name(node)
            )));
        };

        let name = match mapping.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(ConfigError::ValidationError(
                    "missing name in receiver definition".to_string(),
                ));
            }
            Some(other) => {
                return Err(ConfigError::ValidationError(format!(
                    "receiver name must be a string, found {}",
                    value_type_name(other)
                )));
            }
        };

        let mut configs = Vec::new();
        for (key, blocks) in mapping {
            let key = key_name(key);
            if key == "name" {
                continue;
            }
            let Some(kind) = ReceiverKind::from_block_key(&key) else {
                return Err(ConfigError::ValidationError(format!(
                    "receiver '{}': unknown field '{}'",
                    name, key
                )));
            };
            for (index, block) in block_list(&name, kind, blocks)?.iter().enumerate() {
                let config = ReceiverConfig::decode(kind, block).map_err(|source| {
                    ConfigError::InvalidReceiver {
                        receiver: name.clone(),
                        kind,
                        index,
                        source,
                    }
                })?;
                debug!(receiver = %name, kind = %kind, index, "Decoded receiver block");
                configs.push(config);
            }
        }

        Ok(Receiver { name, configs })
    }

    /// Blocks of the given kind, in document order.
    pub fn configs_of(&self, kind: ReceiverKind) -> impl Iterator<Item = &ReceiverConfig> {
        self.configs.iter().filter(move |config| config.kind() == kind)
    }
}

fn block_list<'a>(
    receiver: &str,
    kind: ReceiverKind,
    blocks: &'a Value,
) -> Result<&'a [Value], ConfigError> {
    match blocks {
        Value::Sequence(blocks) => Ok(blocks),
        Value::Null => Ok(&[]),
        other => Err(ConfigError::ValidationError(format!(
            "receiver '{}': {} must be a list, found {}",
            receiver,
            kind.block_key(),
            value_type_name(other)
        ))),
    }
}

impl Serialize for Receiver {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let kinds: Vec<ReceiverKind> = ReceiverKind::ALL
            .into_iter()
            .filter(|kind| self.configs_of(*kind).next().is_some())
            .collect();

        let mut map = serializer.serialize_map(Some(kinds.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for kind in kinds {
            let blocks: Vec<&ReceiverConfig> = self.configs_of(kind).collect();
            map.serialize_entry(kind.block_key(), &blocks)?;
        }
        map.end()
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// # Errors
    /// Returns [`ConfigError::LoadError`] if the file cannot be read, and
    /// any error of [`Config::from_yaml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationError`] if the YAML is invalid, and
    /// any error of [`Config::from_value`].
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Self::from_value(&document)
    }

    /// Validate an already-parsed document.
    ///
    /// Stops at the first invalid receiver; nothing is returned for a
    /// document with any error.
    pub fn from_value(document: &Value) -> Result<Self, ConfigError> {
        let root = document_root(document)?;

        let mut receivers = Vec::new();
        for (key, section) in root {
            let key = key_name(key);
            match key.as_str() {
                "receivers" => receivers = decode_receivers(section)?,
                foreign if FOREIGN_SECTIONS.contains(&foreign) => {
                    debug!(section = foreign, "Skipping section");
                }
                _ => {
                    return Err(ConfigError::ValidationError(format!(
                        "unknown top-level field '{}'",
                        key
                    )));
                }
            }
        }

        let blocks: usize = receivers.iter().map(|r: &Receiver| r.configs.len()).sum();
        info!(
            receivers = receivers.len(),
            blocks, "Receiver configuration loaded"
        );

        Ok(Config { receivers })
    }

    /// Look up a receiver by name.
    pub fn receiver(&self, name: &str) -> Option<&Receiver> {
        self.receivers.iter().find(|r| r.name == name)
    }
}

fn document_root(document: &Value) -> Result<&Mapping, ConfigError> {
    match document {
        Value::Mapping(root) => Ok(root),
        other => Err(ConfigError::ValidationError(format!(
            "configuration document must be a mapping, found {}",
            value_type_name(other)
        ))),
    }
}

fn decode_receivers(section: &Value) -> Result<Vec<Receiver>, ConfigError> {
    let definitions: &[Value] = match section {
        Value::Sequence(definitions) => definitions,
        Value::Null => &[],
        other => {
            return Err(ConfigError::ValidationError(format!(
                "receivers must be a list, found {}",
                value_type_name(other)
            )));
        }
    };

    let mut seen = HashSet::new();
    let mut receivers = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let receiver = Receiver::from_value(definition)?;
        if !seen.insert(receiver.name.clone()) {
            return Err(ConfigError::ValidationError(format!(
                "receiver '{}' is defined more than once",
                receiver.name
            )));
        }
        receivers.push(receiver);
    }
    Ok(receivers)
}
