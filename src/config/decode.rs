//! Strict-schema decoding of receiver blocks.
//!
//! A block is bound onto a seed value (the variant's defaults) one key at a
//! time. Keys the variant knows are coerced into their typed field; every
//! other key is kept, untouched, in the residual mapping of the result.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

use super::receivers::ReceiverSchema;
use super::secret::SecretString;
use crate::config::ReceiverKind;
use crate::error::ReceiverError;

/// A block bound onto its variant, plus the keys the variant does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    /// Unknown keys with their raw values, in document order.
    pub residual: Mapping,
}

/// Field types a receiver block can hold, with the name used in type errors.
pub trait FieldType: DeserializeOwned {
    const EXPECTED: &'static str;

    /// Rewrites the raw value before it is deserialized.
    fn prepare(value: Value) -> Value {
        value
    }
}

/// Plain numbers and booleans become their text; anything else is unchanged.
fn scalar_text(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other,
    }
}

impl FieldType for String {
    const EXPECTED: &'static str = "string";

    fn prepare(value: Value) -> Value {
        scalar_text(value)
    }
}

impl FieldType for SecretString {
    const EXPECTED: &'static str = "string";

    fn prepare(value: Value) -> Value {
        scalar_text(value)
    }
}

impl FieldType for i64 {
    const EXPECTED: &'static str = "integer";
}

impl FieldType for bool {
    const EXPECTED: &'static str = "boolean";
}

impl FieldType for Vec<String> {
    const EXPECTED: &'static str = "sequence of strings";

    fn prepare(value: Value) -> Value {
        match value {
            Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(scalar_text).collect())
            }
            other => other,
        }
    }
}

impl FieldType for HashMap<String, String> {
    const EXPECTED: &'static str = "mapping of string to string";

    fn prepare(value: Value) -> Value {
        match value {
            Value::Mapping(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (scalar_text(k), scalar_text(v)))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Overlays `value` onto `slot`. A YAML `null` keeps the current value.
pub(crate) fn assign<T: FieldType>(
    slot: &mut T,
    kind: ReceiverKind,
    field: &'static str,
    value: Value,
) -> Result<(), ReceiverError> {
    if value.is_null() {
        return Ok(());
    }
    *slot = serde_yaml::from_value(T::prepare(value)).map_err(|e| ReceiverError::InvalidType {
        kind,
        field,
        expected: T::EXPECTED,
        message: e.to_string(),
    })?;
    Ok(())
}

/// Binds `node` onto `seed`.
///
/// # Errors
/// Returns [`ReceiverError::InvalidBlock`] if `node` is not a mapping and
/// [`ReceiverError::InvalidType`] for the first field that fails coercion.
pub fn decode<T: ReceiverSchema>(node: &Value, seed: T) -> Result<Decoded<T>, ReceiverError> {
    let Value::Mapping(mapping) = node else {
        return Err(ReceiverError::InvalidBlock {
            kind: T::KIND,
            found: value_type_name(node).to_string(),
        });
    };

    let mut value = seed;
    let mut residual = Mapping::new();
    for (key, raw) in mapping {
        let consumed = match key.as_str() {
            Some(field) => value.set_field(field, raw.clone())?,
            None => false,
        };
        if !consumed {
            residual.insert(key.clone(), raw.clone());
        }
    }

    Ok(Decoded { value, residual })
}

/// Names of the residual keys, as they appeared in the document.
pub fn residual_keys(residual: &Mapping) -> Vec<String> {
    residual.keys().map(key_name).collect()
}

pub(crate) fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
