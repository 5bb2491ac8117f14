use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::warn;

use super::field::{FieldDescriptor, FieldValue, HandleRef};
use crate::core::LlmError;

/// Field values after defaults and validation, in descriptor order.
#[derive(Debug, Default)]
pub struct ResolvedConfig {
    values: Vec<(String, FieldValue)>,
}

impl ResolvedConfig {
    /// Resolve `values` against `fields`, filling in defaults for anything
    /// not supplied. Keys without a descriptor are ignored.
    pub fn resolve(
        fields: &[FieldDescriptor],
        values: &Map<String, Value>,
    ) -> Result<Self, LlmError> {
        for key in values.keys() {
            if !fields.iter().any(|field| &field.name == key) {
                warn!(field = %key, "Ignoring value for unknown field");
            }
        }

        let values = fields
            .iter()
            .map(|field| {
                let raw = values.get(&field.name).unwrap_or(&field.value);
                field
                    .coerce(raw)
                    .map(|value| (field.name.clone(), value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    pub fn defaults(fields: &[FieldDescriptor]) -> Result<Self, LlmError> {
        Self::resolve(fields, &Map::new())
    }

    /// Set a value directly, without checking it against any descriptor.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.values.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    fn require(&self, name: &str) -> Result<&FieldValue, LlmError> {
        self.get(name)
            .ok_or_else(|| LlmError::invalid_field(name, "missing"))
    }

    pub fn int(&self, name: &str) -> Result<i64, LlmError> {
        match self.require(name)? {
            FieldValue::Int(n) => Ok(*n),
            other => Err(mistyped(name, "an integer", other)),
        }
    }

    /// Floats also accept integer values.
    pub fn float(&self, name: &str) -> Result<f64, LlmError> {
        match self.require(name)? {
            FieldValue::Float(f) => Ok(*f),
            FieldValue::Int(n) => Ok(*n as f64),
            other => Err(mistyped(name, "a number", other)),
        }
    }

    pub fn str(&self, name: &str) -> Result<&str, LlmError> {
        match self.require(name)? {
            FieldValue::Str(s) => Ok(s),
            other => Err(mistyped(name, "a string", other)),
        }
    }

    pub fn secret(&self, name: &str) -> Result<&SecretString, LlmError> {
        match self.require(name)? {
            FieldValue::Secret(secret) => Ok(secret),
            other => Err(mistyped(name, "a secret", other)),
        }
    }

    pub fn handle(&self, name: &str) -> Result<Option<&HandleRef>, LlmError> {
        match self.require(name)? {
            FieldValue::Handle(handle) => Ok(handle.as_ref()),
            other => Err(mistyped(name, "a handle", other)),
        }
    }
}

fn mistyped(name: &str, expected: &str, actual: &FieldValue) -> LlmError {
    let actual = match actual {
        FieldValue::Int(_) => "integer",
        FieldValue::Float(_) => "float",
        FieldValue::Str(_) => "string",
        FieldValue::Secret(_) => "secret",
        FieldValue::Handle(_) => "handle",
    };
    LlmError::invalid_field(name, format!("expected {expected}, found {actual}"))
}
