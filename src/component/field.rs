//! Field descriptors: the metadata a host renders as a settings form.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::core::LlmError;

/// Value type and constraints of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Int,
    Float,
    /// One of a fixed list of strings.
    Dropdown { options: Vec<String> },
    /// Masked string input, never echoed back.
    SecretStr,
    /// Reference to another component's output of one of `input_types`.
    Handle { input_types: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Default value, as the host would show it.
    pub value: Value,
    pub advanced: bool,
    pub password: bool,
}

impl FieldDescriptor {
    fn new(name: &str, display_name: &str, kind: FieldKind, value: Value) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            info: None,
            kind,
            value,
            advanced: false,
            password: false,
        }
    }

    pub fn int(name: &str, display_name: &str, default: i64) -> Self {
        Self::new(name, display_name, FieldKind::Int, Value::from(default))
    }

    pub fn float(name: &str, display_name: &str, default: f64) -> Self {
        Self::new(name, display_name, FieldKind::Float, Value::from(default))
    }

    pub fn dropdown(name: &str, display_name: &str, options: &[&str], default: &str) -> Self {
        let options = options.iter().map(|option| option.to_string()).collect();
        Self::new(
            name,
            display_name,
            FieldKind::Dropdown { options },
            Value::from(default),
        )
    }

    pub fn secret(name: &str, display_name: &str) -> Self {
        Self {
            password: true,
            ..Self::new(name, display_name, FieldKind::SecretStr, Value::from(""))
        }
    }

    pub fn handle(name: &str, display_name: &str, input_types: &[&str]) -> Self {
        let input_types = input_types.iter().map(|ty| ty.to_string()).collect();
        Self::new(
            name,
            display_name,
            FieldKind::Handle { input_types },
            Value::Null,
        )
    }

    pub fn info(mut self, info: &str) -> Self {
        self.info = Some(info.to_string());
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    /// Check `value` against this field's kind and convert it.
    pub fn coerce(&self, value: &Value) -> Result<FieldValue, LlmError> {
        let invalid = |reason: String| LlmError::invalid_field(&self.name, reason);

        match &self.kind {
            FieldKind::Int => match value.as_i64() {
                Some(n) => Ok(FieldValue::Int(n)),
                None => match value.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(FieldValue::Int(f as i64))
                    }
                    _ => Err(invalid(format!("expected an integer, got {value}"))),
                },
            },
            FieldKind::Float => value
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| invalid(format!("expected a number, got {value}"))),
            FieldKind::Dropdown { options } => {
                let choice = value
                    .as_str()
                    .ok_or_else(|| invalid(format!("expected a string, got {value}")))?;
                if options.iter().any(|option| option == choice) {
                    Ok(FieldValue::Str(choice.to_string()))
                } else {
                    Err(invalid(format!(
                        "'{choice}' is not one of: {}",
                        options.join(", ")
                    )))
                }
            }
            FieldKind::SecretStr => value
                .as_str()
                .map(|s| FieldValue::Secret(SecretString::from(s.to_owned())))
                // don't echo what might be a credential
                .ok_or_else(|| invalid("expected a string".to_string())),
            FieldKind::Handle { .. } => match value {
                Value::Null => Ok(FieldValue::Handle(None)),
                Value::String(id) => Ok(FieldValue::Handle(Some(HandleRef { id: id.clone() }))),
                other => Err(invalid(format!(
                    "expected a reference id or null, got {other}"
                ))),
            },
        }
    }
}

/// Identifier of the upstream output wired into a handle field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleRef {
    pub id: String,
}

/// A resolved, type-checked field value.
#[derive(Debug)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
    Secret(SecretString),
    Handle(Option<HandleRef>),
}

impl FieldValue {
    pub fn is_empty_secret(&self) -> bool {
        matches!(self, FieldValue::Secret(secret) if secret.expose_secret().is_empty())
    }
}
