//! Typed form schemas
//!
//! Each form is described by a declarative field table and validated
//! against it before the flow acts on the input. Coercion failures come
//! back as field-name → error-code maps and re-prompt the user.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field error code: required field missing
pub const ERROR_REQUIRED: &str = "required";
/// Field error code: value is not a string
pub const ERROR_INVALID: &str = "invalid";
/// Field error code: value is not coercible to an integer
pub const ERROR_INVALID_INT: &str = "invalid_int";

/// Type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Str,
    Int,
}

/// Form field schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FormField {
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A declarative form schema: an ordered field table plus validation.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// Validate raw user input against the field table.
    ///
    /// Returns the validated (coerced) values on success, or a map of
    /// field name to error code when any field fails. Unknown input keys
    /// are passed through untouched - the options flow relies on this for
    /// its merge semantics.
    pub fn validate(
        &self,
        input: &HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>, HashMap<String, String>> {
        let mut validated: HashMap<String, Value> = input.clone();
        let mut errors: HashMap<String, String> = HashMap::new();

        for field in &self.fields {
            let value = input.get(&field.name);

            let value = match value {
                Some(v) if !v.is_null() => v,
                _ => {
                    if field.required {
                        errors.insert(field.name.clone(), ERROR_REQUIRED.to_string());
                    }
                    continue;
                }
            };

            match field.field_type {
                FieldType::Str => {
                    if !value.is_string() {
                        errors.insert(field.name.clone(), ERROR_INVALID.to_string());
                    }
                }
                FieldType::Int => match coerce_int(value) {
                    Some(n) => {
                        validated.insert(field.name.clone(), Value::from(n));
                    }
                    None => {
                        errors.insert(field.name.clone(), ERROR_INVALID_INT.to_string());
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

/// Coerce a JSON value to an integer: integers pass through, strings are
/// parsed. Anything else fails.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
