mod convert;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{FieldKind, FieldSchema};

pub use convert::{AMOUNT_MESSAGE, INTEGER_MESSAGE};
pub(crate) use convert::{integer_value, parse_integer, value_to_string};

use super::error::FieldCoercionError;

/// A file picked by the user for upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Entity chosen in a search-select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupSelection {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Enum {
        options: Vec<String>,
        selected: usize,
    },
    File(Option<FileUpload>),
    Lookup(Option<LookupSelection>),
}

impl FieldValue {
    /// Textual view used by conditions and requiredness checks.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::Enum { options, selected } => options.get(*selected).map(String::as_str),
            FieldValue::File(file) => file.as_ref().map(|file| file.file_name.as_str()),
            FieldValue::Lookup(selection) => selection.as_ref().map(|sel| sel.id.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Enum { options, selected } => options.get(*selected).is_none(),
            FieldValue::File(file) => file.is_none(),
            FieldValue::Lookup(selection) => selection
                .as_ref()
                .is_none_or(|sel| sel.id.trim().is_empty()),
        }
    }
}

/// A write coming from the user interface.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    Choice(String),
    File(FileUpload),
    Entity { id: String, label: String },
    Clear,
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        FieldInput::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldInput::Choice(value.into())
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: FieldSchema,
    pub value: FieldValue,
    pub touched: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_schema(schema: FieldSchema) -> Self {
        let value = match &schema.kind {
            FieldKind::String | FieldKind::Integer | FieldKind::Money => {
                FieldValue::Text(default_text(&schema))
            }
            FieldKind::Enum(options) => {
                let default_value = schema
                    .default
                    .as_ref()
                    .map(value_to_string)
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| options.first().cloned().unwrap_or_default());
                let selected = options
                    .iter()
                    .position(|item| item == &default_value)
                    .unwrap_or(0);
                FieldValue::Enum {
                    options: options.clone(),
                    selected,
                }
            }
            FieldKind::File { .. } => FieldValue::File(None),
            FieldKind::Lookup => FieldValue::Lookup(None),
        };

        FieldState {
            schema,
            value,
            touched: false,
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Store `input` after coercing it for this field's kind. Does not touch.
    pub fn apply_input(&mut self, input: FieldInput) -> Result<(), FieldCoercionError> {
        let name = self.schema.name.clone();
        match (&mut self.value, input) {
            (FieldValue::Text(buffer), FieldInput::Text(text)) => {
                *buffer = match self.schema.kind {
                    FieldKind::Money => crate::money::digits_only(&text),
                    _ => text,
                };
            }
            (FieldValue::Text(buffer), FieldInput::Clear) => buffer.clear(),
            (FieldValue::Enum { options, selected }, FieldInput::Choice(choice))
            | (FieldValue::Enum { options, selected }, FieldInput::Text(choice)) => {
                let Some(position) = options.iter().position(|option| option == &choice) else {
                    return Err(FieldCoercionError::new(
                        name,
                        format!("'{choice}' is not one of: {}", options.join(", ")),
                    ));
                };
                *selected = position;
            }
            (FieldValue::File(slot), FieldInput::File(file)) => *slot = Some(file),
            (FieldValue::File(slot), FieldInput::Clear) => *slot = None,
            (FieldValue::Lookup(slot), FieldInput::Entity { id, label }) => {
                *slot = if id.trim().is_empty() {
                    None
                } else {
                    Some(LookupSelection { id, label })
                };
            }
            (FieldValue::Lookup(slot), FieldInput::Clear) => *slot = None,
            (_, other) => {
                return Err(FieldCoercionError::new(
                    name,
                    format!("input {other:?} does not fit this field"),
                ));
            }
        }
        Ok(())
    }

    /// Seed from a JSON document value (initial values, CLI input).
    pub fn seed_value(&mut self, value: &Value) -> Result<(), FieldCoercionError> {
        let input = match (&self.schema.kind, value) {
            (FieldKind::Enum(_), Value::Null) => return Ok(()),
            (_, Value::Null) => FieldInput::Clear,
            (FieldKind::File { .. }, other) => {
                let file: FileUpload = serde_json::from_value(other.clone()).map_err(|err| {
                    FieldCoercionError::new(self.schema.name.clone(), err.to_string())
                })?;
                FieldInput::File(file)
            }
            (FieldKind::Lookup, Value::Object(map)) => {
                let id = map.get("id").map(value_to_string).unwrap_or_default();
                let label = map
                    .get("label")
                    .map(value_to_string)
                    .unwrap_or_else(|| id.clone());
                FieldInput::Entity { id, label }
            }
            (FieldKind::Lookup, other) => {
                let id = value_to_string(other);
                FieldInput::Entity {
                    label: id.clone(),
                    id,
                }
            }
            (FieldKind::Enum(_), other) => FieldInput::Choice(value_to_string(other)),
            (_, other) => FieldInput::Text(value_to_string(other)),
        };
        self.apply_input(input)
    }

    /// Coerced JSON value, `None` when the field is empty.
    pub fn current_value(&self) -> Result<Option<Value>, FieldCoercionError> {
        match (&self.schema.kind, &self.value) {
            (FieldKind::Integer, FieldValue::Text(text)) => integer_value(text, &self.schema),
            (FieldKind::Money, FieldValue::Text(text)) => {
                if text.is_empty() {
                    return Ok(None);
                }
                crate::money::convert_to_amount(text)
                    .map(|amount| Some(Value::from(amount)))
                    .ok_or_else(|| {
                        FieldCoercionError::new(self.schema.name.clone(), AMOUNT_MESSAGE)
                    })
            }
            (_, FieldValue::Text(text)) => {
                if text.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(text.clone())))
                }
            }
            (_, value @ FieldValue::Enum { .. }) => {
                Ok(value.as_text().map(|text| Value::String(text.to_string())))
            }
            (_, FieldValue::File(file)) => Ok(file.as_ref().map(|file| {
                serde_json::json!({
                    "file_name": file.file_name,
                    "content_type": file.content_type,
                    "size": file.bytes.len(),
                })
            })),
            (_, FieldValue::Lookup(selection)) => Ok(selection
                .as_ref()
                .map(|selection| Value::String(selection.id.clone()))),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.value.as_text()
    }

    pub fn file(&self) -> Option<&FileUpload> {
        match &self.value {
            FieldValue::File(file) => file.as_ref(),
            _ => None,
        }
    }

    /// Error shown next to the field; gated on the field being touched.
    pub fn displayed_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }
}

fn default_text(schema: &FieldSchema) -> String {
    schema
        .default
        .as_ref()
        .map(value_to_string)
        .unwrap_or_default()
}
