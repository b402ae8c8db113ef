use serde_json::Value;

use crate::domain::FieldSchema;

use crate::form::error::FieldCoercionError;

pub const INTEGER_MESSAGE: &str = "Deve ser um número inteiro";
pub const AMOUNT_MESSAGE: &str = "Valor inválido";

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub(crate) fn integer_value(
    contents: &str,
    schema: &FieldSchema,
) -> Result<Option<Value>, FieldCoercionError> {
    parse_integer(contents, schema).map(|parsed| parsed.map(Value::from))
}

pub(crate) fn parse_integer(
    contents: &str,
    schema: &FieldSchema,
) -> Result<Option<i64>, FieldCoercionError> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FieldCoercionError::new(schema.name.clone(), INTEGER_MESSAGE))
}
