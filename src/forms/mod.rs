//! The concrete course forms: material upload, plan and subscription.

mod material;
mod plan;
mod subscription;

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::FormSchema,
    form::{FieldCoercionError, FileUpload, FormState},
    submit::PayloadContract,
};

pub use material::{FilePart, FormPart, MATERIAL_FORMATS, MaterialForm, MultipartForm, PartBody};
pub use plan::{Inventory, InventoryKind, PlanForm, PlanPayload, Price};
pub use subscription::{SubscriptionForm, SubscriptionKind, SubscriptionPayload};

/// A form: its schema, how field values become a request payload, and the
/// alert texts shown after submitting.
pub trait CourseForm {
    type Payload: Serialize + Send + 'static;

    fn schema(&self) -> FormSchema;

    fn build_payload(&self, state: &FormState) -> Result<Self::Payload, FieldCoercionError>;

    fn success_text(&self) -> &str;

    fn error_text(&self) -> &str;

    fn payload_contract(&self) -> Option<PayloadContract> {
        None
    }
}

/// Interval unit shared by plan and subscription recurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceUnit {
    pub const OPTIONS: [&'static str; 4] = ["day", "week", "month", "year"];
}

impl FromStr for RecurrenceUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(RecurrenceUnit::Day),
            "week" => Ok(RecurrenceUnit::Week),
            "month" => Ok(RecurrenceUnit::Month),
            "year" => Ok(RecurrenceUnit::Year),
            other => Err(format!("unknown recurrence unit '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recurring {
    #[schemars(range(min = 0))]
    pub interval: i64,
    #[serde(rename = "type")]
    pub unit: RecurrenceUnit,
}

pub(crate) fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(crate) fn text(state: &FormState, name: &str) -> Result<String, FieldCoercionError> {
    Ok(match state.visible_value(name)? {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => String::new(),
    })
}

pub(crate) fn required_text(state: &FormState, name: &str) -> Result<String, FieldCoercionError> {
    let value = text(state, name)?;
    if value.trim().is_empty() {
        return Err(FieldCoercionError::new(name, "value is required"));
    }
    Ok(value)
}

pub(crate) fn integer(state: &FormState, name: &str) -> Result<Option<i64>, FieldCoercionError> {
    match state.visible_value(name)? {
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| FieldCoercionError::new(name, "expected integer")),
        None => Ok(None),
    }
}

pub(crate) fn choice<T>(state: &FormState, name: &str) -> Result<T, FieldCoercionError>
where
    T: FromStr<Err = String>,
{
    let raw = required_text(state, name)?;
    raw.parse::<T>()
        .map_err(|message| FieldCoercionError::new(name, message))
}

pub(crate) fn file(state: &FormState, name: &str) -> Result<FileUpload, FieldCoercionError> {
    if !state.is_visible(name) {
        return Err(FieldCoercionError::new(name, "field is hidden"));
    }
    state
        .field(name)
        .and_then(|field| field.file())
        .cloned()
        .ok_or_else(|| FieldCoercionError::new(name, "no file selected"))
}

pub(crate) fn contract_for<P: JsonSchema>() -> Option<PayloadContract> {
    PayloadContract::for_type::<P>()
        .inspect_err(|err| tracing::warn!(error = %err, "payload contract unavailable"))
        .ok()
}
