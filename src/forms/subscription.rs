use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Condition, Constraint, FieldKind, FieldSchema, FormSchema},
    form::{FieldCoercionError, FormState},
    submit::PayloadContract,
};

use super::{
    CourseForm, RecurrenceUnit, Recurring, choice, contract_for, integer, options, required_text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Permanent,
    Recurring,
}

impl SubscriptionKind {
    pub const OPTIONS: [&'static str; 2] = ["permanent", "recurring"];
}

impl FromStr for SubscriptionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "permanent" => Ok(SubscriptionKind::Permanent),
            "recurring" => Ok(SubscriptionKind::Recurring),
            other => Err(format!("unknown subscription type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubscriptionPayload {
    #[serde(rename = "userId")]
    #[schemars(length(min = 1))]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: SubscriptionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
}

/// Enrols a student in the course.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionForm;

impl CourseForm for SubscriptionForm {
    type Payload = SubscriptionPayload;

    fn schema(&self) -> FormSchema {
        let recurring = Condition::equals("type", "recurring");
        FormSchema::new("subscription", "Assinatura")
            .with_field(FieldSchema::new("userId", "Aluno", FieldKind::Lookup).required())
            .with_field(
                FieldSchema::new(
                    "type",
                    "Tipo da assinatura",
                    FieldKind::Enum(options(&SubscriptionKind::OPTIONS)),
                )
                .with_default("permanent"),
            )
            .with_field(
                FieldSchema::new("recurringInterval", "Intervalo de tempo", FieldKind::Integer)
                    .with_default(0)
                    .with_constraint(Constraint::Minimum(0))
                    .visible_when(recurring.clone()),
            )
            .with_field(
                FieldSchema::new(
                    "recurringType",
                    "Tipo do intervalo",
                    FieldKind::Enum(options(&RecurrenceUnit::OPTIONS)),
                )
                .with_default("day")
                .visible_when(recurring),
            )
    }

    fn build_payload(&self, state: &FormState) -> Result<SubscriptionPayload, FieldCoercionError> {
        let kind: SubscriptionKind = choice(state, "type")?;
        let recurring = match kind {
            SubscriptionKind::Permanent => None,
            SubscriptionKind::Recurring => Some(Recurring {
                interval: integer(state, "recurringInterval")?.unwrap_or_default(),
                unit: choice(state, "recurringType")?,
            }),
        };
        Ok(SubscriptionPayload {
            user_id: required_text(state, "userId")?,
            kind,
            recurring,
        })
    }

    fn success_text(&self) -> &str {
        "Usuário adicionado com sucesso!"
    }

    fn error_text(&self) -> &str {
        "Erro ao adicionar o usuário!"
    }

    fn payload_contract(&self) -> Option<PayloadContract> {
        contract_for::<SubscriptionPayload>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldInput;

    fn with_user() -> FormState {
        let mut state = FormState::from_schema(&SubscriptionForm.schema());
        state
            .set_value(
                "userId",
                FieldInput::Entity {
                    id: "u-2".into(),
                    label: "Maria Souza".into(),
                },
            )
            .unwrap();
        state
    }

    #[test]
    fn permanent_subscription_has_no_recurrence() {
        let state = with_user();
        assert!(!state.is_visible("recurringInterval"));
        let payload = SubscriptionForm.build_payload(&state).unwrap();
        assert_eq!(payload.user_id, "u-2");
        assert_eq!(payload.recurring, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"userId": "u-2", "type": "permanent"}));
    }

    #[test]
    fn recurring_subscription_reveals_interval_fields() {
        let mut state = with_user();
        state.set_value("type", FieldInput::choice("recurring")).unwrap();
        state
            .set_value("recurringInterval", FieldInput::text("3"))
            .unwrap();
        state
            .set_value("recurringType", FieldInput::choice("month"))
            .unwrap();
        assert!(state.is_visible("recurringType"));
        let payload = SubscriptionForm.build_payload(&state).unwrap();
        assert_eq!(
            payload.recurring,
            Some(Recurring {
                interval: 3,
                unit: RecurrenceUnit::Month
            })
        );
    }

    #[test]
    fn negative_interval_is_flagged_inline() {
        let mut state = with_user();
        state.set_value("type", FieldInput::choice("recurring")).unwrap();
        state
            .set_value("recurringInterval", FieldInput::text("-1"))
            .unwrap();
        assert!(!state.is_valid());
        assert_eq!(
            state.displayed_error("recurringInterval"),
            Some("Deve ser maior ou igual a 0")
        );

        state.set_value("type", FieldInput::choice("permanent")).unwrap();
        assert!(state.is_valid());
    }

    #[test]
    fn student_is_required() {
        let state = FormState::from_schema(&SubscriptionForm.schema());
        assert!(!state.is_valid());
    }

    #[test]
    fn blank_student_id_counts_as_missing() {
        let mut state = FormState::from_schema(&SubscriptionForm.schema());
        state
            .seed_from_value(&serde_json::json!({"userId": ""}))
            .unwrap();
        assert!(!state.is_valid());

        state
            .set_value(
                "userId",
                FieldInput::Entity {
                    id: "  ".into(),
                    label: "Sem id".into(),
                },
            )
            .unwrap();
        assert!(!state.is_valid());
        assert_eq!(state.displayed_error("userId"), Some("Obrigatório"));
    }
}
