use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Condition, Constraint, FieldKind, FieldSchema, FormSchema},
    form::{AMOUNT_MESSAGE, FieldCoercionError, FormState},
    money::convert_to_amount,
    submit::PayloadContract,
};

use super::{
    CourseForm, RecurrenceUnit, Recurring, choice, contract_for, integer, options, required_text,
    text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    Infinite,
    Finite,
}

impl InventoryKind {
    pub const OPTIONS: [&'static str; 2] = ["infinite", "finite"];
}

impl FromStr for InventoryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "infinite" => Ok(InventoryKind::Infinite),
            "finite" => Ok(InventoryKind::Finite),
            other => Err(format!("unknown inventory type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Price {
    /// Minor units (cents).
    #[schemars(range(min = 0))]
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Inventory {
    #[serde(rename = "type")]
    pub kind: InventoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanPayload {
    #[schemars(length(min = 1))]
    pub name: String,
    pub code: String,
    #[schemars(length(min = 1))]
    pub prices: Vec<Price>,
    pub recurring: Recurring,
    pub inventory: Inventory,
}

/// Pricing plan (SKU) of a course.
#[derive(Debug, Clone, Default)]
pub struct PlanForm;

impl CourseForm for PlanForm {
    type Payload = PlanPayload;

    fn schema(&self) -> FormSchema {
        FormSchema::new("plan", "Plano")
            .with_field(FieldSchema::new("name", "Nome", FieldKind::String).required())
            .with_field(FieldSchema::new("code", "Código", FieldKind::String))
            .with_field(FieldSchema::new("price", "Preço R$", FieldKind::Money).required())
            .with_field(
                FieldSchema::new("recurringInterval", "Intervalo de tempo", FieldKind::Integer)
                    .with_default(1)
                    .required()
                    .with_constraint(Constraint::Minimum(0)),
            )
            .with_field(
                FieldSchema::new(
                    "recurringType",
                    "Tipo do intervalo",
                    FieldKind::Enum(options(&RecurrenceUnit::OPTIONS)),
                )
                .with_default("day"),
            )
            .with_field(
                FieldSchema::new(
                    "inventoryType",
                    "Estoque",
                    FieldKind::Enum(options(&InventoryKind::OPTIONS)),
                )
                .with_default("infinite"),
            )
            .with_field(
                FieldSchema::new("inventoryQuantity", "Quantidade", FieldKind::Integer)
                    .with_default(0)
                    .visible_when(Condition::not_equals("inventoryType", "infinite"))
                    .with_constraint(Constraint::Minimum(0))
                    .with_constraint(Constraint::when(
                        Condition::equals("inventoryType", "finite"),
                        vec![Constraint::required()],
                    )),
            )
    }

    fn build_payload(&self, state: &FormState) -> Result<PlanPayload, FieldCoercionError> {
        let raw_price = required_text(state, "price")?;
        let amount = convert_to_amount(&raw_price)
            .ok_or_else(|| FieldCoercionError::new("price", AMOUNT_MESSAGE))?;
        let interval = integer(state, "recurringInterval")?
            .ok_or_else(|| FieldCoercionError::new("recurringInterval", "value is required"))?;
        let kind: InventoryKind = choice(state, "inventoryType")?;
        let quantity = match kind {
            InventoryKind::Infinite => None,
            InventoryKind::Finite => Some(integer(state, "inventoryQuantity")?.ok_or_else(
                || FieldCoercionError::new("inventoryQuantity", "value is required"),
            )?),
        };

        Ok(PlanPayload {
            name: required_text(state, "name")?,
            code: text(state, "code")?,
            prices: vec![Price { amount }],
            recurring: Recurring {
                interval,
                unit: choice(state, "recurringType")?,
            },
            inventory: Inventory { kind, quantity },
        })
    }

    fn success_text(&self) -> &str {
        "Assinatura criada com sucesso!"
    }

    fn error_text(&self) -> &str {
        "Erro ao criar a assinatura!"
    }

    fn payload_contract(&self) -> Option<PayloadContract> {
        contract_for::<PlanPayload>()
    }
}
