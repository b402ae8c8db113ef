use std::fmt;

use anyhow::{Context, Result};
use jsonschema::{Validator, validator_for};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

/// JSON Schema derived from a payload type, checked before each service call.
pub struct PayloadContract {
    schema: Value,
    validator: Validator,
}

impl PayloadContract {
    pub fn for_type<P: JsonSchema>() -> Result<Self> {
        let root = schemars::schema_for!(P);
        let schema = serde_json::to_value(root).context("failed to serialize payload schema")?;
        Self::from_schema(schema)
    }

    pub fn from_schema(schema: Value) -> Result<Self> {
        let validator = validator_for(&schema).context("failed to compile payload schema")?;
        Ok(Self { schema, validator })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Collect every violation as `pointer: message` lines.
    pub fn check<P: Serialize>(&self, payload: &P) -> Result<(), String> {
        let value = serde_json::to_value(payload).map_err(|err| err.to_string())?;
        let issues: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let prefix = if pointer.is_empty() {
                    "<root>".to_string()
                } else {
                    pointer
                };
                format!("{prefix}: {error}")
            })
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues.join("; "))
        }
    }
}

impl fmt::Debug for PayloadContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadContract")
            .field("title", &self.schema.get("title"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, JsonSchema)]
    struct Sample {
        name: String,
        #[schemars(range(min = 0))]
        count: i64,
    }

    #[test]
    fn derived_contract_flags_violations() {
        let contract = PayloadContract::for_type::<Sample>().expect("schema compiles");
        assert!(
            contract
                .check(&Sample {
                    name: "a".into(),
                    count: 1
                })
                .is_ok()
        );
        let err = contract
            .check(&Sample {
                name: "a".into(),
                count: -1,
            })
            .unwrap_err();
        assert!(err.starts_with("/count"), "{err}");
    }
}
