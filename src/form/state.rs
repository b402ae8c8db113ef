use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::FormSchema;

use super::{
    error::FieldCoercionError,
    field::{FieldInput, FieldState},
    validation,
};

/// Per-field value, touched flag and validation error for one form instance.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    fields: IndexMap<String, FieldState>,
}

impl FormState {
    pub fn from_schema(schema: &FormSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), FieldState::from_schema(field.clone())))
            .collect();
        let mut state = Self {
            schema: schema.clone(),
            fields,
        };
        state.revalidate();
        state
    }

    pub fn id(&self) -> &str {
        &self.schema.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Textual value of `name`, used when evaluating conditions.
    pub fn value_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldState::text)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        let Some(field) = self.fields.get(name) else {
            return false;
        };
        match &field.schema.visible_when {
            Some(condition) => condition.matches(self.value_text(&condition.field)),
            None => true,
        }
    }

    /// Update a field from user input, mark it touched and re-validate it and
    /// every field depending on it.
    pub fn set_value(&mut self, name: &str, input: FieldInput) -> Result<(), FieldCoercionError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldCoercionError::unknown_field(name))?;
        field.apply_input(input)?;
        field.touched = true;
        self.revalidate_around(name);
        Ok(())
    }

    /// Seed values from a JSON object without marking anything touched.
    pub fn seed_from_value(&mut self, value: &Value) -> Result<(), FieldCoercionError> {
        if let Value::Object(map) = value {
            for (key, subvalue) in map {
                if let Some(field) = self.fields.get_mut(key) {
                    field.seed_value(subvalue)?;
                }
            }
        }
        self.revalidate();
        Ok(())
    }

    pub fn touch(&mut self, name: &str) {
        if let Some(field) = self.fields.get_mut(name) {
            field.touched = true;
        }
    }

    pub fn touch_all(&mut self) {
        for field in self.fields.values_mut() {
            field.touched = true;
        }
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|field| field.touched)
    }

    /// Restore schema defaults and clear touched flags.
    pub fn reset(&mut self) {
        *self = Self::from_schema(&self.schema);
    }

    /// Store the full schema evaluation on every field.
    pub fn revalidate(&mut self) {
        let errors = validation::validate_all(self);
        for (name, error) in errors {
            if let Some(field) = self.fields.get_mut(&name) {
                field.error = error;
            }
        }
    }

    fn revalidate_around(&mut self, changed: &str) {
        let mut pending = vec![changed.to_string()];
        let mut affected: Vec<String> = Vec::new();
        while let Some(name) = pending.pop() {
            if affected.contains(&name) {
                continue;
            }
            for field in self.fields.values() {
                if field.schema.dependencies().contains(&name.as_str()) {
                    pending.push(field.schema.name.clone());
                }
            }
            affected.push(name);
        }

        let updates: Vec<(String, Option<String>)> = affected
            .into_iter()
            .filter_map(|name| {
                let field = self.fields.get(&name)?;
                Some((name, validation::validate_field(field, self)))
            })
            .collect();
        for (name, error) in updates {
            if let Some(field) = self.fields.get_mut(&name) {
                field.error = error;
            }
        }
    }

    /// True when no visible field fails validation, regardless of touched flags.
    pub fn is_valid(&self) -> bool {
        validation::validate_all(self).values().all(Option::is_none)
    }

    /// Error to display for `name`: only once the field has been touched.
    pub fn displayed_error(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldState::displayed_error)
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .values()
            .filter(|field| field.error.is_some())
            .count()
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|field| field.touched)
    }

    /// Coerced value of a visible field. Hidden fields yield `None`.
    pub fn visible_value(&self, name: &str) -> Result<Option<Value>, FieldCoercionError> {
        if !self.is_visible(name) {
            return Ok(None);
        }
        match self.fields.get(name) {
            Some(field) => field.current_value(),
            None => Err(FieldCoercionError::unknown_field(name)),
        }
    }
}
