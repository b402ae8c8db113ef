use indexmap::IndexMap;

use crate::domain::{Constraint, FieldKind};

use super::{
    field::{FieldState, FieldValue, parse_integer},
    state::FormState,
};

/// Evaluate the whole schema against the current values.
///
/// Hidden fields always map to `None`. Touched flags play no part here; they
/// only gate what gets displayed.
pub fn validate_all(state: &FormState) -> IndexMap<String, Option<String>> {
    state
        .fields()
        .map(|field| (field.schema.name.clone(), validate_field(field, state)))
        .collect()
}

/// First failing constraint of `field`, given the rest of the form.
pub fn validate_field(field: &FieldState, state: &FormState) -> Option<String> {
    if !state.is_visible(&field.schema.name) {
        return None;
    }
    if let Err(err) = field.current_value()
        && !field.value.is_empty()
    {
        return Some(err.message);
    }
    field
        .schema
        .constraints
        .iter()
        .find_map(|constraint| evaluate(constraint, field, state))
}

fn evaluate(constraint: &Constraint, field: &FieldState, state: &FormState) -> Option<String> {
    match constraint {
        Constraint::Required { message } => field.value.is_empty().then(|| message.clone()),
        Constraint::Minimum(min) => numeric(field)
            .filter(|value| value < min)
            .map(|_| format!("Deve ser maior ou igual a {min}")),
        Constraint::Maximum(max) => numeric(field)
            .filter(|value| value > max)
            .map(|_| format!("Deve ser menor ou igual a {max}")),
        Constraint::AllowedMime { accept, message } => match &field.value {
            FieldValue::File(Some(file))
                if !accept
                    .iter()
                    .any(|mime| mime.eq_ignore_ascii_case(&file.content_type)) =>
            {
                Some(message.clone())
            }
            _ => None,
        },
        Constraint::When { condition, then } => {
            if condition.matches(state.value_text(&condition.field)) {
                then.iter()
                    .find_map(|nested| evaluate(nested, field, state))
            } else {
                None
            }
        }
    }
}

fn numeric(field: &FieldState) -> Option<i64> {
    let text = field.value.as_text()?;
    match field.schema.kind {
        FieldKind::Integer => parse_integer(text, &field.schema).ok().flatten(),
        FieldKind::Money => crate::money::convert_to_amount(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, FieldSchema, FormSchema};
    use crate::form::{FieldInput, FileUpload};

    fn schema() -> FormSchema {
        FormSchema::new("test", "Test")
            .with_field(
                FieldSchema::new("interval", "Intervalo", FieldKind::Integer)
                    .with_default(1)
                    .with_constraint(Constraint::Minimum(0))
                    .with_constraint(Constraint::Maximum(365)),
            )
            .with_field(
                FieldSchema::new(
                    "file",
                    "Arquivo",
                    FieldKind::File {
                        accept: vec!["application/pdf".into()],
                    },
                )
                .with_constraint(Constraint::AllowedMime {
                    accept: vec!["application/pdf".into()],
                    message: "Arquivo inválido!".into(),
                }),
            )
            .with_field(FieldSchema::new(
                "kind",
                "Tipo",
                FieldKind::Enum(vec!["a".into(), "b".into()]),
            ))
            .with_field(
                FieldSchema::new("note", "Nota", FieldKind::String).with_constraint(
                    Constraint::when(Condition::equals("kind", "b"), vec![Constraint::required()]),
                ),
            )
    }

    #[test]
    fn numeric_bounds_apply() {
        let mut state = FormState::from_schema(&schema());
        assert!(state.is_valid());
        state.set_value("interval", FieldInput::text("-1")).unwrap();
        assert_eq!(
            state.displayed_error("interval"),
            Some("Deve ser maior ou igual a 0")
        );
        state.set_value("interval", FieldInput::text("400")).unwrap();
        assert_eq!(
            state.displayed_error("interval"),
            Some("Deve ser menor ou igual a 365")
        );
        state.set_value("interval", FieldInput::text("abc")).unwrap();
        assert_eq!(
            state.displayed_error("interval"),
            Some(crate::form::INTEGER_MESSAGE)
        );
    }

    #[test]
    fn mime_allow_list_is_enforced() {
        let mut state = FormState::from_schema(&schema());
        state
            .set_value(
                "file",
                FieldInput::File(FileUpload::new("a.png", "image/png", vec![1])),
            )
            .unwrap();
        assert_eq!(state.displayed_error("file"), Some("Arquivo inválido!"));
        state
            .set_value(
                "file",
                FieldInput::File(FileUpload::new("a.pdf", "application/pdf", vec![1])),
            )
            .unwrap();
        assert_eq!(state.displayed_error("file"), None);
    }

    #[test]
    fn conditional_requiredness_follows_sibling() {
        let mut state = FormState::from_schema(&schema());
        assert!(state.is_valid());
        state.set_value("kind", FieldInput::choice("b")).unwrap();
        assert!(!state.is_valid());
        assert_eq!(state.field("note").unwrap().error.as_deref(), Some("Obrigatório"));
        assert_eq!(state.displayed_error("note"), None);
    }
}
