use super::{actions::FormCommand, error::FieldCoercionError, state::FormState};

pub fn apply_command(state: &mut FormState, command: FormCommand) -> Result<(), FieldCoercionError> {
    match command {
        FormCommand::SetValue { field, input } => state.set_value(&field, input)?,
        FormCommand::Touch { field } => state.touch(&field),
        FormCommand::TouchAll => state.touch_all(),
        FormCommand::Reset => state.reset(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldKind, FieldSchema, FormSchema};
    use crate::form::FieldInput;

    #[test]
    fn commands_drive_state() {
        let schema = FormSchema::new("material", "Material")
            .with_field(FieldSchema::new("title", "Nome", FieldKind::String).required());
        let mut state = FormState::from_schema(&schema);

        apply_command(&mut state, FormCommand::Touch { field: "title".into() }).unwrap();
        assert_eq!(state.displayed_error("title"), Some("Obrigatório"));

        apply_command(
            &mut state,
            FormCommand::SetValue {
                field: "title".into(),
                input: FieldInput::text("Aula 1"),
            },
        )
        .unwrap();
        assert!(state.is_valid());

        apply_command(&mut state, FormCommand::Reset).unwrap();
        assert!(!state.is_touched("title"));
    }
}
