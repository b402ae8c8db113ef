use super::field::FieldInput;

#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetValue { field: String, input: FieldInput },
    Touch { field: String },
    TouchAll,
    Reset,
}
