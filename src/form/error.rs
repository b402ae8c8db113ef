#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoercionError {
    pub field: String,
    pub message: String,
}

impl FieldCoercionError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(field, "unknown field")
    }
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}
