mod actions;
mod error;
mod field;
mod reducers;
mod state;
mod validation;

pub use actions::FormCommand;
pub use error::FieldCoercionError;
pub use field::{
    AMOUNT_MESSAGE, FieldInput, FieldState, FieldValue, FileUpload, INTEGER_MESSAGE, LookupSelection,
};
pub use reducers::apply_command;
pub use state::FormState;
pub use validation::{validate_all, validate_field};
