mod schema;

pub use schema::{
    Condition, ConditionOp, Constraint, FieldKind, FieldSchema, FormSchema, REQUIRED_MESSAGE,
};
