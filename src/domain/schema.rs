use serde_json::Value;

pub const REQUIRED_MESSAGE: &str = "Obrigatório";

#[derive(Debug, Clone)]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    /// Currency input held as a string of digits in minor units.
    Money,
    Enum(Vec<String>),
    File { accept: Vec<String> },
    /// Search-select field storing the id of the chosen entity.
    Lookup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOp {
    Equals(String),
    NotEquals(String),
}

/// Predicate over the current value of another field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: ConditionOp,
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::Equals(value.into()),
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: ConditionOp::NotEquals(value.into()),
        }
    }

    pub fn matches(&self, current: Option<&str>) -> bool {
        let current = current.unwrap_or_default();
        match &self.op {
            ConditionOp::Equals(expected) => current == expected,
            ConditionOp::NotEquals(expected) => current != expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required { message: String },
    Minimum(i64),
    Maximum(i64),
    AllowedMime { accept: Vec<String>, message: String },
    When {
        condition: Condition,
        then: Vec<Constraint>,
    },
}

impl Constraint {
    pub fn required() -> Self {
        Constraint::Required {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }

    pub fn when(condition: Condition, then: Vec<Constraint>) -> Self {
        Constraint::When { condition, then }
    }

    /// Fields referenced by this constraint (and nested conditional ones).
    pub fn dependencies(&self) -> Vec<&str> {
        match self {
            Constraint::When { condition, then } => {
                let mut deps = vec![condition.field.as_str()];
                deps.extend(then.iter().flat_map(Constraint::dependencies));
                deps
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub pointer: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub constraints: Vec<Constraint>,
    pub visible_when: Option<Condition>,
    pub default: Option<Value>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            pointer: format!("/{name}"),
            name,
            title: title.into(),
            description: None,
            kind,
            constraints: Vec::new(),
            visible_when: None,
            default: None,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn required(self) -> Self {
        self.with_constraint(Constraint::required())
    }

    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the field carries an unconditional `Required` constraint.
    pub fn is_required(&self) -> bool {
        self.constraints
            .iter()
            .any(|constraint| matches!(constraint, Constraint::Required { .. }))
    }

    /// Names of sibling fields whose value affects this field's visibility or validity.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = self
            .constraints
            .iter()
            .flat_map(Constraint::dependencies)
            .collect();
        if let Some(condition) = &self.visible_when {
            deps.push(condition.field.as_str());
        }
        deps
    }

    pub fn display_label(&self) -> String {
        if self.title.eq_ignore_ascii_case(&self.name) {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.name)
        }
    }
}
