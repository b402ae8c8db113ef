use serde::{Deserialize, Serialize};

/// The authenticated user, as handed over by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub fullname: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fullname: fullname.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
