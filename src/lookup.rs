//! Search-select field backed by a remote user lookup.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    form::{FieldCoercionError, FieldInput, FormState},
    session::CurrentUser,
};

pub const DEFAULT_LOOKUP_LIMIT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntity {
    pub id: String,
    pub fullname: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl LookupEntity {
    pub fn new(id: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fullname: fullname.into(),
            avatar: None,
        }
    }

    /// Field input writing this entity into a lookup field.
    pub fn to_input(&self) -> FieldInput {
        FieldInput::Entity {
            id: self.id.clone(),
            label: self.fullname.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    pub query: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupPage {
    #[serde(default)]
    pub items: Vec<LookupEntity>,
}

#[async_trait]
pub trait LookupService: Send + Sync {
    async fn find_all(&self, query: LookupQuery) -> Result<LookupPage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Results(Vec<LookupEntity>),
    /// A newer search started before this one resolved; drop these results.
    Stale,
}

impl LookupOutcome {
    pub fn results(&self) -> Option<&[LookupEntity]> {
        match self {
            LookupOutcome::Results(items) => Some(items),
            LookupOutcome::Stale => None,
        }
    }
}

pub struct SearchSelect {
    service: Arc<dyn LookupService>,
    excluded_id: Option<String>,
    limit: usize,
    generation: AtomicU64,
}

impl SearchSelect {
    /// `current_user` is left out of every result list.
    pub fn new(service: Arc<dyn LookupService>, current_user: Option<&CurrentUser>) -> Self {
        Self {
            service,
            excluded_id: current_user.map(|user| user.id.clone()),
            limit: DEFAULT_LOOKUP_LIMIT,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolve `text` to candidates. Blank text resolves to nothing without a
    /// service call. Only the latest search started yields `Results`.
    pub async fn search(&self, text: &str) -> LookupOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim();
        if query.is_empty() {
            return LookupOutcome::Results(Vec::new());
        }

        let response = self
            .service
            .find_all(LookupQuery {
                query: query.to_string(),
                limit: self.limit,
            })
            .await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::trace!(query, ticket, "discarding superseded lookup");
            return LookupOutcome::Stale;
        }

        match response {
            Ok(page) => LookupOutcome::Results(
                page.items
                    .into_iter()
                    .filter(|item| self.excluded_id.as_deref() != Some(item.id.as_str()))
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!(query, error = %err, "lookup failed");
                LookupOutcome::Results(Vec::new())
            }
        }
    }

    /// Write the chosen entity's id into `field`.
    pub fn select(
        &self,
        state: &mut FormState,
        field: &str,
        entity: &LookupEntity,
    ) -> Result<(), FieldCoercionError> {
        state.set_value(field, entity.to_input())
    }
}
