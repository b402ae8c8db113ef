use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    io::{DocumentFormat, load_document, parse_document_str},
    lookup::DEFAULT_LOOKUP_LIMIT,
};

pub const ACCOUNT_URL_ENV: &str = "COURSEFORMS_ACCOUNT_URL";
pub const AUTH_URL_ENV: &str = "COURSEFORMS_AUTH_URL";

/// Frontends the user menu links out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendUrls {
    pub account: String,
    pub auth: String,
}

impl Default for FrontendUrls {
    fn default() -> Self {
        Self {
            account: "http://localhost:3002".to_string(),
            auth: "http://localhost:3001".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ISO 4217 code used to display prices.
    pub currency: String,
    pub lookup_limit: usize,
    pub urls: FrontendUrls,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: "BRL".to_string(),
            lookup_limit: DEFAULT_LOOKUP_LIMIT,
            urls: FrontendUrls::default(),
        }
    }
}

impl AppConfig {
    pub fn from_document_str(contents: &str, format: DocumentFormat) -> Result<Self> {
        let value = parse_document_str(contents, format)?;
        serde_json::from_value(value).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let value = load_document(path)?;
        serde_json::from_value(value)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_lookup_limit(mut self, limit: usize) -> Self {
        self.lookup_limit = limit;
        self
    }

    pub fn with_account_url(mut self, url: impl Into<String>) -> Self {
        self.urls.account = url.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.urls.auth = url.into();
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ACCOUNT_URL_ENV).filter(|url| !url.is_empty()) {
            self.urls.account = url;
        }
        if let Some(url) = lookup(AUTH_URL_ENV).filter(|url| !url.is_empty()) {
            self.urls.auth = url;
        }
        self
    }
}
