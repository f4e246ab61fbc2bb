//! API configuration management
//!
//! Resolves the REST API base URL and list page size from environment
//! variables and database settings.

use crate::db::Database;
use crate::models::DEFAULT_PAGE_SIZE;
use anyhow::{anyhow, Result};
use std::env;

// Settings keys for database storage
pub const SETTING_API_BASE_URL: &str = "api_base_url";
pub const SETTING_PAGE_SIZE: &str = "page_size";

// Environment variable names
pub const ENV_API_URL: &str = "CONTACTDESK_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// URL saved in the database; never holds the environment override
    pub api_url: Option<String>,
    /// `CONTACTDESK_API_URL`, when set
    pub env_api_url: Option<String>,
    pub page_size: Option<u32>,
}

impl ApiConfig {
    /// Load configuration from environment variables and database settings.
    /// Environment variables take precedence over database settings.
    pub fn load(db: &Database) -> Result<Self> {
        Self::load_with_env(db, env::var(ENV_API_URL).ok())
    }

    pub fn load_with_env(db: &Database, env_api_url: Option<String>) -> Result<Self> {
        let env_api_url = env_api_url.filter(|v| !v.trim().is_empty());
        let api_url = db.get_setting(SETTING_API_BASE_URL)?;

        let page_size = db
            .get_setting(SETTING_PAGE_SIZE)?
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0);

        Ok(Self {
            api_url,
            env_api_url,
            page_size,
        })
    }

    /// Get the effective API base URL (with default), without a trailing slash
    pub fn effective_api_url(&self) -> &str {
        self.env_api_url
            .as_deref()
            .or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Save the stored fields to the database. The environment override is
    /// never written.
    pub fn save(&self, db: &Database) -> Result<()> {
        if let Some(ref url) = self.api_url {
            validate_api_url(url)?;
            db.set_setting(SETTING_API_BASE_URL, url)?;
        }

        if let Some(size) = self.page_size {
            db.set_setting(SETTING_PAGE_SIZE, &size.to_string())?;
        }

        Ok(())
    }

    /// Clear all API configuration from the database
    pub fn clear(db: &Database) -> Result<()> {
        let _ = db.delete_setting(SETTING_API_BASE_URL);
        let _ = db.delete_setting(SETTING_PAGE_SIZE);
        Ok(())
    }
}

/// Reject base URLs reqwest could not send to
pub fn validate_api_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).map_err(|e| anyhow!("Invalid API URL '{}': {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("Unsupported URL scheme '{}' in {}", other, raw)),
    }
}
