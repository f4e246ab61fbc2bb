//! Durable key-value storage for the persisted session.
//!
//! The auth store writes the session token and the serialized user here on
//! login, and the HTTP client reads the token back on every request.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::db::Database;

pub const SESSION_TOKEN_KEY: &str = "sessionToken";
pub const USER_KEY: &str = "user";

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_setting(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_setting(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.delete_setting(key)
    }
}

/// Non-durable storage, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the persisted session token, treating storage failures as absent
pub fn session_token(storage: &dyn Storage) -> Option<String> {
    match storage.get(SESSION_TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!("could not read session token: {e:#}");
            None
        }
    }
}
