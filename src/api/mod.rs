//! REST API client layer
//!
//! Two resource groups share one [`HttpClient`]:
//! - auth: register, login, logout
//! - contacts: list, get, create, update, delete, favorite toggle
//!
//! Every response body is an [`Envelope`]. A non-success envelope code is not
//! an error at this layer; callers inspect `code`. Transport failures are
//! returned as [`ApiError`].

mod auth;
mod client;
mod contacts;

pub use auth::RestAuthApi;
pub use client::HttpClient;
pub use contacts::RestContactApi;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    AuthSession, Contact, ContactCreate, ContactPage, ContactQuery, ContactUpdate,
    LoginCredentials, RegisterCredentials, User,
};

pub const CODE_OK: i32 = 200;
pub const CODE_CREATED: i32 = 201;

/// Uniform `{code, message, data}` wrapper every response uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            code: CODE_CREATED,
            message: "created".to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Transport-level failure of an API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response: connection refused, DNS, timeout
    #[error("network error: {0}")]
    Network(String),
    /// Response with a non-2xx HTTP status
    #[error("request failed with status {status}")]
    Http { status: u16, body: String },
    /// Response body was not a valid envelope
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The `message` field of a JSON error body, if the server sent one
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Server message when present, otherwise `fallback`
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Authentication endpoints
pub trait AuthApi {
    fn register(&self, credentials: &RegisterCredentials) -> ApiResult<User>;
    fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession>;
    fn logout(&self) -> ApiResult<serde_json::Value>;
}

/// Contact resource endpoints
pub trait ContactApi {
    fn list_contacts(&self, query: &ContactQuery) -> ApiResult<ContactPage>;
    fn get_contact(&self, id: &str) -> ApiResult<Contact>;
    fn create_contact(&self, data: &ContactCreate) -> ApiResult<Contact>;
    fn update_contact(&self, id: &str, data: &ContactUpdate) -> ApiResult<Contact>;
    fn delete_contact(&self, id: &str) -> ApiResult<serde_json::Value>;
    fn toggle_favorite(&self, id: &str) -> ApiResult<Contact>;
}
