//! Shared blocking HTTP client for the contacts REST API.

use anyhow::{anyhow, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use super::{ApiError, Envelope};
use crate::storage::{self, Storage};

/// HTTP client used by both resource groups.
///
/// The bearer token is read from storage at request time, so a login or
/// logout through the auth store takes effect on the next request.
pub struct HttpClient {
    client: Client,
    base_url: Url,
    storage: Rc<dyn Storage>,
}

impl HttpClient {
    pub fn new(base_url: &str, storage: Rc<dyn Storage>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| anyhow!("Invalid API URL '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API URL cannot be used as a base: {}", base_url));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as escaped path segments
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("api request: {} {}", method, url);

        let mut req = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");

        if let Some(token) = storage::session_token(self.storage.as_ref()) {
            req = req.bearer_auth(token);
        }

        Ok(req)
    }

    /// Send a request and decode its envelope.
    ///
    /// An envelope code outside `expected` is logged but still returned.
    pub(crate) fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        expected: &[i32],
    ) -> Result<Envelope<T>, ApiError> {
        let response = req.send().map_err(|e| {
            let err = ApiError::Network(e.to_string());
            report_failure(&err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let err = ApiError::Http {
                status: status.as_u16(),
                body,
            };
            report_failure(&err);
            return Err(err);
        }

        let raw: Envelope<Value> = response.json().map_err(|e| {
            let err = ApiError::Decode(e.to_string());
            report_failure(&err);
            err
        })?;

        decode_envelope(raw, expected).map_err(|err| {
            report_failure(&err);
            err
        })
    }
}

/// Type the `data` of an envelope whose code is in `expected`.
///
/// Other codes keep their code and message but drop `data`, whatever shape
/// the server gave it.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    raw: Envelope<Value>,
    expected: &[i32],
) -> Result<Envelope<T>, ApiError> {
    if !expected.contains(&raw.code) {
        warn!(code = raw.code, "API error: {}", raw.message);
        return Ok(Envelope::failure(raw.code, raw.message));
    }

    let data = match raw.data {
        None | Some(Value::Null) => None,
        Some(value) => {
            Some(serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?)
        }
    };

    Ok(Envelope {
        code: raw.code,
        message: raw.message,
        data,
    })
}

/// Human-readable description of a transport failure
pub fn describe_failure(err: &ApiError) -> String {
    match err {
        ApiError::Http { status, .. } => {
            let detail = err.server_message().unwrap_or_default();
            match status {
                400 => format!("Bad request: {}", detail),
                401 => "Unauthorized: please log in again.".to_string(),
                403 => "Forbidden: you do not have access.".to_string(),
                404 => "Not found: the requested resource does not exist.".to_string(),
                500 => "Server error: internal server error.".to_string(),
                _ if detail.is_empty() => format!("An unexpected error occurred: {}", err),
                _ => format!("An unexpected error occurred: {}", detail),
            }
        }
        ApiError::Network(_) => "Network error: please check your connection.".to_string(),
        ApiError::Decode(msg) => format!("Unreadable response from server: {}", msg),
        ApiError::InvalidUrl(url) => format!("Invalid request URL: {}", url),
    }
}

fn report_failure(err: &ApiError) {
    error!(status = ?err.status(), "{}: {}", describe_failure(err), err);
}
