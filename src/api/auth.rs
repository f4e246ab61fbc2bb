use reqwest::Method;
use std::rc::Rc;

use super::{ApiResult, AuthApi, HttpClient, CODE_CREATED, CODE_OK};
use crate::models::{AuthSession, LoginCredentials, RegisterCredentials, User};

const AUTH_SUCCESS: &[i32] = &[CODE_OK, CODE_CREATED];

/// `/auth/*` endpoints over HTTP
pub struct RestAuthApi {
    http: Rc<HttpClient>,
}

impl RestAuthApi {
    pub fn new(http: Rc<HttpClient>) -> Self {
        Self { http }
    }
}

impl AuthApi for RestAuthApi {
    fn register(&self, credentials: &RegisterCredentials) -> ApiResult<User> {
        let req = self
            .http
            .request(Method::POST, &["auth", "register"])?
            .json(credentials);
        self.http.send(req, AUTH_SUCCESS)
    }

    fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession> {
        let req = self
            .http
            .request(Method::POST, &["auth", "login"])?
            .json(credentials);
        self.http.send(req, AUTH_SUCCESS)
    }

    fn logout(&self) -> ApiResult<serde_json::Value> {
        let req = self.http.request(Method::POST, &["auth", "logout"])?;
        self.http.send(req, AUTH_SUCCESS)
    }
}
