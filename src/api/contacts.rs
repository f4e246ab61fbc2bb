use reqwest::Method;
use std::rc::Rc;

use super::{ApiResult, ContactApi, HttpClient, CODE_CREATED, CODE_OK};
use crate::models::{Contact, ContactCreate, ContactPage, ContactQuery, ContactUpdate};

const CONTACTS: &str = "contacts";

/// `/contacts` endpoints over HTTP
pub struct RestContactApi {
    http: Rc<HttpClient>,
}

impl RestContactApi {
    pub fn new(http: Rc<HttpClient>) -> Self {
        Self { http }
    }
}

impl ContactApi for RestContactApi {
    fn list_contacts(&self, query: &ContactQuery) -> ApiResult<ContactPage> {
        let req = self.http.request(Method::GET, &[CONTACTS])?.query(query);
        self.http.send(req, &[CODE_OK])
    }

    fn get_contact(&self, id: &str) -> ApiResult<Contact> {
        let req = self.http.request(Method::GET, &[CONTACTS, id])?;
        self.http.send(req, &[CODE_OK])
    }

    fn create_contact(&self, data: &ContactCreate) -> ApiResult<Contact> {
        let req = self.http.request(Method::POST, &[CONTACTS])?.json(data);
        self.http.send(req, &[CODE_OK, CODE_CREATED])
    }

    fn update_contact(&self, id: &str, data: &ContactUpdate) -> ApiResult<Contact> {
        let req = self.http.request(Method::PUT, &[CONTACTS, id])?.json(data);
        self.http.send(req, &[CODE_OK])
    }

    fn delete_contact(&self, id: &str) -> ApiResult<serde_json::Value> {
        let req = self.http.request(Method::DELETE, &[CONTACTS, id])?;
        self.http.send(req, &[CODE_OK])
    }

    fn toggle_favorite(&self, id: &str) -> ApiResult<Contact> {
        let req = self
            .http
            .request(Method::PATCH, &[CONTACTS, id, "favorite"])?;
        self.http.send(req, &[CODE_OK])
    }
}
