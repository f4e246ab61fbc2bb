//! In-memory stand-ins for the REST API, used by the store tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{ApiError, ApiResult, AuthApi, ContactApi, Envelope};
use crate::models::{
    AuthSession, Contact, ContactCreate, ContactPage, ContactQuery, ContactUpdate,
    LoginCredentials, Pagination, RegisterCredentials, SortField, SortOrder, User,
};

pub const DUPLICATE_PHONE_BODY: &str = r#"{"code":400,"message":"电话号码已存在"}"#;

/// Failure to return instead of the next call's normal response
pub enum Failure {
    Envelope(i32, &'static str),
    Transport(ApiError),
}

/// Contacts backend that applies queries to an in-memory list
#[derive(Default)]
pub struct FakeContactServer {
    pub contacts: RefCell<Vec<Contact>>,
    pub queries: RefCell<Vec<ContactQuery>>,
    failures: RefCell<VecDeque<Failure>>,
    next_id: RefCell<u32>,
}

impl FakeContactServer {
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let server = Self::default();
        *server.contacts.borrow_mut() = contacts;
        server
    }

    pub fn fail_next(&self, failure: Failure) {
        self.failures.borrow_mut().push_back(failure);
    }

    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }

    pub fn last_query(&self) -> Option<ContactQuery> {
        self.queries.borrow().last().cloned()
    }

    fn take_failure<T>(&self) -> Option<ApiResult<T>> {
        self.failures.borrow_mut().pop_front().map(|f| match f {
            Failure::Envelope(code, msg) => Ok(Envelope::failure(code, msg)),
            Failure::Transport(err) => Err(err),
        })
    }

    fn not_found<T>() -> ApiResult<T> {
        Err(ApiError::Http {
            status: 404,
            body: r#"{"code":404,"message":"联系人不存在"}"#.to_string(),
        })
    }

    fn phone_taken(&self, phone: &str, except: Option<&str>) -> bool {
        self.contacts
            .borrow()
            .iter()
            .any(|c| c.phone == phone && Some(c.id.as_str()) != except)
    }
}

impl ContactApi for FakeContactServer {
    fn list_contacts(&self, query: &ContactQuery) -> ApiResult<ContactPage> {
        self.queries.borrow_mut().push(query.clone());
        if let Some(failure) = self.take_failure() {
            return failure;
        }

        let needle = query.search.as_deref().unwrap_or("").to_lowercase();
        let tags: Vec<&str> = query
            .tags
            .as_deref()
            .map(|t| t.split(',').collect())
            .unwrap_or_default();

        let mut matched: Vec<Contact> = self
            .contacts
            .borrow()
            .iter()
            .filter(|c| needle.is_empty() || c.matches_lowercase(&needle))
            .filter(|c| tags.iter().all(|t| c.tags.iter().any(|ct| ct == t)))
            .filter(|c| query.is_favorite != Some(true) || c.is_favorite)
            .cloned()
            .collect();

        if query.sort_by == Some(SortField::Name) {
            matched.sort_by(|a, b| a.name.cmp(&b.name));
            if query.order == Some(SortOrder::Desc) {
                matched.reverse();
            }
        }

        let limit = query.limit.unwrap_or(10).max(1);
        let page = query.page.unwrap_or(1).max(1);
        let total = matched.len() as u64;
        let total_pages = matched.len().div_ceil(limit as usize) as u32;
        let contacts = matched
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();

        Ok(Envelope::ok(ContactPage {
            contacts,
            pagination: Pagination {
                total,
                page,
                limit,
                total_pages,
            },
        }))
    }

    fn get_contact(&self, id: &str) -> ApiResult<Contact> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        match self.contacts.borrow().iter().find(|c| c.id == id) {
            Some(c) => Ok(Envelope::ok(c.clone())),
            None => Self::not_found(),
        }
    }

    fn create_contact(&self, data: &ContactCreate) -> ApiResult<Contact> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        if self.phone_taken(&data.phone, None) {
            return Err(ApiError::Http {
                status: 400,
                body: DUPLICATE_PHONE_BODY.to_string(),
            });
        }

        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            format!("new-{}", *next)
        };
        let mut contact = Contact::new(id, data.name.clone(), data.phone.clone());
        contact.email = data.email.clone();
        contact.address = data.address.clone();
        contact.company = data.company.clone();
        contact.notes = data.notes.clone();
        contact.tags = data.tags.clone();
        contact.is_favorite = data.is_favorite.unwrap_or(false);

        self.contacts.borrow_mut().push(contact.clone());
        Ok(Envelope::created(contact))
    }

    fn update_contact(&self, id: &str, data: &ContactUpdate) -> ApiResult<Contact> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        if let Some(ref phone) = data.phone {
            if self.phone_taken(phone, Some(id)) {
                return Err(ApiError::Http {
                    status: 400,
                    body: DUPLICATE_PHONE_BODY.to_string(),
                });
            }
        }

        let mut contacts = self.contacts.borrow_mut();
        let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
            return Self::not_found();
        };
        if let Some(ref v) = data.name {
            contact.name = v.clone();
        }
        if let Some(ref v) = data.phone {
            contact.phone = v.clone();
        }
        if data.email.is_some() {
            contact.email = data.email.clone();
        }
        if data.company.is_some() {
            contact.company = data.company.clone();
        }
        if data.address.is_some() {
            contact.address = data.address.clone();
        }
        if data.notes.is_some() {
            contact.notes = data.notes.clone();
        }
        if let Some(ref tags) = data.tags {
            contact.tags = tags.clone();
        }
        if let Some(fav) = data.is_favorite {
            contact.is_favorite = fav;
        }
        Ok(Envelope::ok(contact.clone()))
    }

    fn delete_contact(&self, id: &str) -> ApiResult<serde_json::Value> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        let mut contacts = self.contacts.borrow_mut();
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Self::not_found();
        }
        Ok(Envelope {
            code: 200,
            message: "deleted".to_string(),
            data: None,
        })
    }

    fn toggle_favorite(&self, id: &str) -> ApiResult<Contact> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        let mut contacts = self.contacts.borrow_mut();
        let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
            return Self::not_found();
        };
        contact.is_favorite = !contact.is_favorite;
        Ok(Envelope::ok(contact.clone()))
    }
}

/// Auth backend with one known account
pub struct FakeAuthServer {
    pub email: String,
    pub password: String,
    pub token: String,
    pub logins: RefCell<u32>,
    pub logouts: RefCell<u32>,
    failures: RefCell<VecDeque<Failure>>,
}

impl Default for FakeAuthServer {
    fn default() -> Self {
        Self {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            token: "token-123".to_string(),
            logins: RefCell::new(0),
            logouts: RefCell::new(0),
            failures: RefCell::new(VecDeque::new()),
        }
    }
}

impl FakeAuthServer {
    pub fn user(&self) -> User {
        User {
            id: "u1".to_string(),
            email: self.email.clone(),
            name: Some("Alice".to_string()),
        }
    }

    pub fn fail_next(&self, failure: Failure) {
        self.failures.borrow_mut().push_back(failure);
    }

    fn take_failure<T>(&self) -> Option<ApiResult<T>> {
        self.failures.borrow_mut().pop_front().map(|f| match f {
            Failure::Envelope(code, msg) => Ok(Envelope::failure(code, msg)),
            Failure::Transport(err) => Err(err),
        })
    }
}

impl AuthApi for FakeAuthServer {
    fn register(&self, credentials: &RegisterCredentials) -> ApiResult<User> {
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        if credentials.email == self.email {
            return Ok(Envelope::failure(409, "Email already registered"));
        }
        Ok(Envelope::created(User {
            id: "u2".to_string(),
            email: credentials.email.clone(),
            name: credentials.name.clone(),
        }))
    }

    fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession> {
        *self.logins.borrow_mut() += 1;
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        if credentials.email == self.email
            && credentials.password.as_deref() == Some(self.password.as_str())
        {
            Ok(Envelope::ok(AuthSession {
                user: self.user(),
                session_token: self.token.clone(),
            }))
        } else {
            Ok(Envelope::failure(401, "Invalid email or password"))
        }
    }

    fn logout(&self) -> ApiResult<serde_json::Value> {
        *self.logouts.borrow_mut() += 1;
        if let Some(failure) = self.take_failure() {
            return failure;
        }
        Ok(Envelope::ok(serde_json::Value::Null))
    }
}

pub fn contact(id: &str, name: &str, phone: &str) -> Contact {
    Contact::new(id, name, phone)
}
