//! Session lifecycle: login, register, logout, restore on startup.

use std::rc::Rc;
use tracing::{debug, error, info, warn};

use super::{Notice, StoreEvent, SubscriptionId, Subscribers};
use crate::api::{ApiError, AuthApi, CODE_CREATED, CODE_OK};
use crate::models::{LoginCredentials, RegisterCredentials, User};
use crate::storage::{Storage, SESSION_TOKEN_KEY, USER_KEY};

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";

pub struct AuthStore<A: AuthApi> {
    api: A,
    storage: Rc<dyn Storage>,
    user: Option<User>,
    session_token: Option<String>,
    loading: bool,
    error: Option<String>,
    subscribers: Subscribers,
}

impl<A: AuthApi> AuthStore<A> {
    pub fn new(api: A, storage: Rc<dyn Storage>) -> Self {
        Self {
            api,
            storage,
            user: None,
            session_token: None,
            loading: false,
            error: None,
            subscribers: Subscribers::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some() && self.session_token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn changed(&mut self) {
        self.subscribers.emit(&StoreEvent::Changed);
    }

    fn notify(&mut self, notice: Notice) {
        self.subscribers.emit(&StoreEvent::Notice(notice));
    }

    /// Restore a persisted session without contacting the server.
    ///
    /// A stored user that is the literal `undefined` or not valid JSON
    /// invalidates the whole session and both keys are removed.
    pub fn load_session(&mut self) {
        let token = self.read(SESSION_TOKEN_KEY);
        let stored_user = self.read(USER_KEY);

        let (Some(token), Some(stored_user)) = (token, stored_user) else {
            debug!("no persisted session");
            return;
        };

        let parsed = if stored_user == "undefined" {
            None
        } else {
            match serde_json::from_str::<User>(&stored_user) {
                Ok(user) => Some(user),
                Err(e) => {
                    error!("Failed to parse persisted user: {e}");
                    None
                }
            }
        };

        match parsed {
            Some(user) if !token.is_empty() => {
                debug!(user = %user.email, "restored session");
                self.user = Some(user);
                self.session_token = Some(token);
                self.changed();
            }
            _ => {
                warn!("discarding corrupt persisted session");
                self.clear_persisted();
            }
        }
    }

    pub fn login(&mut self, credentials: &LoginCredentials) -> bool {
        self.loading = true;
        self.error = None;
        self.changed();

        let outcome = match self.api.login(credentials) {
            Ok(envelope) if envelope.code == CODE_OK => match envelope.data {
                Some(session) => Ok(session),
                None => Err(failure_message(envelope.message, LOGIN_FAILED)),
            },
            Ok(envelope) => Err(failure_message(envelope.message, LOGIN_FAILED)),
            Err(e) => Err(transport_message(&e)),
        };

        self.loading = false;
        match outcome {
            Ok(session) => {
                // The HTTP client reads the token from storage, so an
                // unsaved session cannot make authenticated requests
                if let Err(e) = self.persist(&session.user, &session.session_token) {
                    error!("could not persist session: {e:#}");
                    self.clear_persisted();
                    self.user = None;
                    self.session_token = None;
                    self.fail(format!("{LOGIN_FAILED}: could not save session"));
                    return false;
                }
                info!(user = %session.user.email, "logged in");
                self.user = Some(session.user);
                self.session_token = Some(session.session_token);
                self.notify(Notice::success("Logged in"));
                self.changed();
                true
            }
            Err(msg) => {
                self.fail(msg);
                false
            }
        }
    }

    /// Does not log the user in; on success the caller switches to login.
    pub fn register(&mut self, credentials: &RegisterCredentials) -> bool {
        self.loading = true;
        self.error = None;
        self.changed();

        let outcome = match self.api.register(credentials) {
            Ok(envelope) if envelope.code == CODE_CREATED && envelope.data.is_some() => Ok(()),
            Ok(envelope) => Err(failure_message(envelope.message, REGISTER_FAILED)),
            Err(e) => Err(transport_message(&e)),
        };

        self.loading = false;
        match outcome {
            Ok(()) => {
                info!(email = %credentials.email, "registered");
                self.notify(Notice::success("Registration succeeded, please log in"));
                self.changed();
                true
            }
            Err(msg) => {
                self.fail(msg);
                false
            }
        }
    }

    /// Ends the local session whatever the server answers.
    pub fn logout(&mut self) {
        self.loading = true;
        self.error = None;
        self.changed();

        match self.api.logout() {
            Ok(envelope) if envelope.code == CODE_OK => debug!("server session closed"),
            Ok(envelope) => warn!(code = envelope.code, "logout: {}", envelope.message),
            Err(e) => warn!("logout request failed: {e}"),
        }

        self.clear_persisted();
        self.user = None;
        self.session_token = None;
        self.loading = false;
        self.notify(Notice::info("Logged out"));
        self.changed();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.changed();
    }

    fn fail(&mut self, msg: String) {
        self.error = Some(msg.clone());
        self.notify(Notice::error(msg));
        self.changed();
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                error!("could not read {key} from storage: {e:#}");
                None
            }
        }
    }

    fn persist(&self, user: &User, token: &str) -> anyhow::Result<()> {
        self.storage.set(SESSION_TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    fn clear_persisted(&self) {
        for key in [SESSION_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!("could not remove {key} from storage: {e:#}");
            }
        }
    }
}

fn failure_message(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Server body message, else the transport error itself
fn transport_message(err: &ApiError) -> String {
    err.server_message().unwrap_or_else(|| err.to_string())
}
