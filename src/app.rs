//! Application context: storage, configuration and the two stores, created
//! once at startup and passed to every command.

use anyhow::{anyhow, Result};
use std::rc::Rc;

use crate::api::{HttpClient, RestAuthApi, RestContactApi};
use crate::config::ApiConfig;
use crate::db::Database;
use crate::storage::Storage;
use crate::store::{AuthStore, ContactStore};

pub struct App {
    pub db: Rc<Database>,
    pub config: ApiConfig,
    pub auth: AuthStore<RestAuthApi>,
    pub contacts: ContactStore<RestContactApi>,
}

impl App {
    pub fn open() -> Result<Self> {
        Self::with_database(Database::open()?)
    }

    /// Build the stores on top of `db` and restore any persisted session
    pub fn with_database(db: Database) -> Result<Self> {
        let db = Rc::new(db);
        let config = ApiConfig::load(&db)?;

        let storage: Rc<dyn Storage> = db.clone();
        let http = Rc::new(HttpClient::new(config.effective_api_url(), Rc::clone(&storage))?);

        let mut auth = AuthStore::new(RestAuthApi::new(Rc::clone(&http)), storage);
        auth.load_session();

        let contacts = ContactStore::new(
            RestContactApi::new(http),
            config.effective_page_size(),
        );

        Ok(Self {
            db,
            config,
            auth,
            contacts,
        })
    }

    pub fn require_login(&self) -> Result<()> {
        if self.auth.is_logged_in() {
            Ok(())
        } else {
            Err(anyhow!("Not logged in. Run `contactdesk login` first."))
        }
    }
}
