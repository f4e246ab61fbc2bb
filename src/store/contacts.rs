//! Contact store: the displayed page plus the query state that produced it.

use tracing::{debug, warn};

use super::{StoreEvent, SubscriptionId, Subscribers};
use crate::api::{ApiResult, ContactApi, CODE_CREATED, CODE_OK};
use crate::models::{
    Contact, ContactCreate, ContactPage, ContactQuery, ContactUpdate, Pagination, SortField,
    SortOrder,
};
use crate::utils::Field;

/// Substring of the server's duplicate-phone error message
pub const DUPLICATE_PHONE_MARKER: &str = "电话号码已存在";
pub const DUPLICATE_PHONE_MESSAGE: &str =
    "This phone number is already registered, please enter another one";

const FETCH_FAILED: &str = "Failed to fetch contacts";
const FETCH_ONE_FAILED: &str = "Failed to fetch contact";
const CREATE_FAILED: &str = "Failed to create contact";
const UPDATE_FAILED: &str = "Failed to update contact";
const DELETE_FAILED: &str = "Failed to delete contact";
const FAVORITE_FAILED: &str = "Failed to toggle favorite status";

/// A listing request issued by [`ContactStore::begin_fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: ContactQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Effective query to send to the listing endpoint
    pub fn query(&self) -> &ContactQuery {
        &self.query
    }
}

/// Outcome of an advisory uniqueness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uniqueness {
    Available,
    Taken,
    /// The check itself failed; the message says why
    Unknown(String),
}

pub struct ContactStore<A: ContactApi> {
    api: A,
    contacts: Vec<Contact>,
    loading: bool,
    error: Option<String>,
    search_term: String,
    sort_by: SortField,
    sort_order: SortOrder,
    selected_tags: Vec<String>,
    filter_by_favorite: bool,
    pagination: Pagination,
    fetch_seq: u64,
    subscribers: Subscribers,
}

impl<A: ContactApi> ContactStore<A> {
    pub fn new(api: A, page_size: u32) -> Self {
        Self {
            api,
            contacts: Vec::new(),
            loading: false,
            error: None,
            search_term: String::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            selected_tags: Vec::new(),
            filter_by_favorite: false,
            pagination: Pagination {
                limit: page_size.max(1),
                ..Pagination::default()
            },
            fetch_seq: 0,
            subscribers: Subscribers::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    pub fn filter_by_favorite(&self) -> bool {
        self.filter_by_favorite
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
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

    // ------------------------------------------------------------------
    // Query state
    // ------------------------------------------------------------------

    /// Does not reset the page; see [`ContactStore::search`].
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.changed();
    }

    pub fn set_sort_by(&mut self, field: SortField) {
        self.sort_by = field;
        self.pagination.page = 1;
        self.changed();
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.pagination.page = 1;
        self.changed();
    }

    /// Duplicates are dropped; first occurrence wins
    pub fn set_selected_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !tag.is_empty() && !selected.contains(&tag) {
                selected.push(tag);
            }
        }
        self.selected_tags = selected;
        self.pagination.page = 1;
        self.changed();
    }

    pub fn set_filter_by_favorite(&mut self, flag: bool) {
        self.filter_by_favorite = flag;
        self.pagination.page = 1;
        self.changed();
    }

    pub fn set_pagination_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
        self.changed();
    }

    pub fn set_page_limit(&mut self, limit: u32) {
        self.pagination.limit = limit.max(1);
        self.pagination.page = 1;
        self.changed();
    }

    /// Search box handler: new term, back to the first page
    pub fn search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.pagination.page = 1;
        self.changed();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.changed();
    }

    /// Query the list view derives from current state
    pub fn current_query(&self) -> ContactQuery {
        ContactQuery {
            page: Some(self.pagination.page),
            limit: Some(self.pagination.limit),
            search: Some(self.search_term.clone()).filter(|s| !s.is_empty()),
            sort_by: Some(self.sort_by),
            order: Some(self.sort_order),
            ..ContactQuery::default()
        }
    }

    /// Fetch the page described by the current query state
    pub fn refresh(&mut self) {
        let query = self.current_query();
        self.fetch_contacts(Some(query));
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    pub fn fetch_contacts(&mut self, params: Option<ContactQuery>) {
        let ticket = self.begin_fetch(params);
        let result = self.api.list_contacts(ticket.query());
        self.complete_fetch(&ticket, result);
    }

    /// Start a listing request. Tags and the favorite filter always come
    /// from store state and override whatever `params` carries.
    pub fn begin_fetch(&mut self, params: Option<ContactQuery>) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        self.error = None;

        let mut query = params.unwrap_or_default();
        query.tags = if self.selected_tags.is_empty() {
            None
        } else {
            Some(self.selected_tags.join(","))
        };
        query.is_favorite = self.filter_by_favorite.then_some(true);
        debug!(seq = self.fetch_seq, ?query, "fetching contacts");

        self.changed();
        FetchTicket {
            seq: self.fetch_seq,
            query,
        }
    }

    /// Apply the result of a listing request.
    ///
    /// Returns false when a newer request has been issued since `ticket`;
    /// the result is then dropped without touching any state.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: ApiResult<ContactPage>) -> bool {
        if ticket.seq != self.fetch_seq {
            warn!(
                seq = ticket.seq,
                latest = self.fetch_seq,
                "discarding stale contact listing"
            );
            return false;
        }

        match result {
            Ok(envelope) if envelope.code == CODE_OK => match envelope.data {
                Some(page) => {
                    self.contacts = page.contacts;
                    self.pagination = page.pagination;
                }
                None => self.error = Some(FETCH_FAILED.to_string()),
            },
            Ok(envelope) => self.error = Some(message_or(envelope.message, FETCH_FAILED)),
            Err(e) => self.error = Some(e.message_or(FETCH_FAILED)),
        }

        self.loading = false;
        self.changed();
        true
    }

    /// Lookup in the held page only
    pub fn get_contact_by_id(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Fetch one contact from the server without touching the held page
    pub fn fetch_contact(&mut self, id: &str) -> Option<Contact> {
        self.begin_mutation();
        let result = accept(self.api.get_contact(id), &[CODE_OK], FETCH_ONE_FAILED);
        let contact = self.finish(result);
        self.changed();
        contact
    }

    /// Client-side filter of the held page by the search term
    pub fn get_filtered_contacts(&self) -> Vec<&Contact> {
        if self.search_term.is_empty() {
            return self.contacts.iter().collect();
        }
        let needle = self.search_term.to_lowercase();
        self.contacts
            .iter()
            .filter(|c| c.matches_lowercase(&needle))
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn begin_mutation(&mut self) {
        self.loading = true;
        self.error = None;
        self.changed();
    }

    /// Record a failure as state; pass a success through
    fn finish<T>(&mut self, result: Result<T, String>) -> Option<T> {
        self.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(msg) => {
                self.error = Some(msg);
                None
            }
        }
    }

    pub fn create_contact(&mut self, data: &ContactCreate) -> Option<Contact> {
        self.begin_mutation();
        let result = accept(
            self.api.create_contact(data),
            &[CODE_OK, CODE_CREATED],
            CREATE_FAILED,
        )
        .map_err(rewrite_duplicate_phone);

        let created = self.finish(result);
        if let Some(ref contact) = created {
            self.contacts.push(contact.clone());
        }
        self.changed();
        created
    }

    pub fn update_contact(&mut self, id: &str, data: &ContactUpdate) -> Option<Contact> {
        self.begin_mutation();
        let result = accept(self.api.update_contact(id, data), &[CODE_OK], UPDATE_FAILED)
            .map_err(rewrite_duplicate_phone);

        let updated = self.finish(result);
        if let Some(ref contact) = updated {
            self.replace(id, contact.clone());
        }
        self.changed();
        updated
    }

    /// Removes the entry locally once the server confirms. Does not re-fetch.
    pub fn delete_contact(&mut self, id: &str) -> bool {
        self.begin_mutation();
        let result = match self.api.delete_contact(id) {
            Ok(envelope) if envelope.code == CODE_OK => Ok(()),
            Ok(envelope) => Err(message_or(envelope.message, DELETE_FAILED)),
            Err(e) => Err(e.message_or(DELETE_FAILED)),
        };

        let deleted = self.finish(result).is_some();
        if deleted {
            self.contacts.retain(|c| c.id != id);
        }
        self.changed();
        deleted
    }

    /// Flip the favorite flag. When the list is filtered to favorites the
    /// page is re-fetched, since the contact may have left the result set.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<Contact> {
        self.begin_mutation();
        let result = accept(self.api.toggle_favorite(id), &[CODE_OK], FAVORITE_FAILED);

        let toggled = self.finish(result);
        if let Some(ref contact) = toggled {
            self.replace(id, contact.clone());
            if self.filter_by_favorite {
                self.refresh();
            }
        }
        self.loading = false;
        self.changed();
        toggled
    }

    fn replace(&mut self, id: &str, contact: Contact) {
        for c in self.contacts.iter_mut().filter(|c| c.id == id) {
            *c = contact.clone();
        }
    }

    // ------------------------------------------------------------------
    // Form support
    // ------------------------------------------------------------------

    /// Advisory pre-submit check that no other contact uses `value`.
    ///
    /// `editing` is the contact being edited, if any; an unchanged value is
    /// always available. Does not touch store state.
    pub fn check_unique(&self, field: Field, value: &str, editing: Option<&Contact>) -> Uniqueness {
        let current = match field {
            Field::Phone => editing.map(|c| c.phone.as_str()),
            Field::Email => editing.and_then(|c| c.email.as_deref()),
            Field::Name => return Uniqueness::Available,
        };
        if value.is_empty() || current == Some(value) {
            return Uniqueness::Available;
        }

        let failed = || format!("Could not check {} uniqueness, please retry", field.label());
        let page = match self.api.list_contacts(&ContactQuery::search(value)) {
            Ok(envelope) if envelope.code == CODE_OK => match envelope.data {
                Some(page) => page,
                None => return Uniqueness::Unknown(failed()),
            },
            Ok(envelope) => return Uniqueness::Unknown(message_or(envelope.message, &failed())),
            Err(e) => {
                debug!("uniqueness check failed: {e}");
                return Uniqueness::Unknown(failed());
            }
        };

        let editing_id = editing.map(|c| c.id.as_str());
        let taken = page
            .contacts
            .iter()
            .filter(|c| Some(c.id.as_str()) != editing_id)
            .any(|c| match field {
                Field::Phone => c.phone == value,
                Field::Email => c
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(value)),
                Field::Name => false,
            });

        if taken {
            Uniqueness::Taken
        } else {
            Uniqueness::Available
        }
    }
}

/// Success envelope → its data; anything else → a user-facing message
fn accept<T>(result: ApiResult<T>, success: &[i32], fallback: &str) -> Result<T, String> {
    match result {
        Ok(envelope) if success.contains(&envelope.code) => {
            envelope.data.ok_or_else(|| fallback.to_string())
        }
        Ok(envelope) => Err(message_or(envelope.message, fallback)),
        Err(e) => Err(e.message_or(fallback)),
    }
}

fn message_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn rewrite_duplicate_phone(message: String) -> String {
    if message.contains(DUPLICATE_PHONE_MARKER) {
        DUPLICATE_PHONE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Envelope};
    use crate::store::testing::{contact, Failure, FakeContactServer};
    use crate::store::NoticeLevel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seeded() -> ContactStore<FakeContactServer> {
        let mut alice = contact("1", "Alice Wong", "13800138001");
        alice.email = Some("alice@example.com".to_string());
        alice.company = Some("Acme".to_string());
        alice.tags = vec!["work".to_string()];

        let mut bob = contact("2", "Bob Li", "13800138002");
        bob.address = Some("Shanghai".to_string());
        bob.is_favorite = true;
        bob.tags = vec!["family".to_string(), "work".to_string()];

        let carol = contact("3", "Carol Zhang", "13800138003");

        ContactStore::new(FakeContactServer::with_contacts(vec![alice, bob, carol]), 10)
    }

    fn loaded() -> ContactStore<FakeContactServer> {
        let mut store = seeded();
        store.fetch_contacts(None);
        assert_eq!(store.contacts().len(), 3);
        store
    }

    #[test]
    fn test_filter_setters_reset_page() {
        let mut store = seeded();

        store.set_pagination_page(4);
        store.set_sort_by(SortField::Name);
        assert_eq!(store.pagination().page, 1);

        store.set_pagination_page(4);
        store.set_sort_order(SortOrder::Asc);
        assert_eq!(store.pagination().page, 1);

        store.set_pagination_page(4);
        store.set_selected_tags(["work"]);
        assert_eq!(store.pagination().page, 1);

        store.set_pagination_page(4);
        store.set_filter_by_favorite(true);
        assert_eq!(store.pagination().page, 1);
    }

    #[test]
    fn test_set_search_term_keeps_page() {
        let mut store = seeded();
        store.set_pagination_page(3);
        store.set_search_term("ali");
        assert_eq!(store.pagination().page, 3);

        store.search("bob");
        assert_eq!(store.search_term(), "bob");
        assert_eq!(store.pagination().page, 1);
    }

    #[test]
    fn test_selected_tags_dedup() {
        let mut store = seeded();
        store.set_selected_tags(vec!["work", "family", "work", ""]);
        assert_eq!(store.selected_tags(), ["work", "family"]);
    }

    #[test]
    fn test_fetch_composes_tags_and_favorite() {
        let mut store = seeded();
        store.set_selected_tags(["work", "family"]);
        store.set_filter_by_favorite(true);

        let explicit = ContactQuery {
            page: Some(1),
            tags: Some("ignored".to_string()),
            is_favorite: Some(false),
            ..Default::default()
        };
        store.fetch_contacts(Some(explicit));

        let sent = store.api().last_query().unwrap();
        assert_eq!(sent.tags.as_deref(), Some("work,family"));
        assert_eq!(sent.is_favorite, Some(true));
        assert_eq!(sent.page, Some(1));
        assert_eq!(store.contacts().len(), 1);
        assert_eq!(store.contacts()[0].id, "2");
    }

    #[test]
    fn test_fetch_omits_empty_filters() {
        let mut store = seeded();
        store.fetch_contacts(None);

        let sent = store.api().last_query().unwrap();
        assert_eq!(sent.tags, None);
        assert_eq!(sent.is_favorite, None);
    }

    #[test]
    fn test_fetch_replaces_wholesale() {
        let mut store = loaded();
        assert_eq!(store.pagination().total, 3);

        store.api().contacts.borrow_mut().truncate(1);
        store.fetch_contacts(None);

        assert_eq!(store.contacts().len(), 1);
        assert_eq!(
            *store.pagination(),
            Pagination {
                total: 1,
                page: 1,
                limit: 10,
                total_pages: 1
            }
        );
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_fetch_envelope_error_keeps_data() {
        let mut store = loaded();
        let before = store.contacts().to_vec();
        let pagination = *store.pagination();

        store.api().fail_next(Failure::Envelope(500, "database unavailable"));
        store.fetch_contacts(None);

        assert_eq!(store.contacts(), before.as_slice());
        assert_eq!(*store.pagination(), pagination);
        assert_eq!(store.error(), Some("database unavailable"));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_fetch_transport_error_keeps_data() {
        let mut store = loaded();
        let before = store.contacts().to_vec();

        store
            .api()
            .fail_next(Failure::Transport(ApiError::Network("connection refused".to_string())));
        store.fetch_contacts(None);

        assert_eq!(store.contacts(), before.as_slice());
        assert_eq!(store.error(), Some("Failed to fetch contacts"));
        assert!(!store.is_loading());

        store.api().fail_next(Failure::Transport(ApiError::Http {
            status: 401,
            body: r#"{"message":"请先登录"}"#.to_string(),
        }));
        store.fetch_contacts(None);
        assert_eq!(store.error(), Some("请先登录"));
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut store = loaded();

        let older = store.begin_fetch(None);
        let newer = store.begin_fetch(None);
        assert!(newer.seq() > older.seq());

        let fresh = ContactPage {
            contacts: vec![contact("9", "Newest", "13900000000")],
            pagination: Pagination {
                total: 1,
                page: 1,
                limit: 10,
                total_pages: 1,
            },
        };
        assert!(store.complete_fetch(&newer, Ok(Envelope::ok(fresh))));
        assert!(!store.is_loading());

        let stale = ContactPage {
            contacts: vec![],
            pagination: Pagination::default(),
        };
        assert!(!store.complete_fetch(&older, Ok(Envelope::ok(stale))));
        assert_eq!(store.contacts().len(), 1);
        assert_eq!(store.contacts()[0].id, "9");
    }

    #[test]
    fn test_refresh_uses_current_query() {
        let mut store = seeded();
        store.search("li");
        store.set_sort_by(SortField::Name);
        store.set_sort_order(SortOrder::Asc);
        store.refresh();

        let sent = store.api().last_query().unwrap();
        assert_eq!(sent.search.as_deref(), Some("li"));
        assert_eq!(sent.sort_by, Some(SortField::Name));
        assert_eq!(sent.order, Some(SortOrder::Asc));
        assert_eq!(sent.page, Some(1));
        assert_eq!(sent.limit, Some(10));
    }

    #[test]
    fn test_current_query_omits_empty_search() {
        let store = seeded();
        let q = store.current_query();
        assert_eq!(q.search, None);
        assert_eq!(q.sort_by, Some(SortField::CreatedAt));
        assert_eq!(q.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_get_contact_by_id_uses_held_page() {
        let mut store = seeded();
        assert!(store.get_contact_by_id("1").is_none());
        store.fetch_contacts(None);
        assert_eq!(store.get_contact_by_id("1").unwrap().name, "Alice Wong");
        assert!(store.get_contact_by_id("missing").is_none());
    }

    #[test]
    fn test_fetch_contact_leaves_page_alone() {
        let mut store = seeded();
        let fetched = store.fetch_contact("2").unwrap();
        assert_eq!(fetched.name, "Bob Li");
        assert!(store.contacts().is_empty());

        assert!(store.fetch_contact("missing").is_none());
        assert_eq!(store.error(), Some("联系人不存在"));
    }

    #[test]
    fn test_create_appends_returned_contact() {
        let mut store = loaded();
        let data = ContactCreate {
            name: "Dave".to_string(),
            phone: "13700137000".to_string(),
            ..Default::default()
        };

        let created = store.create_contact(&data).unwrap();
        let matching: Vec<_> = store.contacts().iter().filter(|c| c.id == created.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(*matching[0], created);
        assert_eq!(store.contacts().last().unwrap().name, "Dave");
        assert!(!store.is_loading());
    }

    #[test]
    fn test_create_duplicate_phone_rewritten() {
        let mut store = loaded();
        let data = ContactCreate {
            name: "Copycat".to_string(),
            phone: "13800138001".to_string(),
            ..Default::default()
        };

        assert!(store.create_contact(&data).is_none());
        assert_eq!(store.error(), Some(DUPLICATE_PHONE_MESSAGE));
        assert_eq!(store.contacts().len(), 3);
    }

    #[test]
    fn test_create_other_errors_pass_through() {
        let mut store = loaded();
        let data = ContactCreate {
            name: "Dave".to_string(),
            phone: "13700137000".to_string(),
            ..Default::default()
        };

        store.api().fail_next(Failure::Envelope(422, "name too short"));
        assert!(store.create_contact(&data).is_none());
        assert_eq!(store.error(), Some("name too short"));

        store
            .api()
            .fail_next(Failure::Transport(ApiError::Network("timed out".to_string())));
        assert!(store.create_contact(&data).is_none());
        assert_eq!(store.error(), Some("Failed to create contact"));
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = loaded();
        let update = ContactUpdate {
            company: Some("Globex".to_string()),
            ..Default::default()
        };

        let updated = store.update_contact("1", &update).unwrap();
        assert_eq!(updated.company.as_deref(), Some("Globex"));

        let matching: Vec<_> = store.contacts().iter().filter(|c| c.id == "1").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(*matching[0], updated);
        assert_eq!(store.contacts()[0].id, "1");
    }

    #[test]
    fn test_update_duplicate_phone() {
        let mut store = loaded();
        let update = ContactUpdate {
            phone: Some("13800138002".to_string()),
            ..Default::default()
        };
        assert!(store.update_contact("1", &update).is_none());
        assert_eq!(store.error(), Some(DUPLICATE_PHONE_MESSAGE));
        assert_eq!(store.get_contact_by_id("1").unwrap().phone, "13800138001");
    }

    #[test]
    fn test_delete_success_and_failure() {
        let mut store = loaded();

        assert!(store.delete_contact("2"));
        assert!(store.get_contact_by_id("2").is_none());
        assert_eq!(store.contacts().len(), 2);

        let before = store.contacts().to_vec();
        assert!(!store.delete_contact("missing"));
        assert_eq!(store.contacts(), before.as_slice());
        assert_eq!(store.error(), Some("联系人不存在"));

        store
            .api()
            .fail_next(Failure::Transport(ApiError::Network("offline".to_string())));
        assert!(!store.delete_contact("1"));
        assert_eq!(store.error(), Some("Failed to delete contact"));
        assert_eq!(store.contacts(), before.as_slice());
    }

    #[test]
    fn test_delete_does_not_refetch() {
        let mut store = loaded();
        let queries = store.api().query_count();
        store.delete_contact("1");
        assert_eq!(store.api().query_count(), queries);
    }

    #[test]
    fn test_toggle_favorite_replaces_in_place() {
        let mut store = loaded();
        let queries = store.api().query_count();

        let toggled = store.toggle_favorite("1").unwrap();
        assert!(toggled.is_favorite);
        assert!(store.get_contact_by_id("1").unwrap().is_favorite);
        assert_eq!(store.api().query_count(), queries);
    }

    #[test]
    fn test_toggle_favorite_refetches_when_filtered() {
        let mut store = seeded();
        store.set_filter_by_favorite(true);
        store.fetch_contacts(None);
        assert_eq!(store.contacts().len(), 1);
        assert_eq!(store.contacts()[0].id, "2");

        store.toggle_favorite("2");

        assert!(store.get_contact_by_id("2").is_none());
        assert!(store.contacts().is_empty());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_toggle_favorite_failure() {
        let mut store = loaded();
        assert!(store.toggle_favorite("missing").is_none());
        assert_eq!(store.error(), Some("联系人不存在"));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_filtered_contacts() {
        let mut store = loaded();
        assert_eq!(store.get_filtered_contacts().len(), 3);

        store.set_search_term("ACME");
        let ids: Vec<&str> = store.get_filtered_contacts().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        store.set_search_term("shang");
        let ids: Vec<&str> = store.get_filtered_contacts().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);

        store.set_search_term("1380013800");
        assert_eq!(store.get_filtered_contacts().len(), 3);

        store.set_search_term("nobody");
        assert!(store.get_filtered_contacts().is_empty());
    }

    #[test]
    fn test_check_unique_phone() {
        let store = loaded();
        let alice = store.get_contact_by_id("1").unwrap().clone();

        assert_eq!(store.check_unique(Field::Phone, "13800138002", None), Uniqueness::Taken);
        assert_eq!(store.check_unique(Field::Phone, "13999999999", None), Uniqueness::Available);
        // unchanged while editing
        assert_eq!(
            store.check_unique(Field::Phone, "13800138001", Some(&alice)),
            Uniqueness::Available
        );
        assert_eq!(
            store.check_unique(Field::Phone, "13800138002", Some(&alice)),
            Uniqueness::Taken
        );
    }

    #[test]
    fn test_check_unique_email() {
        let store = loaded();
        let alice = store.get_contact_by_id("1").unwrap().clone();
        let bob = store.get_contact_by_id("2").unwrap().clone();

        assert_eq!(
            store.check_unique(Field::Email, "Alice@Example.com", None),
            Uniqueness::Taken
        );
        assert_eq!(
            store.check_unique(Field::Email, "alice@example.com", Some(&alice)),
            Uniqueness::Available
        );
        assert_eq!(
            store.check_unique(Field::Email, "alice@example.com", Some(&bob)),
            Uniqueness::Taken
        );
        assert_eq!(store.check_unique(Field::Email, "", None), Uniqueness::Available);
    }

    #[test]
    fn test_check_unique_does_not_touch_state() {
        let store = loaded();
        store
            .api()
            .fail_next(Failure::Transport(ApiError::Network("offline".to_string())));

        let result = store.check_unique(Field::Phone, "13999999999", None);
        assert_eq!(
            result,
            Uniqueness::Unknown("Could not check phone uniqueness, please retry".to_string())
        );
        assert!(store.error().is_none());
        assert_eq!(store.contacts().len(), 3);
    }

    #[test]
    fn test_emits_changed_events() {
        let mut store = seeded();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = store.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        store.set_sort_by(SortField::Name);
        store.fetch_contacts(None);

        assert!(events.borrow().len() >= 3);
        assert!(events
            .borrow()
            .iter()
            .all(|e| matches!(e, StoreEvent::Changed)));
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e, StoreEvent::Notice(n) if n.level == NoticeLevel::Error)));

        assert!(store.unsubscribe(id));
    }
}
