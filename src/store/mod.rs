//! Client-side state containers
//!
//! Stores are constructed once at startup and handed to the views that need
//! them. Views do not poll: they subscribe and re-render when a store emits a
//! [`StoreEvent`].

pub mod auth;
pub mod contacts;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthStore;
pub use contacts::{ContactStore, FetchTicket, Uniqueness};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Some piece of store state changed; re-read what you render
    Changed,
    Notice(Notice),
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Listener registry owned by a store
#[derive(Default)]
pub struct Subscribers {
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.next_id += 1;
        self.listeners.push((self.next_id, Box::new(listener)));
        self.next_id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
