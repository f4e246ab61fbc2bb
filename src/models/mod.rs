mod contact;
mod user;

pub use contact::{
    Contact, ContactCreate, ContactPage, ContactQuery, ContactUpdate, Pagination, SortField,
    SortOrder, DEFAULT_PAGE_SIZE,
};
pub use user::{AuthSession, LoginCredentials, RegisterCredentials, User};
