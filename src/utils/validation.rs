//! Contact form validation

use regex::Regex;
use std::sync::OnceLock;

use crate::models::ContactCreate;

/// Mainland China mobile number: 11 ASCII digits starting 13-19
pub fn validate_phone(phone: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE
        .get_or_init(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("phone pattern"))
        .is_match(phone)
}

pub fn validate_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
        })
        .is_match(email)
}

/// 2 to 50 characters
pub fn validate_name(name: &str) -> bool {
    let len = name.chars().count();
    (2..=50).contains(&len)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Email,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

/// Message to show next to a field, or `None` if the value is acceptable.
/// Email is optional; name and phone are required.
pub fn validation_message(field: Field, value: &str) -> Option<&'static str> {
    match field {
        Field::Name => {
            if value.is_empty() {
                Some("Please enter a name")
            } else if !validate_name(value) {
                Some("Name must be 2-50 characters")
            } else {
                None
            }
        }
        Field::Phone => {
            if value.is_empty() {
                Some("Please enter a phone number")
            } else if !validate_phone(value) {
                Some("Please enter a valid phone number")
            } else {
                None
            }
        }
        Field::Email => {
            if !value.is_empty() && !validate_email(value) {
                Some("Please enter a valid email address")
            } else {
                None
            }
        }
    }
}

/// Every field error of a new contact, in form order
pub fn validate_contact(data: &ContactCreate) -> Vec<(Field, &'static str)> {
    [
        (Field::Name, data.name.as_str()),
        (Field::Phone, data.phone.as_str()),
        (Field::Email, data.email.as_deref().unwrap_or("")),
    ]
    .into_iter()
    .filter_map(|(field, value)| validation_message(field, value).map(|msg| (field, msg)))
    .collect()
}
