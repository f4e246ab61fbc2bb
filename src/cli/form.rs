//! Contact form: field prompts, validation and advisory uniqueness checks
//! shared by `add` and `update`.

use anyhow::{anyhow, Result};

use crate::api::ContactApi;
use crate::cli::ui::{prompt_field, warning, FormResult};
use crate::models::Contact;
use crate::store::{ContactStore, Uniqueness};
use crate::utils::{validation_message, Field};

/// Raw form values, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<String>,
}

impl ContactForm {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Tags typed as a comma-separated list
    pub fn tag_list(&self) -> Option<Vec<String>> {
        self.tags.as_ref().map(|t| parse_tags(t))
    }

    /// Check every present value; returns all failures at once
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        for (field, value) in [
            (Field::Name, &self.name),
            (Field::Phone, &self.phone),
            (Field::Email, &self.email),
        ] {
            if let Some(v) = value {
                if let Some(msg) = validation_message(field, v) {
                    problems.push(format!("{}: {}", field.label(), msg));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(problems.join("\n")))
        }
    }

    /// Prompt for every field, grouped as basics, details, then notes and tags.
    /// `current` pre-fills the fields when editing, and an erased field comes
    /// back as `Some("")` so the update can clear it. `None` means cancelled.
    pub fn prompt(current: Option<&Contact>) -> Result<Option<Self>> {
        let editing = current.is_some();
        let tags_default = current.map(|c| c.tags.join(", "));
        let steps: [(&str, Option<&str>); 7] = [
            ("name", current.map(|c| c.name.as_str())),
            ("phone", current.map(|c| c.phone.as_str())),
            ("email", current.and_then(|c| c.email.as_deref())),
            ("company", current.and_then(|c| c.company.as_deref())),
            ("address", current.and_then(|c| c.address.as_deref())),
            ("notes", current.and_then(|c| c.notes.as_deref())),
            ("tags", tags_default.as_deref()),
        ];

        let mut values = Vec::with_capacity(steps.len());
        for (label, default) in steps {
            match prompt_field(label, default)? {
                FormResult::Value(v) => {
                    values.push(Some(v).filter(|v| editing || !v.is_empty()))
                }
                FormResult::Cancelled => return Ok(None),
            }
        }

        let mut it = values.into_iter();
        let mut next = || it.next().flatten();
        Ok(Some(Self {
            name: next(),
            phone: next(),
            email: next(),
            company: next(),
            address: next(),
            notes: next(),
            tags: next(),
        }))
    }
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Run the advisory phone/email checks. Taken values are errors; a failed
/// check only warns, since the server enforces uniqueness anyway.
pub fn check_uniqueness<A: ContactApi>(
    store: &ContactStore<A>,
    form: &ContactForm,
    editing: Option<&Contact>,
) -> Result<()> {
    for (field, value) in [(Field::Phone, &form.phone), (Field::Email, &form.email)] {
        let Some(value) = value else { continue };
        match store.check_unique(field, value, editing) {
            Uniqueness::Available => {}
            Uniqueness::Taken => {
                return Err(anyhow!("This {} is already registered", field.label()));
            }
            Uniqueness::Unknown(msg) => warning(&msg),
        }
    }
    Ok(())
}
