use anyhow::{anyhow, Result};

use crate::app::App;
use crate::cli::form::{check_uniqueness, ContactForm};
use crate::models::{Contact, ContactUpdate};

/// Only values that differ from `current` end up in the update. An empty
/// string for an optional field that is set clears it; one that is already
/// unset is left alone.
pub fn build_update(form: &ContactForm, current: &Contact) -> ContactUpdate {
    fn changed(new: &Option<String>, old: Option<&str>) -> Option<String> {
        let new = new.as_deref()?;
        (new != old.unwrap_or("")).then(|| new.to_string())
    }

    ContactUpdate {
        name: changed(&form.name, Some(current.name.as_str())),
        phone: changed(&form.phone, Some(current.phone.as_str())),
        email: changed(&form.email, current.email.as_deref()),
        address: changed(&form.address, current.address.as_deref()),
        company: changed(&form.company, current.company.as_deref()),
        notes: changed(&form.notes, current.notes.as_deref()),
        tags: form.tag_list().filter(|t| *t != current.tags),
        is_favorite: None,
    }
}

/// Execute the update command
pub fn run_update(app: &mut App, id: &str, form: ContactForm) -> Result<()> {
    app.require_login()?;

    let current = app
        .contacts
        .fetch_contact(id)
        .ok_or_else(|| anyhow!("{}", app.contacts.error().unwrap_or("Contact not found")))?;

    let form = if form.is_empty() {
        match ContactForm::prompt(Some(&current))? {
            Some(f) => f,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        form
    };

    form.validate()?;
    let update = build_update(&form, &current);
    if update.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    check_uniqueness(&app.contacts, &form, Some(&current))?;

    match app.contacts.update_contact(id, &update) {
        Some(contact) => {
            println!("Saved: {}", contact.name);
            Ok(())
        }
        None => Err(anyhow!(
            "{}",
            app.contacts.error().unwrap_or("Failed to update contact")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_only_changes() {
        let mut current = Contact::new("1", "Alice", "13800138000");
        current.company = Some("Acme".to_string());
        current.tags = vec!["work".to_string()];

        let form = ContactForm {
            name: Some("Alice".to_string()),
            phone: Some("13800138000".to_string()),
            company: Some("Globex".to_string()),
            tags: Some("work".to_string()),
            ..Default::default()
        };
        let update = build_update(&form, &current);

        assert_eq!(
            update,
            ContactUpdate {
                company: Some("Globex".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_build_update_no_changes() {
        let current = Contact::new("1", "Alice", "13800138000");
        let form = ContactForm {
            name: Some("Alice".to_string()),
            ..Default::default()
        };
        assert!(build_update(&form, &current).is_empty());
    }

    #[test]
    fn test_build_update_clears_erased_fields() {
        let mut current = Contact::new("1", "Alice", "13800138000");
        current.email = Some("alice@example.com".to_string());
        current.notes = Some("met at conf".to_string());

        let form = ContactForm {
            name: Some("Alice".to_string()),
            phone: Some("13800138000".to_string()),
            email: Some(String::new()),
            company: Some(String::new()),
            notes: Some("met at conf".to_string()),
            ..Default::default()
        };
        let update = build_update(&form, &current);

        assert_eq!(
            update,
            ContactUpdate {
                email: Some(String::new()),
                ..Default::default()
            }
        );
        assert!(serde_json::to_value(&update).unwrap().get("company").is_none());
    }
}
