use anyhow::{anyhow, Result};

use crate::app::App;
use crate::cli::form::{check_uniqueness, ContactForm};
use crate::models::ContactCreate;
use crate::utils::validate_contact;

/// Turn a filled-in form into a create request; name and phone are required
pub fn build_create(form: &ContactForm, favorite: bool) -> Result<ContactCreate> {
    let name = form
        .name
        .clone()
        .ok_or_else(|| anyhow!("name: Please enter a name"))?;
    let phone = form
        .phone
        .clone()
        .ok_or_else(|| anyhow!("phone: Please enter a phone number"))?;

    Ok(ContactCreate {
        name,
        phone,
        email: form.email.clone(),
        address: form.address.clone(),
        company: form.company.clone(),
        notes: form.notes.clone(),
        tags: form.tag_list().unwrap_or_default(),
        is_favorite: favorite.then_some(true),
    })
}

/// Every field problem of `data`, one per line
pub fn check_create(data: &ContactCreate) -> Result<()> {
    let problems = validate_contact(data);
    if problems.is_empty() {
        return Ok(());
    }
    Err(anyhow!(problems
        .iter()
        .map(|(field, msg)| format!("{}: {}", field.label(), msg))
        .collect::<Vec<_>>()
        .join("\n")))
}

/// Execute the add command
pub fn run_add(app: &mut App, form: ContactForm, favorite: bool) -> Result<()> {
    app.require_login()?;

    // No fields on the command line: ask for them
    let form = if form.is_empty() {
        match ContactForm::prompt(None)? {
            Some(f) => f,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        form
    };

    let data = build_create(&form, favorite)?;
    check_create(&data)?;
    check_uniqueness(&app.contacts, &form, None)?;

    match app.contacts.create_contact(&data) {
        Some(contact) => {
            println!("\nCreated: {}", contact.name);
            println!("  id {}", contact.id);
            Ok(())
        }
        None => Err(anyhow!(
            "{}",
            app.contacts.error().unwrap_or("Failed to create contact")
        )),
    }
}
