use anyhow::{anyhow, Result};

use crate::app::App;
use crate::cli::display::print_full_contact;
use crate::cli::ui::confirm;

/// Execute the show command
pub fn run_show(app: &mut App, id: &str) -> Result<()> {
    app.require_login()?;

    let contact = app
        .contacts
        .fetch_contact(id)
        .ok_or_else(|| anyhow!("{}", app.contacts.error().unwrap_or("Contact not found")))?;

    print_full_contact(&contact);
    Ok(())
}

/// Execute the favorite command
pub fn run_favorite(app: &mut App, id: &str) -> Result<()> {
    app.require_login()?;

    match app.contacts.toggle_favorite(id) {
        Some(contact) if contact.is_favorite => {
            println!("★ {}", contact.name);
            Ok(())
        }
        Some(contact) => {
            println!("☆ {}", contact.name);
            Ok(())
        }
        None => Err(anyhow!(
            "{}",
            app.contacts
                .error()
                .unwrap_or("Failed to toggle favorite status")
        )),
    }
}

/// Execute the delete command
pub fn run_delete(app: &mut App, id: &str, yes: bool) -> Result<()> {
    app.require_login()?;

    let contact = app
        .contacts
        .fetch_contact(id)
        .ok_or_else(|| anyhow!("{}", app.contacts.error().unwrap_or("Contact not found")))?;

    if !yes && !confirm(&format!("Delete {}?", contact.name), false) {
        println!("Cancelled.");
        return Ok(());
    }

    if app.contacts.delete_contact(id) {
        println!("Deleted.");
        Ok(())
    } else {
        Err(anyhow!(
            "{}",
            app.contacts.error().unwrap_or("Failed to delete contact")
        ))
    }
}
