use anyhow::{anyhow, Result};

use crate::app::App;
use crate::cli::ui::{print_notice, prompt_field, prompt_password, FormResult};
use crate::models::{LoginCredentials, RegisterCredentials};
use crate::store::StoreEvent;
use crate::utils::validate_email;

/// Ask for the email unless it was given on the command line
fn resolve_email(email: Option<String>) -> Result<Option<String>> {
    let email = match email {
        Some(e) => e,
        None => match prompt_field("email", None)? {
            FormResult::Value(v) => v,
            FormResult::Cancelled => return Ok(None),
        },
    };

    if !validate_email(&email) {
        return Err(anyhow!("Invalid email format: {}", email));
    }
    Ok(Some(email))
}

fn resolve_password(password: Option<String>) -> Result<Option<String>> {
    match password {
        Some(p) => Ok(Some(p)),
        None => prompt_password("password"),
    }
}

fn show_notices(app: &mut App) -> u64 {
    app.auth.subscribe(|event| {
        if let StoreEvent::Notice(notice) = event {
            print_notice(notice);
        }
    })
}

pub fn run_login(app: &mut App, email: Option<String>, password: Option<String>) -> Result<()> {
    let Some(email) = resolve_email(email)? else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(password) = resolve_password(password)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let sub = show_notices(app);
    let ok = app.auth.login(&LoginCredentials {
        email,
        password: Some(password),
    });
    app.auth.unsubscribe(sub);

    if ok {
        if let Some(user) = app.auth.user() {
            println!("Signed in as {}", user.display_name());
        }
        Ok(())
    } else {
        Err(anyhow!("Login failed"))
    }
}

pub fn run_register(
    app: &mut App,
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let Some(email) = resolve_email(email)? else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(password) = resolve_password(password)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let sub = show_notices(app);
    let ok = app.auth.register(&RegisterCredentials {
        email,
        password: Some(password),
        name: name.filter(|n| !n.trim().is_empty()),
    });
    app.auth.unsubscribe(sub);

    if ok {
        println!("Next: contactdesk login");
        Ok(())
    } else {
        Err(anyhow!("Registration failed"))
    }
}

pub fn run_logout(app: &mut App) -> Result<()> {
    if !app.auth.is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }

    let sub = show_notices(app);
    app.auth.logout();
    app.auth.unsubscribe(sub);
    Ok(())
}

pub fn run_whoami(app: &App) -> Result<()> {
    match app.auth.user() {
        Some(user) if app.auth.is_logged_in() => {
            println!("{}", user.display_name());
            if user.name.is_some() {
                println!("  {}", user.email);
            }
            println!("  {}", app.config.effective_api_url());
        }
        _ => println!("Not logged in."),
    }
    Ok(())
}
