use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;

use crate::cli::ui::truncate;
use crate::models::{Contact, Pagination};
use crate::utils::highlight_text;

const NAME_WIDTH: usize = 20;
const PHONE_WIDTH: usize = 13;
const EMAIL_WIDTH: usize = 26;
const COMPANY_WIDTH: usize = 18;

/// Wrap search matches in reverse video
pub fn emphasize(text: &str, keyword: &str, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }
    highlight_text(text, keyword, |m| m.reverse().to_string())
}

/// Pad to `width` columns based on the unstyled text
fn cell(text: &str, width: usize, keyword: &str, styled: bool) -> String {
    let shown = truncate(text, width);
    let pad = width.saturating_sub(shown.chars().count());
    format!("{}{}", emphasize(&shown, keyword, styled), " ".repeat(pad))
}

pub fn print_table_header() {
    println!(
        "   {:<nw$} {:<pw$} {:<ew$} {:<cw$}",
        "NAME",
        "PHONE",
        "EMAIL",
        "COMPANY",
        nw = NAME_WIDTH,
        pw = PHONE_WIDTH,
        ew = EMAIL_WIDTH,
        cw = COMPANY_WIDTH
    );
}

/// One table row; `selected` adds a cursor marker
pub fn format_contact_row(contact: &Contact, keyword: &str, selected: bool, styled: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let star = if contact.is_favorite { "★" } else { " " };
    format!(
        "{}{} {} {} {} {}",
        marker,
        star,
        cell(&contact.name, NAME_WIDTH, keyword, styled),
        cell(&contact.phone, PHONE_WIDTH, keyword, styled),
        cell(contact.email.as_deref().unwrap_or(""), EMAIL_WIDTH, keyword, styled),
        cell(contact.company.as_deref().unwrap_or(""), COMPANY_WIDTH, keyword, styled),
    )
}

pub fn print_contact_row(contact: &Contact, keyword: &str, styled: bool) {
    println!("{}", format_contact_row(contact, keyword, false, styled));
}

/// "Page 2/5 (43 total)"
pub fn format_pagination(p: &Pagination) -> String {
    format!("Page {}/{} ({} total)", p.page, p.total_pages.max(1), p.total)
}

/// Print a full contact with only the non-empty fields
pub fn print_full_contact(contact: &Contact) {
    let star = if contact.is_favorite { " ★" } else { "" };
    println!("{}{}\n", contact.name, star);

    println!("  {}", contact.phone);
    for value in [&contact.email, &contact.company, &contact.address]
        .into_iter()
        .flatten()
    {
        if !value.is_empty() {
            println!("  {}", value);
        }
    }

    if !contact.tags.is_empty() {
        println!("  #{}", contact.tags.join(" #"));
    }

    if let Some(ref notes) = contact.notes {
        if !notes.is_empty() {
            println!("\n  {}", notes);
        }
    }

    if let Some(updated) = contact.updated_at.or(contact.created_at) {
        println!("\n  updated {}", format_timestamp(&updated));
    }
    println!("  id {}", contact.id);
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
