use anyhow::{anyhow, Result};
use std::io::{self, IsTerminal};

use crate::api::ContactApi;
use crate::app::App;
use crate::cli::display::{format_pagination, print_contact_row, print_table_header};
use crate::cli::ListArgs;
use crate::models::{SortField, SortOrder};
use crate::store::ContactStore;

/// Copy list flags into the store's query state. Page goes last since the
/// filter setters reset it.
pub fn apply_list_args<A: ContactApi>(store: &mut ContactStore<A>, args: &ListArgs) -> Result<()> {
    if let Some(limit) = args.limit {
        store.set_page_limit(limit);
    }

    if let Some(ref sort) = args.sort {
        let field = SortField::parse(sort)
            .ok_or_else(|| anyhow!("Unknown sort field '{}' (name, created, updated)", sort))?;
        store.set_sort_by(field);
    }

    if let Some(ref order) = args.order {
        let order = SortOrder::parse(order)
            .ok_or_else(|| anyhow!("Unknown sort order '{}' (asc, desc)", order))?;
        store.set_sort_order(order);
    }

    if let Some(ref tags) = args.tags {
        store.set_selected_tags(tags.split(',').map(str::trim));
    }

    if args.favorites {
        store.set_filter_by_favorite(true);
    }

    if let Some(ref term) = args.search {
        store.search(term.trim());
    }

    store.set_pagination_page(args.page);
    Ok(())
}

/// Execute the list command
pub fn run_list(app: &mut App, args: ListArgs) -> Result<()> {
    app.require_login()?;

    let store = &mut app.contacts;
    apply_list_args(store, &args)?;
    store.refresh();

    if let Some(err) = store.error() {
        return Err(anyhow!("{}", err));
    }

    if store.contacts().is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    let styled = io::stdout().is_terminal();
    let keyword = store.search_term().to_string();

    print_table_header();
    for contact in store.contacts() {
        print_contact_row(contact, &keyword, styled);
    }
    println!("\n{}", format_pagination(store.pagination()));

    Ok(())
}
