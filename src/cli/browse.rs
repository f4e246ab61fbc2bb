//! Interactive contact browser: live search, paging, sorting, favorites.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Stylize;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use crate::api::ContactApi;
use crate::app::App;
use crate::cli::display::{format_contact_row, format_pagination, print_full_contact, print_table_header};
use crate::cli::ui::{clear_screen, confirm, term_size, RawModeGuard};
use crate::store::ContactStore;
use crate::utils::{Debouncer, SEARCH_DEBOUNCE};

const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Backspace,
    ClearSearch,
    Up,
    Down,
    PrevPage,
    NextPage,
    CycleSort,
    FlipOrder,
    ToggleFavoriteFilter,
    ToggleFavorite,
    Delete,
    Open,
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('f') if ctrl => Some(Action::ToggleFavoriteFilter),
        KeyCode::Char('s') if ctrl => Some(Action::ToggleFavorite),
        KeyCode::Char('d') if ctrl => Some(Action::Delete),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Action::Type(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Tab => Some(Action::CycleSort),
        KeyCode::BackTab => Some(Action::FlipOrder),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Esc => Some(Action::ClearSearch),
        _ => None,
    }
}

/// What the loop should do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Open(String),
    ConfirmDelete(String),
    Quit,
}

/// Screen state that lives outside the store
pub struct BrowseState {
    pub input: String,
    pub cursor: usize,
    /// Rows the screen has room for
    pub visible_rows: usize,
    pub debouncer: Debouncer<String>,
}

impl BrowseState {
    pub fn new(input: String) -> Self {
        Self {
            input,
            cursor: 0,
            visible_rows: usize::MAX,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    fn selected_id<A: ContactApi>(&self, store: &ContactStore<A>) -> Option<String> {
        store.contacts().get(self.cursor).map(|c| c.id.clone())
    }

    fn clamp_cursor(&mut self, len: usize) {
        let shown = len.min(self.visible_rows);
        self.cursor = self.cursor.min(shown.saturating_sub(1));
    }

    /// Push the search term to the store once typing has paused
    pub fn poll_search<A: ContactApi>(&mut self, store: &mut ContactStore<A>, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(term) => {
                store.search(term);
                store.refresh();
                self.cursor = 0;
                true
            }
            None => false,
        }
    }

    pub fn apply<A: ContactApi>(
        &mut self,
        store: &mut ContactStore<A>,
        action: Action,
        now: Instant,
    ) -> Flow {
        match action {
            Action::Type(c) => {
                self.input.push(c);
                self.debouncer.push(self.input.clone(), now);
            }
            Action::Backspace => {
                self.input.pop();
                self.debouncer.push(self.input.clone(), now);
            }
            Action::ClearSearch => {
                if self.input.is_empty() && store.search_term().is_empty() {
                    return Flow::Quit;
                }
                self.input.clear();
                self.debouncer.flush();
                store.search("");
                store.refresh();
                self.cursor = 0;
            }
            Action::Up => self.cursor = self.cursor.saturating_sub(1),
            Action::Down => {
                self.cursor += 1;
                self.clamp_cursor(store.contacts().len());
            }
            Action::PrevPage => {
                let page = store.pagination().page;
                if page > 1 {
                    store.set_pagination_page(page - 1);
                    store.refresh();
                    self.cursor = 0;
                }
            }
            Action::NextPage => {
                let p = *store.pagination();
                if p.page < p.total_pages {
                    store.set_pagination_page(p.page + 1);
                    store.refresh();
                    self.cursor = 0;
                }
            }
            Action::CycleSort => {
                store.set_sort_by(store.sort_by().next());
                store.refresh();
                self.cursor = 0;
            }
            Action::FlipOrder => {
                store.set_sort_order(store.sort_order().reversed());
                store.refresh();
                self.cursor = 0;
            }
            Action::ToggleFavoriteFilter => {
                store.set_filter_by_favorite(!store.filter_by_favorite());
                store.refresh();
                self.cursor = 0;
            }
            Action::ToggleFavorite => {
                if let Some(id) = self.selected_id(store) {
                    store.toggle_favorite(&id);
                    self.clamp_cursor(store.contacts().len());
                }
            }
            Action::Delete => {
                if let Some(id) = self.selected_id(store) {
                    return Flow::ConfirmDelete(id);
                }
            }
            Action::Open => {
                if let Some(id) = self.selected_id(store) {
                    return Flow::Open(id);
                }
            }
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

fn render<A: ContactApi>(store: &ContactStore<A>, state: &BrowseState) -> Result<()> {
    clear_screen()?;
    let styled = io::stdout().is_terminal();

    let mut filters = vec![format!(
        "sort: {} {}",
        store.sort_by().as_str(),
        store.sort_order().as_str()
    )];
    if store.filter_by_favorite() {
        filters.push("★ only".to_string());
    }
    if !store.selected_tags().is_empty() {
        filters.push(format!("#{}", store.selected_tags().join(" #")));
    }
    println!("search: {}", state.input);
    println!("{}\n", filters.join("  "));

    print_table_header();
    let rows = state.visible_rows;
    let keyword = store.search_term();
    for (i, contact) in store.contacts().iter().take(rows).enumerate() {
        println!("{}", format_contact_row(contact, keyword, i == state.cursor, styled));
    }
    if store.contacts().is_empty() {
        println!("   No contacts.");
    }

    println!("\n{}", format_pagination(store.pagination()));
    if let Some(err) = store.error() {
        println!("{}", err.red());
    }
    println!(
        "[↑↓] move [←→] page [tab] sort [shift-tab] order [^f] ★ filter [^s] ★ [^d] delete [enter] view [esc] back"
    );
    Ok(())
}

/// Table rows that fit under the header and above the status lines
fn visible_rows() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(8).max(5)
}

/// Wait for the next key, giving up when `timeout` passes
fn next_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    let _guard = RawModeGuard::new()?;
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

fn wait_for_key() -> Result<()> {
    let _guard = RawModeGuard::new()?;
    loop {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            if matches!(code, KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(());
            }
        }
    }
}

/// Execute the browse command
pub fn run_browse(app: &mut App, search: Option<String>, favorites: bool) -> Result<()> {
    app.require_login()?;

    let store = &mut app.contacts;
    let mut state = BrowseState::new(search.clone().unwrap_or_default());
    if favorites {
        store.set_filter_by_favorite(true);
    }
    store.search(search.unwrap_or_default());
    store.refresh();

    loop {
        state.visible_rows = visible_rows();
        state.clamp_cursor(store.contacts().len());
        render(store, &state)?;

        let timeout = state
            .debouncer
            .remaining(Instant::now())
            .unwrap_or(IDLE_POLL);
        let Some(key) = next_key(timeout)? else {
            state.poll_search(store, Instant::now());
            continue;
        };
        let Some(action) = action_for(key) else {
            continue;
        };

        match state.apply(store, action, Instant::now()) {
            Flow::Continue => {}
            Flow::Quit => break,
            Flow::Open(id) => {
                if let Some(contact) = store.get_contact_by_id(&id) {
                    clear_screen()?;
                    print_full_contact(contact);
                    println!("\n[enter] back");
                    wait_for_key()?;
                }
            }
            Flow::ConfirmDelete(id) => {
                let name = store
                    .get_contact_by_id(&id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| id.clone());
                if confirm(&format!("Delete {}?", name), false) && store.delete_contact(&id) {
                    store.refresh();
                    state.cursor = 0;
                }
            }
        }
    }

    Ok(())
}
