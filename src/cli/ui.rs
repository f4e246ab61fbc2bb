//! Shared UI primitives for contactdesk
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `search: `
//! - Navigation hints: arrows in brackets: `[←/→]` pages
//! - Feedback: single word when possible: `Saved.`

use anyhow::Result;
use crossterm::{
    cursor,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Password, PasswordDisplayMode, Text};
use std::io::{self, Write};

use crate::store::{Notice, NoticeLevel};

/// RAII guard that ensures raw mode is disabled on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Clear the screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Terminal dimensions (width, height). Falls back to 80x24 for pipes.
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Result of a form field prompt
pub enum FormResult {
    Value(String),
    Cancelled,
}

/// Prompt for text input, pre-filled with `current` so it can be edited or
/// erased. Esc cancels.
pub fn prompt_field(label: &str, current: Option<&str>) -> Result<FormResult> {
    let prompt = format!("{}:", label);
    let mut builder = Text::new(&prompt).with_render_config(minimal_render_config());

    if let Some(c) = current {
        if !c.is_empty() {
            builder = builder.with_initial_value(c);
        }
    }

    match builder.prompt() {
        Ok(value) => Ok(FormResult::Value(value.trim().to_string())),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn prompt_password(label: &str) -> Result<Option<String>> {
    let prompt = format!("{}:", label);
    let result = Password::new(&prompt)
        .with_render_config(minimal_render_config())
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt_skippable()?;
    Ok(result)
}

pub fn confirm(prompt: &str, default: bool) -> bool {
    Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(default)
        .prompt()
        .unwrap_or(false)
}

/// Truncate to `max_len` characters, ending with an ellipsis when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Print a store notification
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{}", notice.text.as_str().green()),
        NoticeLevel::Info => println!("{}", notice.text),
        NoticeLevel::Error => eprintln!("{}", notice.text.as_str().red()),
    }
}
