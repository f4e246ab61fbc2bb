use anyhow::{anyhow, Result};

use crate::app::App;
use crate::config::{validate_api_url, ApiConfig, ENV_API_URL};

/// Apply config flags to the stored part of `current`; returns None when
/// nothing was given
pub fn merge_config(
    current: &ApiConfig,
    api_url: Option<String>,
    page_size: Option<u32>,
) -> Result<Option<ApiConfig>> {
    if api_url.is_none() && page_size.is_none() {
        return Ok(None);
    }

    let mut next = current.clone();
    if let Some(url) = api_url {
        let url = url.trim().trim_end_matches('/').to_string();
        validate_api_url(&url)?;
        next.api_url = Some(url);
    }
    if let Some(size) = page_size {
        if size == 0 {
            return Err(anyhow!("Page size must be at least 1"));
        }
        next.page_size = Some(size);
    }
    Ok(Some(next))
}

/// Execute the config command
pub fn run_config(
    app: &mut App,
    api_url: Option<String>,
    page_size: Option<u32>,
    reset: bool,
) -> Result<()> {
    if reset {
        ApiConfig::clear(&app.db)?;
        app.config = ApiConfig::load(&app.db)?;
        println!("Configuration reset.");
    } else if let Some(next) = merge_config(&app.config, api_url, page_size)? {
        next.save(&app.db)?;
        app.config = next;
        println!("Saved.");
    }

    println!("api url    {}", app.config.effective_api_url());
    println!("page size  {}", app.config.effective_page_size());
    if app.config.env_api_url.is_some() {
        println!("           ({} is set and overrides the saved url)", ENV_API_URL);
    }
    Ok(())
}
