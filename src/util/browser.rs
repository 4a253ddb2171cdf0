use anyhow::{Result, bail};
use tracing::debug;

use crate::util::format::PLACEHOLDER;

/// Open a repository page in the user's default browser.
pub fn open_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() || url == PLACEHOLDER {
        bail!("Repository has no web URL");
    }
    debug!(url = url, "Opening URL in browser");
    open::that(url)?;
    Ok(())
}
