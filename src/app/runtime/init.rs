//! Session setup: settings overlay, catalog, client and engine construction.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::args::{Args, initial_address};
use crate::config::{Settings, with_trailing_slash};
use crate::logic::{Dashboard, RowFormat, TrackerEvent, standard_templates};
use crate::sources::{BugSource, BugzillaClient, load_catalog};
use crate::state::Catalog;

use super::Result;

/// What: Apply command-line overrides on top of file settings.
///
/// Inputs:
/// - `settings`: Settings loaded from `settings.conf` (or defaults).
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Settings with `--api-base`, `--api-key` and `--catalog` applied.
///
/// Details:
/// - Flags win over the file; a blank `--api-key` clears the key.
#[must_use]
pub fn apply_cli_overrides(mut settings: Settings, args: &Args) -> Settings {
    if let Some(base) = args.api_base.as_deref() {
        settings.api_base = with_trailing_slash(base);
    }
    if let Some(key) = args.api_key.as_deref() {
        settings.api_key = Some(Zeroizing::new(key.trim().to_string())).filter(|k| !k.is_empty());
    }
    if let Some(path) = args.catalog.as_ref() {
        settings.catalog_path.clone_from(path);
    }
    settings
}

/// What: Read the API key from the terminal without echo.
///
/// Output:
/// - `Some(key)` when something was typed; `None` for empty input.
///
/// # Errors
/// - Returns `Err` when the terminal cannot be read.
pub fn prompt_api_key() -> Result<Option<Zeroizing<String>>> {
    let key = Zeroizing::new(rpassword::prompt_password("Bugzilla API key: ")?);
    if key.trim().is_empty() {
        warn!("[Init] empty API key entered; edits stay disabled");
        return Ok(None);
    }
    Ok(Some(Zeroizing::new(key.trim().to_string())))
}

/// What: Build the dashboard engine for a session.
///
/// Inputs:
/// - `settings`: Effective settings.
/// - `args`: Parsed command-line arguments (startup address).
///
/// Output:
/// - Engine and its completion receiver; nothing dispatched yet.
///
/// # Errors
/// - Returns `Err` when the catalog cannot be loaded or the API base URL is invalid.
pub fn build_dashboard(
    settings: &Settings,
    args: &Args,
) -> Result<(Dashboard, mpsc::UnboundedReceiver<TrackerEvent>)> {
    let catalog = Catalog::new(load_catalog(&settings.catalog_path)?);
    let client: Arc<dyn BugSource> = Arc::new(BugzillaClient::new(&settings.api_base)?);
    let initial = initial_address(args);
    info!(
        api_base = %settings.api_base,
        components = catalog.len(),
        address = %initial,
        edits = settings.api_key.is_some(),
        "[Init] session ready"
    );
    Ok(Dashboard::new(
        catalog,
        initial,
        standard_templates(&settings.train),
        client,
        RowFormat {
            labels: settings.labels.clone(),
            web_base: settings.web_base.clone(),
        },
        settings.api_key.clone(),
    ))
}
