//! Component catalog file loader.
use std::path::Path;

use tracing::info;

use super::Result;
use crate::state::ComponentRef;

/// What: Parse a `components-min.json` document.
///
/// Inputs:
/// - `json`: JSON array of component objects.
///
/// Output:
/// - Entries in file order.
///
/// # Errors
/// - Returns `Err` when the document is not an array of component objects.
pub fn parse_catalog(json: &str) -> Result<Vec<ComponentRef>> {
    Ok(serde_json::from_str(json)?)
}

/// What: Load the component catalog from disk.
///
/// Inputs:
/// - `path`: Catalog file location.
///
/// Output:
/// - Entries in file order.
///
/// # Errors
/// - Returns `Err` naming the path when the file cannot be read or parsed; callers treat
///   this as fatal at startup.
pub fn load_catalog(path: &Path) -> Result<Vec<ComponentRef>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read catalog {}: {e}", path.display()))?;
    let entries =
        parse_catalog(&raw).map_err(|e| format!("invalid catalog {}: {e}", path.display()))?;
    info!(path = %path.display(), entries = entries.len(), "[Catalog] loaded");
    Ok(entries)
}
