//! Configuration for triagedash: paths, `settings.conf` parsing and label tables.
//!
//! Public re-exports keep the `crate::config::*` API flat.

/// Display label tables for priority and severity.
pub mod labels;
/// Path resolution for config and log directories.
mod paths;
/// Settings file parsing.
mod settings;

pub use labels::{LabelTable, LabelTables};
pub use paths::{config_dir, logs_dir};
pub use settings::{
    CATALOG_FILE, DEFAULT_API_BASE, DEFAULT_WEB_BASE, ReleaseTrain, Settings, load_settings,
    parse_settings, with_trailing_slash,
};

#[cfg(test)]
static TEST_MUTEX: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

#[cfg(test)]
/// What: Provide a process-wide mutex to serialize tests that mutate `HOME`.
///
/// Output:
/// - Shared reference to a lazily-initialized `Mutex<()>`.
pub(crate) fn test_mutex() -> &'static std::sync::Mutex<()> {
    TEST_MUTEX.get_or_init(|| std::sync::Mutex::new(()))
}
