//! `settings.conf` parsing, defaults and the release train constants.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::labels::LabelTables;
use crate::config::paths::{config_dir, resolve_settings_path};
use crate::util::config::{parse_key_value, skip_comment_or_empty};

/// Default REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://bugzilla.mozilla.org/rest/";
/// Default web UI base used for bug and buglist links.
pub const DEFAULT_WEB_BASE: &str = "https://bugzilla.mozilla.org/";
/// Default catalog file name inside the config directory.
pub const CATALOG_FILE: &str = "components-min.json";

/// Release-train constants the search templates depend on.
///
/// These change every release cycle; bump them in `settings.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseTrain {
    /// First nightly date of the current release (`YYYY-MM-DD`).
    pub first_nightly_current: String,
    /// First nightly date of the next version at release (`YYYY-MM-DD`).
    pub first_nightly_next: String,
    /// Version number currently on beta.
    pub beta: u32,
    /// Version number currently on release.
    pub release: u32,
    /// Days after which a needinfo counts as stale.
    pub needinfo_stale_days: u32,
    /// Days after which a review request counts as stale.
    pub review_stale_days: u32,
}

impl Default for ReleaseTrain {
    fn default() -> Self {
        Self {
            first_nightly_current: "2020-04-06".to_string(),
            first_nightly_next: "2020-05-04".to_string(),
            beta: 78,
            release: 77,
            needinfo_stale_days: 14,
            review_stale_days: 5,
        }
    }
}

impl ReleaseTrain {
    /// Status field tracking the beta version, e.g. `cf_status_firefox78`.
    #[must_use]
    pub fn beta_status_field(&self) -> String {
        format!("cf_status_firefox{}", self.beta)
    }

    /// Status field tracking the release version, e.g. `cf_status_firefox77`.
    #[must_use]
    pub fn release_status_field(&self) -> String {
        format!("cf_status_firefox{}", self.release)
    }
}

/// User-configurable settings parsed from `settings.conf` and overlaid by CLI flags.
#[derive(Clone)]
pub struct Settings {
    /// REST endpoint base, always ending in `/`.
    pub api_base: String,
    /// Web UI base for links, always ending in `/`.
    pub web_base: String,
    /// Static API key sent on mutations.
    pub api_key: Option<Zeroizing<String>>,
    /// Catalog JSON file.
    pub catalog_path: PathBuf,
    /// Release train constants.
    pub train: ReleaseTrain,
    /// Priority/severity label tables.
    pub labels: LabelTables,
    /// Priority values offered by the priority picker.
    pub priority_choices: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            api_key: None,
            catalog_path: config_dir().join(CATALOG_FILE),
            train: ReleaseTrain::default(),
            labels: LabelTables::default(),
            priority_choices: ["--", "P1", "P2", "P3", "P4", "P5"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("catalog_path", &self.catalog_path)
            .field("train", &self.train)
            .field("priority_choices", &self.priority_choices)
            .finish_non_exhaustive()
    }
}

/// Append a trailing slash so relative joins keep the last path segment.
#[must_use]
pub fn with_trailing_slash(s: &str) -> String {
    let t = s.trim();
    if t.ends_with('/') {
        t.to_string()
    } else {
        format!("{t}/")
    }
}

fn parse_date(key: &str, val: &str) -> Option<String> {
    match NaiveDate::parse_from_str(val, "%Y-%m-%d") {
        Ok(d) => Some(d.format("%Y-%m-%d").to_string()),
        Err(e) => {
            warn!(key, value = val, error = %e, "[Config] Ignoring invalid date");
            None
        }
    }
}

fn parse_u32(key: &str, val: &str) -> Option<u32> {
    match val.parse::<u32>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, value = val, error = %e, "[Config] Ignoring invalid number");
            None
        }
    }
}

/// What: Parse settings from `settings.conf` content.
///
/// Inputs:
/// - `content`: File content.
/// - `settings`: Settings to update in place.
///
/// Output:
/// - None (modifies `settings`).
///
/// Details:
/// - Keys are case-insensitive; `-` and spaces in keys are treated as `_`.
/// - `priority_label.<value>` / `severity_label.<value>` set individual labels,
///   `priority_label_fallback` / `severity_label_fallback` set the fallbacks.
/// - Invalid values are logged and ignored; unknown keys are logged at debug level.
pub fn parse_settings(content: &str, settings: &mut Settings) {
    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((raw_key, val)) = parse_key_value(line) else {
            continue;
        };
        let (head, tail) = raw_key
            .split_once('.')
            .map_or((raw_key.as_str(), None), |(h, t)| (h, Some(t)));
        let key = head.trim().to_lowercase().replace(['-', ' '], "_");
        match (key.as_str(), tail) {
            ("priority_label", Some(v)) => settings.labels.priority.set(v, &val),
            ("severity_label", Some(v)) => settings.labels.severity.set(v, &val),
            ("priority_label_fallback", None) => settings.labels.priority.set_fallback(&val),
            ("severity_label_fallback", None) => settings.labels.severity.set_fallback(&val),
            ("api_base" | "rest_url", None) => settings.api_base = with_trailing_slash(&val),
            ("web_base" | "bugzilla_url", None) => settings.web_base = with_trailing_slash(&val),
            ("api_key", None) => {
                settings.api_key = if val.is_empty() {
                    None
                } else {
                    Some(Zeroizing::new(val))
                };
            }
            ("catalog_path" | "components_file", None) => {
                settings.catalog_path = PathBuf::from(&val);
            }
            ("first_nightly_current", None) => {
                if let Some(d) = parse_date(&key, &val) {
                    settings.train.first_nightly_current = d;
                }
            }
            ("first_nightly_next", None) => {
                if let Some(d) = parse_date(&key, &val) {
                    settings.train.first_nightly_next = d;
                }
            }
            ("beta" | "beta_version", None) => {
                if let Some(v) = parse_u32(&key, &val) {
                    settings.train.beta = v;
                }
            }
            ("release" | "release_version", None) => {
                if let Some(v) = parse_u32(&key, &val) {
                    settings.train.release = v;
                }
            }
            ("needinfo_stale_days", None) => {
                if let Some(v) = parse_u32(&key, &val) {
                    settings.train.needinfo_stale_days = v;
                }
            }
            ("review_stale_days", None) => {
                if let Some(v) = parse_u32(&key, &val) {
                    settings.train.review_stale_days = v;
                }
            }
            ("priority_choices", None) => {
                let choices: Vec<String> = val
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !choices.is_empty() {
                    settings.priority_choices = choices;
                }
            }
            _ => debug!(key = %raw_key, "[Config] Unknown settings key"),
        }
    }
}

/// What: Load settings from `settings.conf` under HOME/XDG.
///
/// Output:
/// - A `Settings` value; falls back to defaults when the file is missing or unreadable.
#[must_use]
pub fn load_settings() -> Settings {
    let mut out = Settings::default();
    let Some(path) = resolve_settings_path() else {
        debug!("[Config] No settings.conf found, using defaults");
        return out;
    };
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "[Config] Loaded settings.conf");
            parse_settings(&content, &mut out);
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "[Config] settings.conf unreadable, using defaults"
            );
        }
    }
    out
}
