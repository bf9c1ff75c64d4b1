use std::env;
use std::path::{Path, PathBuf};

/// Directory name used under the user's config base.
const APP_DIR: &str = "triagedash";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Return `$HOME/.config/triagedash`, ensuring it exists.
///
/// Output: `Some(PathBuf)` when HOME is set and the directory can be created; `None` otherwise.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join(APP_DIR);
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    None
}

/// Config directory for triagedash (ensured to exist).
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join(APP_DIR);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: `$HOME/.config/triagedash/logs` (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Determine the settings file path, searching HOME first and then `XDG_CONFIG_HOME`.
///
/// Output: The first existing `settings.conf`, or `None` when no candidate exists.
pub(crate) fn resolve_settings_path() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(h) = env::var("HOME") {
        candidates.push(Path::new(&h).join(".config").join(APP_DIR).join("settings.conf"));
    }
    if let Ok(x) = env::var("XDG_CONFIG_HOME")
        && !x.trim().is_empty()
    {
        candidates.push(Path::new(&x).join(APP_DIR).join("settings.conf"));
    }
    candidates.into_iter().find(|p| p.is_file())
}
