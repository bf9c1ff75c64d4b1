//! Event handling layer for the triagedash TUI.
//!
//! `handle_event` routes keys to the open modal, the filter editor or the
//! active tab; tab-specific logic lives in submodules.

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::logic::Dashboard;
use crate::state::{AppState, Modal, Tab};

mod components;
mod lists;
mod modals;

/// Dispatch a single terminal event, mutating the UI state and the engine.
///
/// Returns `true` to signal the application should exit; otherwise `false`.
pub fn handle_event(ev: &CEvent, app: &mut AppState, dash: &mut Dashboard) -> bool {
    let CEvent::Key(ke) = ev else {
        return false;
    };
    if ke.kind != KeyEventKind::Press {
        return false;
    }
    if ke.modifiers.contains(KeyModifiers::CONTROL) && ke.code == KeyCode::Char('c') {
        return true;
    }
    if app.modal.is_open() {
        modals::handle_modal_key(*ke, app, dash);
        return false;
    }
    if app.filter_editing {
        components::handle_filter_key(*ke, app, dash);
        return false;
    }
    if handle_global_key(*ke, app, dash) {
        return ke.code == KeyCode::Char('q');
    }
    match app.tab {
        Tab::Components => components::handle_components_key(*ke, app, dash),
        Tab::Triage => lists::handle_triage_key(*ke, app, dash),
        Tab::Stale => lists::handle_stale_key(*ke, app, dash),
    }
    false
}

/// What: Handle keys that work on every tab.
///
/// Output:
/// - `true` when the key was consumed (including `q`, which the caller turns into exit).
fn handle_global_key(ke: KeyEvent, app: &mut AppState, dash: &mut Dashboard) -> bool {
    match ke.code {
        KeyCode::Char('q') => {}
        KeyCode::Tab => app.tab = app.tab.next(),
        KeyCode::BackTab => app.tab = app.tab.prev(),
        KeyCode::Char('?') => app.modal = Modal::Help,
        KeyCode::Char('R') => {
            dash.refresh_all();
            app.set_status("Refreshing all searches");
        }
        KeyCode::Char('r') => match app.focused_search() {
            Some(name) => {
                if dash.refresh(name) {
                    app.set_status(format!("Refreshing {}", name.title()));
                } else {
                    app.set_status("Select at least one component first");
                }
            }
            None => {
                dash.refresh_all();
                app.set_status("Refreshing all searches");
            }
        },
        KeyCode::Char('[') => {
            if dash.navigate_back() {
                app.set_status(format!("Back: {}", dash.address()));
            } else {
                app.set_status("Already at the oldest address");
            }
        }
        KeyCode::Char(']') => {
            if dash.navigate_forward() {
                app.set_status(format!("Forward: {}", dash.address()));
            } else {
                app.set_status("Already at the newest address");
            }
        }
        _ => return false,
    }
    true
}

/// What: Move a cursor by `delta` within `len` items.
///
/// Output:
/// - `None` for an empty list, the first index when nothing was highlighted yet,
///   otherwise the new index clamped to the list.
pub(crate) fn step(current: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(cur) = current else {
        return Some(0);
    };
    Some(cur.min(len - 1).saturating_add_signed(delta).min(len - 1))
}
