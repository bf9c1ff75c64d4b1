//! Triage and Stale tabs: row cursors, accordion, links and priority edits.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;

use crate::logic::Dashboard;
use crate::state::{AppState, Modal, SearchName, ViewRow};

use super::step;

/// What: Row currently highlighted on the active tab.
///
/// Output:
/// - The triage row under the cursor, the row under the cursor of the expanded
///   stale section, or `None`.
pub(crate) fn highlighted_row<'a>(app: &AppState, dash: &'a Dashboard) -> Option<&'a ViewRow> {
    let (name, state) = match app.tab {
        crate::state::Tab::Triage => (SearchName::Triage, &app.triage_state),
        crate::state::Tab::Stale => (app.stale_expanded?, &app.stale_state),
        crate::state::Tab::Components => return None,
    };
    dash.view(name)?.rows.get(state.selected()?)
}

fn move_rows(state: &mut TableState, len: usize, delta: isize) {
    state.select(step(state.selected(), len, delta));
}

/// What: Handle a key on the Triage tab.
pub(super) fn handle_triage_key(ke: KeyEvent, app: &mut AppState, dash: &mut Dashboard) {
    let len = dash.view(SearchName::Triage).map_or(0, |v| v.rows.len());
    match ke.code {
        KeyCode::Down | KeyCode::Char('j') => move_rows(&mut app.triage_state, len, 1),
        KeyCode::Up | KeyCode::Char('k') => move_rows(&mut app.triage_state, len, -1),
        KeyCode::Enter | KeyCode::Char('o') => show_link(app, dash),
        KeyCode::Char('p') => open_priority_picker(app, dash),
        _ => {}
    }
}

/// What: Handle a key on the Stale tab.
///
/// Details:
/// - Collapsed: Up/Down move between section headers, Space/Enter expand.
/// - Expanded: Up/Down move between rows, Space/Esc collapse, Enter/`o` show the link.
pub(super) fn handle_stale_key(ke: KeyEvent, app: &mut AppState, dash: &mut Dashboard) {
    let Some(open) = app.stale_expanded else {
        let n = SearchName::STALE.len();
        match ke.code {
            KeyCode::Down | KeyCode::Char('j') => {
                app.stale_focus = step(Some(app.stale_focus), n, 1).unwrap_or(0);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.stale_focus = step(Some(app.stale_focus), n, -1).unwrap_or(0);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let name = app.focused_stale();
                app.stale_expanded = Some(name);
                let len = dash.view(name).map_or(0, |v| v.rows.len());
                app.stale_state.select(step(None, len, 0));
            }
            _ => {}
        }
        return;
    };
    let len = dash.view(open).map_or(0, |v| v.rows.len());
    match ke.code {
        KeyCode::Down | KeyCode::Char('j') => move_rows(&mut app.stale_state, len, 1),
        KeyCode::Up | KeyCode::Char('k') => move_rows(&mut app.stale_state, len, -1),
        KeyCode::Char(' ') | KeyCode::Esc | KeyCode::Left => {
            app.stale_expanded = None;
            app.stale_state.select(None);
        }
        KeyCode::Enter | KeyCode::Char('o') => show_link(app, dash),
        KeyCode::Char('p') => open_priority_picker(app, dash),
        _ => {}
    }
}

fn show_link(app: &mut AppState, dash: &Dashboard) {
    if let Some(url) = highlighted_row(app, dash).map(|r| r.url.clone()) {
        app.set_status(url);
    }
}

fn open_priority_picker(app: &mut AppState, dash: &Dashboard) {
    let Some(row) = highlighted_row(app, dash) else {
        return;
    };
    let bug_id = row.id;
    let selected = app
        .priority_choices
        .iter()
        .position(|c| c.eq_ignore_ascii_case(&row.priority))
        .unwrap_or(0);
    app.modal = Modal::PriorityPicker {
        bug_id,
        choices: app.priority_choices.clone(),
        selected,
    };
}
