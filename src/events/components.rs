//! Components tab: cursor, filter editing and selection toggles.

use crossterm::event::{KeyCode, KeyEvent};

use crate::logic::Dashboard;
use crate::state::AppState;

use super::step;

/// Rows moved by PageUp/PageDown.
const PAGE: isize = 10;

/// What: Handle a key on the Components tab.
///
/// Details:
/// - `/` starts editing the filter; Space/Enter toggle the highlighted component,
///   which re-runs every search.
pub(super) fn handle_components_key(ke: KeyEvent, app: &mut AppState, dash: &mut Dashboard) {
    let visible = dash.catalog().filtered_indices(&app.filter);
    let cur = app.component_state.selected();
    match ke.code {
        KeyCode::Char('/') => app.filter_editing = true,
        KeyCode::Down | KeyCode::Char('j') => {
            app.component_state.select(step(cur, visible.len(), 1));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.component_state.select(step(cur, visible.len(), -1));
        }
        KeyCode::PageDown => app.component_state.select(step(cur, visible.len(), PAGE)),
        KeyCode::PageUp => app.component_state.select(step(cur, visible.len(), -PAGE)),
        KeyCode::Home => app.component_state.select(step(Some(0), visible.len(), 0)),
        KeyCode::End => app
            .component_state
            .select(visible.len().checked_sub(1)),
        KeyCode::Char(' ') | KeyCode::Enter => toggle_highlighted(app, dash, &visible),
        _ => {}
    }
}

fn toggle_highlighted(app: &mut AppState, dash: &mut Dashboard, visible: &[usize]) {
    let Some(idx) = app
        .component_state
        .selected()
        .and_then(|i| visible.get(i).copied())
    else {
        return;
    };
    let Some(entry) = dash.catalog().get(idx) else {
        return;
    };
    let key = entry.key();
    let label = entry.label();
    if dash.toggle(key) {
        let count = dash.catalog().selected_count();
        app.set_status(format!("{label} toggled; {count} selected"));
    }
}

/// What: Handle a key while the filter is being edited.
///
/// Details:
/// - Characters append, Backspace deletes, Enter keeps the filter, Esc clears it.
/// - The cursor returns to the first match after every change.
pub(super) fn handle_filter_key(ke: KeyEvent, app: &mut AppState, dash: &Dashboard) {
    match ke.code {
        KeyCode::Enter => app.filter_editing = false,
        KeyCode::Esc => {
            app.filter_editing = false;
            app.filter.clear();
        }
        KeyCode::Backspace => {
            app.filter.pop();
        }
        KeyCode::Char(c) => app.filter.push(c),
        _ => return,
    }
    let len = dash.catalog().filtered_indices(&app.filter).len();
    app.component_state.select(step(Some(0), len, 0));
}

#[cfg(test)]
mod tests {
    use super::super::handle_event;
    use super::super::test_support::{StubSource, dashboard, key};
    use crossterm::event::KeyCode;
    use std::sync::Arc;

    use crate::state::{AppState, SearchName, SearchStatus};

    #[test]
    /// What: Filter editing narrows the list and Esc restores it.
    ///
    /// Inputs:
    /// - Typing `/css` then Enter, then `/` Esc.
    ///
    /// Output:
    /// - One visible match while filtered; typed `r` goes into the filter, not refresh.
    fn components_filter_editing() {
        let (mut dash, _rx) = dashboard(Arc::new(StubSource::default()), "");
        let mut app = AppState::new(false);
        for c in ['/', 'c', 's', 's'] {
            handle_event(&key(KeyCode::Char(c)), &mut app, &mut dash);
        }
        assert!(app.filter_editing);
        assert_eq!(app.filter, "css");
        assert_eq!(dash.catalog().filtered_indices(&app.filter), vec![1]);
        handle_event(&key(KeyCode::Enter), &mut app, &mut dash);
        assert!(!app.filter_editing);
        handle_event(&key(KeyCode::Char('/')), &mut app, &mut dash);
        handle_event(&key(KeyCode::Esc), &mut app, &mut dash);
        assert!(app.filter.is_empty());
        assert_eq!(app.component_state.selected(), Some(0));
    }

    #[tokio::test]
    /// What: Space toggles the highlighted filtered entry and re-runs the searches.
    ///
    /// Inputs:
    /// - Filter `toolbars`, then Space.
    ///
    /// Output:
    /// - `Firefox:Toolbars` selected, address updated and every search loading.
    async fn components_space_toggles_filtered_entry() {
        let (mut dash, _rx) = dashboard(Arc::new(StubSource::default()), "");
        let mut app = AppState::new(false);
        app.filter = "toolbars".into();
        handle_event(&key(KeyCode::Char(' ')), &mut app, &mut dash);
        assert_eq!(dash.catalog().to_address(), vec!["Firefox:Toolbars".to_string()]);
        assert_eq!(dash.address().components(), vec!["Firefox:Toolbars".to_string()]);
        assert_eq!(
            dash.view(SearchName::Triage).map(|v| v.status.clone()),
            Some(SearchStatus::Loading)
        );
        assert_eq!(
            app.status.as_deref(),
            Some("Firefox: Toolbars toggled; 1 selected")
        );
    }

    #[test]
    /// What: Cursor movement stays inside the visible list.
    fn components_cursor_moves_within_bounds() {
        let (mut dash, _rx) = dashboard(Arc::new(StubSource::default()), "");
        let mut app = AppState::new(false);
        for _ in 0..5 {
            handle_event(&key(KeyCode::Down), &mut app, &mut dash);
        }
        assert_eq!(app.component_state.selected(), Some(2));
        handle_event(&key(KeyCode::Home), &mut app, &mut dash);
        assert_eq!(app.component_state.selected(), Some(0));
        handle_event(&key(KeyCode::End), &mut app, &mut dash);
        assert_eq!(app.component_state.selected(), Some(2));
    }
}
