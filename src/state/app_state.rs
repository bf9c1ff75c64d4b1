//! UI-side application state: focused tab, cursors, filter text and status line.

use ratatui::widgets::{ListState, TableState};

use crate::state::modal::Modal;
use crate::state::types::SearchName;

/// Top-level tabs of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    /// Component catalog with checkboxes.
    #[default]
    Components,
    /// The triage search table.
    Triage,
    /// Accordion of the stale searches.
    Stale,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Self; 3] = [Self::Components, Self::Triage, Self::Stale];

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Components => "Components",
            Self::Triage => "Triage",
            Self::Stale => "Stale",
        }
    }

    /// Next tab, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Components => Self::Triage,
            Self::Triage => Self::Stale,
            Self::Stale => Self::Components,
        }
    }

    /// Previous tab, wrapping.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Components => Self::Stale,
            Self::Triage => Self::Components,
            Self::Stale => Self::Triage,
        }
    }
}

/// Presentation state mutated by key handling and read by the renderer.
///
/// Engine data (catalog, views, address) lives in the dashboard; this struct
/// only tracks what the user is looking at.
#[derive(Debug, Default)]
pub struct AppState {
    /// Active tab.
    pub tab: Tab,
    /// Catalog filter text.
    pub filter: String,
    /// Whether keystrokes currently edit `filter`.
    pub filter_editing: bool,
    /// Cursor over the filtered component list.
    pub component_state: ListState,
    /// Cursor over the triage table rows.
    pub triage_state: TableState,
    /// Index into [`SearchName::STALE`] of the focused section header.
    pub stale_focus: usize,
    /// Expanded stale section, if any.
    pub stale_expanded: Option<SearchName>,
    /// Cursor over rows of the expanded stale section.
    pub stale_state: TableState,
    /// Active modal dialog.
    pub modal: Modal,
    /// Status line text (links, confirmations, errors).
    pub status: Option<String>,
    /// Priority values offered by the picker.
    pub priority_choices: Vec<String>,
}

impl AppState {
    /// What: Create the UI state for a fresh session.
    ///
    /// Inputs:
    /// - `has_selection`: Whether the startup address selected any component.
    ///
    /// Output:
    /// - State on the Stale tab when something is selected, else on Components.
    #[must_use]
    pub fn new(has_selection: bool) -> Self {
        let mut app = Self {
            tab: if has_selection {
                Tab::Stale
            } else {
                Tab::Components
            },
            ..Self::default()
        };
        app.component_state.select(Some(0));
        app
    }

    /// The stale search whose header has focus.
    #[must_use]
    pub fn focused_stale(&self) -> SearchName {
        SearchName::STALE[self.stale_focus.min(SearchName::STALE.len() - 1)]
    }

    /// The search the `r` key refreshes, if the tab shows one.
    #[must_use]
    pub fn focused_search(&self) -> Option<SearchName> {
        match self.tab {
            Tab::Components => None,
            Tab::Triage => Some(SearchName::Triage),
            Tab::Stale => Some(self.stale_expanded.unwrap_or_else(|| self.focused_stale())),
        }
    }

    /// Replace the status line.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Startup tab depends on whether a selection was restored.
    fn app_state_start_tab_follows_selection() {
        assert_eq!(AppState::new(true).tab, Tab::Stale);
        assert_eq!(AppState::new(false).tab, Tab::Components);
        assert_eq!(AppState::new(false).component_state.selected(), Some(0));
    }

    #[test]
    /// What: Tab cycling wraps in both directions.
    fn app_state_tab_cycle_wraps() {
        for t in Tab::ALL {
            assert_eq!(t.next().prev(), t);
        }
        assert_eq!(Tab::Stale.next(), Tab::Components);
    }

    #[test]
    /// What: The refresh target follows the tab and the stale accordion.
    fn app_state_focused_search() {
        let mut app = AppState::new(true);
        assert_eq!(app.focused_search(), Some(SearchName::StaleNeedinfo));
        app.stale_focus = 2;
        assert_eq!(app.focused_search(), Some(SearchName::StaleDecision));
        app.stale_expanded = Some(SearchName::StaleRange);
        assert_eq!(app.focused_search(), Some(SearchName::StaleRange));
        app.tab = Tab::Triage;
        assert_eq!(app.focused_search(), Some(SearchName::Triage));
        app.tab = Tab::Components;
        assert_eq!(app.focused_search(), None);
    }
}
