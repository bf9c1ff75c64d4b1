//! Bug tables for the Triage tab and the Stale accordion.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::logic::Dashboard;
use crate::state::{AppState, SearchName, SearchStatus, SearchView};

use super::theme;

/// Column widths: id, type, severity, priority, description, component, users, created.
const WIDTHS: [Constraint; 8] = [
    Constraint::Length(8),
    Constraint::Length(11),
    Constraint::Length(14),
    Constraint::Length(16),
    Constraint::Min(30),
    Constraint::Length(22),
    Constraint::Length(30),
    Constraint::Length(16),
];

fn marker_style(view: &SearchView) -> Style {
    let th = theme();
    match (&view.status, view.count) {
        (SearchStatus::Failed(_), _) => Style::default().fg(th.red),
        (_, Some(0)) => Style::default().fg(th.green),
        _ if view.is_pending_attention() => {
            Style::default().fg(th.yellow).add_modifier(Modifier::BOLD)
        }
        _ => Style::default().fg(th.overlay1),
    }
}

/// Placeholder text for views without rows, or `None` when rows should be shown.
fn placeholder(view: &SearchView) -> Option<String> {
    match &view.status {
        SearchStatus::NothingSelected => {
            Some("No components selected. Pick some on the Components tab.".to_string())
        }
        SearchStatus::NotLoaded => Some("Not loaded yet.".to_string()),
        SearchStatus::Loading if view.rows.is_empty() => Some("Loading…".to_string()),
        SearchStatus::Loaded if view.rows.is_empty() => Some("(none!)".to_string()),
        _ => None,
    }
}

/// What: Render one search view as a bordered table.
///
/// Details:
/// - Failed loads keep the previous rows and show the error in the title.
/// - Rows with a pending notice (failed priority edit) show it after the description.
fn render_view(
    f: &mut Frame,
    name: SearchName,
    view: &SearchView,
    state: &mut TableState,
    area: Rect,
) {
    let th = theme();
    let mut title = vec![
        Span::styled(
            format!("{} ", name.title()),
            Style::default().fg(th.mauve).add_modifier(Modifier::BOLD),
        ),
        Span::styled(view.marker(), marker_style(view)),
    ];
    match &view.status {
        SearchStatus::Loading => {
            title.push(Span::styled(" loading…", Style::default().fg(th.yellow)));
        }
        SearchStatus::Failed(e) => {
            title.push(Span::styled(
                format!(" error: {e} (r to retry)"),
                Style::default().fg(th.red),
            ));
        }
        _ => {}
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(th.surface2));

    if let Some(text) = placeholder(view) {
        let p = Paragraph::new(Span::styled(text, Style::default().fg(th.subtext0))).block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(
        [
            "ID",
            "Type",
            "Severity",
            "Priority",
            "Description",
            "Component",
            "People",
            "Created",
        ]
        .map(|h| Cell::from(Span::styled(h, Style::default().fg(th.overlay1)))),
    );
    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|r| {
            let mut desc = vec![Span::raw(r.description.clone())];
            if let Some(n) = &r.notice {
                desc.push(Span::styled(format!("  ⚠ {n}"), Style::default().fg(th.red)));
            }
            Row::new(vec![
                Cell::from(r.id.to_string()),
                Cell::from(r.bug_type.clone()),
                Cell::from(r.severity.clone()),
                Cell::from(r.priority_label.clone()),
                Cell::from(Line::from(desc)),
                Cell::from(r.component.clone()),
                Cell::from(r.users.clone()),
                Cell::from(r.created.clone()),
            ])
            .style(Style::default().fg(th.text))
        })
        .collect();
    if state.selected().is_some_and(|s| s >= rows.len()) {
        state.select(rows.len().checked_sub(1));
    }
    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(th.crust).bg(th.lavender))
        .highlight_symbol("> ");
    f.render_stateful_widget(table, area, state);
}

/// Render the Triage tab.
pub(super) fn render_triage(f: &mut Frame, app: &mut AppState, dash: &Dashboard, area: Rect) {
    if let Some(view) = dash.view(SearchName::Triage) {
        render_view(f, SearchName::Triage, view, &mut app.triage_state, area);
    }
}

/// What: Render the Stale tab as an accordion.
///
/// Details:
/// - Collapsed sections take one line each with their count marker; the expanded
///   section takes the remaining height.
pub(super) fn render_stale(f: &mut Frame, app: &mut AppState, dash: &Dashboard, area: Rect) {
    let th = theme();
    let constraints: Vec<Constraint> = SearchName::STALE
        .iter()
        .map(|n| {
            if app.stale_expanded == Some(*n) {
                Constraint::Min(4)
            } else {
                Constraint::Length(1)
            }
        })
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, name) in SearchName::STALE.iter().enumerate() {
        let Some(view) = dash.view(*name) else {
            continue;
        };
        if app.stale_expanded == Some(*name) {
            render_view(f, *name, view, &mut app.stale_state, chunks[i]);
            continue;
        }
        let focused = app.stale_expanded.is_none() && app.stale_focus == i;
        let head_style = if focused {
            Style::default().fg(th.crust).bg(th.lavender)
        } else {
            Style::default().fg(th.text)
        };
        let line = Line::from(vec![
            Span::styled(if focused { "> ▸ " } else { "  ▸ " }, head_style),
            Span::styled(format!("{} ", name.title()), head_style),
            Span::styled(view.marker(), marker_style(view)),
        ]);
        f.render_widget(Paragraph::new(line), chunks[i]);
    }
}
