//! Terminal rendering: tab bar, active tab body, footer and modal overlays.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs},
};

use crate::logic::Dashboard;
use crate::state::{AppState, SearchName, Tab};
use crate::util::truncate_to_width;

mod bugs;
mod components;
mod modals;
mod theme;

use theme::theme;

/// What: Render one frame.
///
/// Inputs:
/// - `f`: Frame to draw into.
/// - `app`: UI state (cursors are updated by stateful widgets).
/// - `dash`: Engine providing the catalog, views and address.
pub fn ui(f: &mut Frame, app: &mut AppState, dash: &Dashboard) {
    let th = theme();
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(th.base)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    render_tab_bar(f, app, dash, chunks[0]);
    match app.tab {
        Tab::Components => components::render_components(f, app, dash, chunks[1]),
        Tab::Triage => bugs::render_triage(f, app, dash, chunks[1]),
        Tab::Stale => bugs::render_stale(f, app, dash, chunks[1]),
    }
    render_footer(f, app, dash, chunks[2]);
    modals::render_modals(f, app, area);
}

fn render_tab_bar(f: &mut Frame, app: &AppState, dash: &Dashboard, area: ratatui::prelude::Rect) {
    let th = theme();
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|t| {
            let badge = match t {
                Tab::Components => format!(" ({})", dash.catalog().selected_count()),
                Tab::Triage => dash
                    .view(SearchName::Triage)
                    .map(|v| v.marker())
                    .filter(|m| !m.is_empty())
                    .map(|m| format!(" {m}"))
                    .unwrap_or_default(),
                Tab::Stale => {
                    let total: usize = SearchName::STALE
                        .iter()
                        .filter_map(|n| dash.view(*n).and_then(|v| v.count))
                        .sum();
                    if total > 0 {
                        format!(" ({total})")
                    } else {
                        String::new()
                    }
                }
            };
            Line::from(format!("{}{badge}", t.title()))
        })
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(th.overlay1))
        .highlight_style(
            Style::default()
                .fg(th.mauve)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled(" | ", Style::default().fg(th.surface2)));
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame, app: &AppState, dash: &Dashboard, area: ratatui::prelude::Rect) {
    let th = theme();
    let width = usize::from(area.width);
    let loading = if dash.in_flight() > 0 {
        format!("  [{} loading]", dash.in_flight())
    } else {
        String::new()
    };
    let address = Line::from(vec![
        Span::styled("address: ", Style::default().fg(th.overlay1)),
        Span::styled(
            truncate_to_width(&dash.address().to_string(), width.saturating_sub(24)),
            Style::default().fg(th.subtext0),
        ),
        Span::styled(loading, Style::default().fg(th.yellow)),
    ]);
    let status_text = app.status.as_deref().unwrap_or(
        "Tab switch  / filter  Space toggle  r/R refresh  [ ] history  p priority  o link  ? help  q quit",
    );
    let status = Line::from(Span::styled(
        truncate_to_width(status_text, width),
        Style::default().fg(th.text),
    ));
    f.render_widget(Paragraph::new(vec![address, status]), area);
}
