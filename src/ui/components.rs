use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::logic::Dashboard;
use crate::state::AppState;

use super::theme;

/// What: Render the Components tab: filter input above the checkbox list.
///
/// Details:
/// - Only entries matching the filter are listed; the title shows matches and selection size.
pub(super) fn render_components(f: &mut Frame, app: &mut AppState, dash: &Dashboard, area: Rect) {
    let th = theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = app.filter_editing;
    let input = Paragraph::new(Line::from(vec![
        Span::styled(
            "/ ",
            Style::default().fg(if editing { th.sapphire } else { th.overlay1 }),
        ),
        Span::styled(
            app.filter.clone(),
            Style::default().fg(if editing { th.text } else { th.subtext0 }),
        ),
    ]))
    .block(
        Block::default()
            .title(Span::styled(
                if editing { "Filter (editing)" } else { "Filter" },
                Style::default().fg(if editing { th.mauve } else { th.overlay1 }),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(th.surface2)),
    );
    f.render_widget(input, chunks[0]);

    let catalog = dash.catalog();
    let visible = catalog.filtered_indices(&app.filter);
    let items: Vec<ListItem> = visible
        .iter()
        .filter_map(|&i| catalog.get(i))
        .map(|c| {
            let (mark, color) = if c.selected {
                ("[x] ", th.green)
            } else {
                ("[ ] ", th.overlay1)
            };
            let mut segs = vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::styled(
                    c.label(),
                    Style::default().fg(th.text).add_modifier(Modifier::BOLD),
                ),
            ];
            if !c.description.is_empty() {
                segs.push(Span::raw("  - "));
                segs.push(Span::styled(
                    c.description.clone(),
                    Style::default().fg(th.subtext0),
                ));
            }
            ListItem::new(Line::from(segs))
        })
        .collect();
    if app.component_state.selected().is_some_and(|s| s >= items.len()) {
        app.component_state.select(items.len().checked_sub(1));
    }
    let list = List::new(items)
        .style(Style::default().fg(th.text).bg(th.base))
        .block(
            Block::default()
                .title(Span::styled(
                    format!(
                        "Components ({} shown, {} selected)",
                        visible.len(),
                        catalog.selected_count()
                    ),
                    Style::default().fg(th.overlay1),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(th.surface2)),
        )
        .highlight_style(Style::default().fg(th.crust).bg(th.lavender))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[1], &mut app.component_state);
}
