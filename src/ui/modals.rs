use ratatui::{
    Frame,
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::state::{AppState, Modal};

use super::theme;

/// Key bindings listed in the help dialog.
const HELP_LINES: [(&str, &str); 12] = [
    ("Tab / Shift+Tab", "switch tabs"),
    ("/", "edit the component filter (Enter keeps, Esc clears)"),
    ("Space / Enter", "toggle component, expand or collapse a stale section"),
    ("Up / Down, j / k", "move"),
    ("r", "refresh the focused search"),
    ("R", "refresh every search"),
    ("[ / ]", "address history back / forward"),
    ("p", "change priority of the highlighted bug"),
    ("o", "show the link of the highlighted bug"),
    ("?", "this help"),
    ("Esc", "close dialogs"),
    ("q / Ctrl+C", "quit and print the address"),
];

/// Centered rectangle of at most `w` x `h` inside `area`.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width.saturating_sub(4));
    let h = h.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    }
}

fn dialog_block(title: &str) -> Block<'_> {
    let th = theme();
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(th.mauve).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(th.lavender))
        .style(Style::default().bg(th.base))
}

/// What: Render the active modal, if any, on top of the frame.
///
/// Details:
/// - Clears the area behind the dialog. The API key prompt shows one `*` per typed character.
pub(super) fn render_modals(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    match &app.modal {
        Modal::None => {}
        Modal::Alert { message } => {
            let rect = centered(area, 70, 7);
            f.render_widget(Clear, rect);
            let body = Paragraph::new(vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(th.text))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Enter or Esc to close",
                    Style::default().fg(th.overlay1),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(dialog_block(" Notice "));
            f.render_widget(body, rect);
        }
        Modal::Help => {
            let height = u16::try_from(HELP_LINES.len()).unwrap_or(u16::MAX) + 2;
            let rect = centered(area, 76, height);
            f.render_widget(Clear, rect);
            let lines: Vec<Line> = HELP_LINES
                .iter()
                .map(|(k, what)| {
                    Line::from(vec![
                        Span::styled(format!("{k:<18}"), Style::default().fg(th.sapphire)),
                        Span::styled(*what, Style::default().fg(th.text)),
                    ])
                })
                .collect();
            f.render_widget(Paragraph::new(lines).block(dialog_block(" Keys ")), rect);
        }
        Modal::PriorityPicker {
            bug_id,
            choices,
            selected,
        } => {
            let height = u16::try_from(choices.len()).unwrap_or(u16::MAX) + 2;
            let rect = centered(area, 40, height);
            f.render_widget(Clear, rect);
            let lines: Vec<Line> = choices
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    if i == *selected {
                        Line::from(Span::styled(
                            format!("> {c}"),
                            Style::default().fg(th.crust).bg(th.lavender),
                        ))
                    } else {
                        Line::from(Span::styled(format!("  {c}"), Style::default().fg(th.text)))
                    }
                })
                .collect();
            let title = format!(" Priority for bug {bug_id} ");
            f.render_widget(Paragraph::new(lines).block(dialog_block(&title)), rect);
        }
        Modal::ApiKeyPrompt { input, pending } => {
            let rect = centered(area, 60, 6);
            f.render_widget(Clear, rect);
            let hint = pending.as_ref().map_or_else(
                || "Enter a Bugzilla API key for this session.".to_string(),
                |(id, p)| format!("An API key is needed to set bug {id} to {p}."),
            );
            let body = Paragraph::new(vec![
                Line::from(Span::styled(hint, Style::default().fg(th.text))),
                Line::from(vec![
                    Span::styled("key: ", Style::default().fg(th.overlay1)),
                    Span::styled(
                        "*".repeat(input.chars().count()),
                        Style::default().fg(th.sapphire),
                    ),
                ]),
                Line::from(Span::styled(
                    "Enter to save, Esc to cancel",
                    Style::default().fg(th.overlay1),
                )),
            ])
            .block(dialog_block(" API key "));
            f.render_widget(body, rect);
        }
    }
}
