//! Modal key handling: alerts, help, priority picker and API key prompt.

use crossterm::event::{KeyCode, KeyEvent};
use zeroize::Zeroizing;

use crate::logic::{Dashboard, EditError};
use crate::state::{AppState, Modal};

/// What: Route a key to the open modal.
///
/// Details:
/// - Esc closes any modal without side effects.
/// - A priority choice without an API key turns the picker into the key prompt and
///   retries the edit once a key is entered.
pub(super) fn handle_modal_key(ke: KeyEvent, app: &mut AppState, dash: &mut Dashboard) {
    if ke.code == KeyCode::Esc {
        app.modal = Modal::None;
        return;
    }
    match &mut app.modal {
        Modal::None => {}
        Modal::Alert { .. } | Modal::Help => {
            if ke.code == KeyCode::Enter {
                app.modal = Modal::None;
            }
        }
        Modal::PriorityPicker {
            bug_id,
            choices,
            selected,
        } => match ke.code {
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = super::step(Some(*selected), choices.len(), 1).unwrap_or(0);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = super::step(Some(*selected), choices.len(), -1).unwrap_or(0);
            }
            KeyCode::Enter => {
                let id = *bug_id;
                let Some(choice) = choices.get(*selected).cloned() else {
                    app.modal = Modal::None;
                    return;
                };
                app.modal = Modal::None;
                apply_priority(app, dash, id, choice);
            }
            _ => {}
        },
        Modal::ApiKeyPrompt { input, pending } => match ke.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let key = Zeroizing::new(input.trim().to_string());
                let retry = pending.take();
                app.modal = Modal::None;
                if key.is_empty() {
                    app.set_status("No API key entered; priority edits stay disabled");
                    return;
                }
                dash.set_api_key(Some(key));
                match retry {
                    Some((id, choice)) => apply_priority(app, dash, id, choice),
                    None => app.set_status("API key set for this session"),
                }
            }
            _ => {}
        },
    }
}

fn apply_priority(app: &mut AppState, dash: &mut Dashboard, id: u64, choice: String) {
    match dash.set_priority(id, &choice) {
        Ok(()) => app.set_status(format!("Setting priority of bug {id} to {choice}")),
        Err(EditError::MissingApiKey) => {
            app.modal = Modal::ApiKeyPrompt {
                input: Zeroizing::new(String::new()),
                pending: Some((id, choice)),
            };
        }
        Err(e @ EditError::UnknownBug(_)) => {
            app.modal = Modal::Alert {
                message: e.to_string(),
            };
        }
    }
}
