use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::select;
use tokio::sync::mpsc;

use crossterm::event::Event as CEvent;

use crate::logic::{Dashboard, TrackerEvent};
use crate::state::AppState;
use crate::ui::ui;

/// What: Drive rendering and input until the user quits.
///
/// Inputs:
/// - `terminal`: Ratatui terminal to draw on.
/// - `app`: UI state.
/// - `dash`: Dashboard engine.
/// - `event_rx`: Terminal events from the input thread.
/// - `tracker_rx`: Request completions from the engine's tracker.
///
/// Output:
/// - Returns when a key handler asks to exit or the input channel closes.
///
/// Details:
/// - Redraws after every handled message; draw errors are logged and ignored.
/// - Completions arriving in a burst are drained before the next redraw.
pub async fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dash: &mut Dashboard,
    event_rx: &mut mpsc::UnboundedReceiver<CEvent>,
    tracker_rx: &mut mpsc::UnboundedReceiver<TrackerEvent>,
) {
    loop {
        if let Err(e) = terminal.draw(|f| ui(f, app, dash)) {
            tracing::warn!(error = %e, "[Runtime] draw failed");
        }
        select! {
            ev = event_rx.recv() => {
                let Some(ev) = ev else {
                    tracing::info!("[Runtime] input channel closed");
                    break;
                };
                if crate::events::handle_event(&ev, app, dash) {
                    break;
                }
            }
            Some(done) = tracker_rx.recv() => {
                dash.handle_completion(done);
                while let Ok(more) = tracker_rx.try_recv() {
                    dash.handle_completion(more);
                }
            }
        }
    }
}
