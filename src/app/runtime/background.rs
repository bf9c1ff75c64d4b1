//! Terminal input thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::Event as CEvent;
use tokio::sync::mpsc;

/// What: Spawn the thread that forwards terminal events to the event loop.
///
/// Inputs:
/// - `event_tx`: Channel sender for terminal events.
/// - `cancelled`: Flag checked between polls; set it to stop the thread.
///
/// Details:
/// - Polls with a 50ms timeout so the thread notices cancellation promptly.
/// - Exits when the receiver is dropped; transient read errors are ignored.
pub fn spawn_event_thread(event_tx: mpsc::UnboundedSender<CEvent>, cancelled: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        while !cancelled.load(Ordering::Relaxed) {
            match crossterm::event::poll(Duration::from_millis(50)) {
                Ok(true) => {
                    let Ok(ev) = crossterm::event::read() else {
                        continue;
                    };
                    if cancelled.load(Ordering::Relaxed) || event_tx.send(ev).is_err() {
                        break;
                    }
                }
                Ok(false) | Err(_) => {}
            }
        }
        tracing::debug!("[Runtime] event thread exited");
    });
}
