//! Session runtime: startup, the TUI event loop and shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::Event as CEvent;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::args::Args;
use crate::config::load_settings;
use crate::state::AppState;

use super::report::run_report;
use super::terminal::{restore_terminal, setup_terminal};

mod background;
mod event_loop;
mod init;

pub use init::{apply_cli_overrides, build_dashboard};

/// Result type alias for runtime operations.
pub(super) type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Run triagedash end-to-end: settings, catalog, engine, then the TUI or the report.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - `Ok(())` on a clean exit; `Err` when startup fails (unreadable catalog, bad API base,
///   terminal errors).
///
/// Details:
/// - Settings come from `settings.conf`, then command-line flags.
/// - `--report` runs every search once and prints to stdout without touching the terminal modes.
/// - On a normal exit the final address is printed so the session can be resumed with `--address`.
pub async fn run(args: Args) -> Result<()> {
    let mut settings = apply_cli_overrides(load_settings(), &args);
    if args.ask_api_key {
        settings.api_key = init::prompt_api_key()?;
    }
    let (mut dash, mut tracker_rx) = build_dashboard(&settings, &args)?;

    if args.report {
        let out = run_report(&mut dash, &mut tracker_rx, args.search.as_deref()).await?;
        print!("{out}");
        return Ok(());
    }

    let mut app = AppState::new(dash.catalog().selected_count() > 0);
    app.priority_choices.clone_from(&settings.priority_choices);

    setup_terminal()?;
    let mut terminal = match Terminal::new(CrosstermBackend::new(std::io::stdout())) {
        Ok(t) => t,
        Err(e) => {
            let _ = restore_terminal();
            return Err(e.into());
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<CEvent>();
    let event_thread_cancelled = Arc::new(AtomicBool::new(false));
    background::spawn_event_thread(event_tx, Arc::clone(&event_thread_cancelled));

    dash.refresh_all();
    event_loop::run_event_loop(
        &mut terminal,
        &mut app,
        &mut dash,
        &mut event_rx,
        &mut tracker_rx,
    )
    .await;

    event_thread_cancelled.store(true, Ordering::Relaxed);
    restore_terminal()?;
    println!("{}", dash.address());
    Ok(())
}
