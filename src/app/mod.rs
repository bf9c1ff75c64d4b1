//! triagedash application module: session setup, terminal runtime and headless report.

/// Headless report rendering.
mod report;
/// Runtime event loop and session setup.
mod runtime;
/// Terminal setup and restoration utilities.
mod terminal;

pub use report::{render_report, run_report};
pub use runtime::{apply_cli_overrides, build_dashboard, run};
