//! Command-line argument definition and processing.

use std::path::PathBuf;

use clap::Parser;

use crate::state::Address;

/// triagedash - A terminal dashboard for triaging Bugzilla components
#[derive(Parser, Debug)]
#[command(name = "triagedash")]
#[command(version)]
#[command(about = "A terminal dashboard for triaging Bugzilla components", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Restore a selection from an address (e.g. "component=Core:DOM%3A%20Events")
    #[arg(long)]
    pub address: Option<String>,

    /// Select a component as PRODUCT:COMPONENT (repeatable)
    #[arg(short, long, value_name = "PRODUCT:COMPONENT")]
    pub component: Vec<String>,

    /// Path to the component catalog (default: components-min.json in the config dir)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Bugzilla REST base URL (default: https://bugzilla.mozilla.org/rest/)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Bugzilla API key used for priority edits
    #[arg(long, conflicts_with = "ask_api_key")]
    pub api_key: Option<String>,

    /// Prompt for the API key on the terminal without echoing it
    #[arg(long)]
    pub ask_api_key: bool,

    /// Run every search once, print the results and exit
    #[arg(long)]
    pub report: bool,

    /// Limit --report to one search (triage, stale-needinfo, stale-review, stale-decision, stale-range)
    #[arg(long, requires = "report")]
    pub search: Option<String>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

/// What: Determine the log level from command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `--log-level`.
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Build the startup address from `--address` and `--component`.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Address parsed from `--address` (empty when absent) with any `--component`
///   values appended after its own component parameters.
#[must_use]
pub fn initial_address(args: &Args) -> Address {
    let base = args
        .address
        .as_deref()
        .map(Address::parse)
        .unwrap_or_default();
    if args.component.is_empty() {
        return base;
    }
    let mut values = base.components();
    for c in &args.component {
        let c = c.trim();
        if !c.is_empty() && !values.iter().any(|v| v == c) {
            values.push(c.to_string());
        }
    }
    base.with_components(&values)
}
