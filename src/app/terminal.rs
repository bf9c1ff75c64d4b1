use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use super::runtime::Result;

/// Switch the terminal into raw mode on the alternate screen.
///
/// # Errors
/// - Returns `Err` when the terminal modes cannot be changed.
pub fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Leave the alternate screen and restore cooked mode.
///
/// # Errors
/// - Returns `Err` when the terminal modes cannot be changed.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
