//! Modal dialog state.

use std::fmt;

use zeroize::Zeroizing;

/// What: Modal dialogs layered over the dashboard.
///
/// Details:
/// - Only one modal is active at a time; [`Modal::None`] means the main view has input focus.
/// - The API key prompt holds its input in zeroizing memory and never prints it.
#[derive(Clone, Default)]
pub enum Modal {
    /// No dialog open.
    #[default]
    None,
    /// Informational message dismissed with Enter or Esc.
    Alert {
        /// Text to show.
        message: String,
    },
    /// Choose a new priority for one bug.
    PriorityPicker {
        /// Bug being edited.
        bug_id: u64,
        /// Raw priority values offered.
        choices: Vec<String>,
        /// Highlighted index into `choices`.
        selected: usize,
    },
    /// Ask for the API key, then resume the edit that needed it.
    ApiKeyPrompt {
        /// Masked input buffer.
        input: Zeroizing<String>,
        /// Edit to retry once a key is entered: `(bug_id, priority)`.
        pending: Option<(u64, String)>,
    },
    /// Key binding overview.
    Help,
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Alert { message } => f.debug_struct("Alert").field("message", message).finish(),
            Self::PriorityPicker {
                bug_id,
                choices,
                selected,
            } => f
                .debug_struct("PriorityPicker")
                .field("bug_id", bug_id)
                .field("choices", choices)
                .field("selected", selected)
                .finish(),
            Self::ApiKeyPrompt { input, pending } => f
                .debug_struct("ApiKeyPrompt")
                .field("input_len", &input.len())
                .field("pending", pending)
                .finish(),
            Self::Help => f.write_str("Help"),
        }
    }
}

impl Modal {
    /// Whether a dialog is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}
