//! Shareable address (query string) and its navigation history.
//!
//! The address plays the role a browser location bar would: it reflects the
//! selection as repeated `component={product}:{component}` parameters, can be
//! passed on the command line to restore a session, and keeps a back/forward
//! history of selection changes.

use std::fmt;

use url::form_urlencoded;

/// Query parameter carrying one selected component.
pub const COMPONENT_PARAM: &str = "component";

/// A parsed query string with order-preserving, multi-valued parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    pairs: Vec<(String, String)>,
}

impl Address {
    /// What: Parse a query string into an address.
    ///
    /// Inputs:
    /// - `query`: Form-encoded text; a leading `?` and everything up to it are ignored.
    ///
    /// Output:
    /// - Address holding every `key=value` pair in order.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let q = query.trim();
        let q = q.split_once('?').map_or(q, |(_, rest)| rest);
        let pairs = form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Build an address holding only the given component values.
    #[must_use]
    pub fn from_components<S: AsRef<str>>(values: &[S]) -> Self {
        Self::default().with_components(values)
    }

    /// The `component` values in order of appearance.
    #[must_use]
    pub fn components(&self) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == COMPONENT_PARAM)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// What: Replace every `component` parameter.
    ///
    /// Inputs:
    /// - `values`: New component values.
    ///
    /// Output:
    /// - New address; other parameters keep their position and the new
    ///   component values are appended at the end.
    #[must_use]
    pub fn with_components<S: AsRef<str>>(&self, values: &[S]) -> Self {
        let mut pairs: Vec<(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != COMPONENT_PARAM)
            .cloned()
            .collect();
        pairs.extend(
            values
                .iter()
                .map(|v| (COMPONENT_PARAM.to_string(), v.as_ref().to_string())),
        );
        Self { pairs }
    }

    /// Form-encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Back/forward history of addresses.
///
/// Invariant: `cursor` always indexes a valid entry.
#[derive(Clone, Debug)]
pub struct AddressHistory {
    entries: Vec<Address>,
    cursor: usize,
}

impl AddressHistory {
    /// Start a history at `initial`.
    #[must_use]
    pub fn new(initial: Address) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The address currently shown.
    #[must_use]
    pub fn current(&self) -> &Address {
        &self.entries[self.cursor]
    }

    /// What: Record a new address after a user action.
    ///
    /// Details:
    /// - Drops any forward entries, like a browser does after navigating.
    /// - Pushing an address equal to the current one is ignored.
    pub fn push(&mut self, addr: Address) {
        if *self.current() == addr {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(addr);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back; returns the new current address, or `None` at the start.
    pub fn back(&mut self) -> Option<&Address> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward; returns the new current address, or `None` at the end.
    pub fn forward(&mut self) -> Option<&Address> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Whether [`Self::back`] would move.
    #[must_use]
    pub const fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`Self::forward`] would move.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
