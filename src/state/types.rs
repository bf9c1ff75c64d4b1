//! Core value types shared by the engine, the sources and the UI.

use serde::{Deserialize, Serialize};

/// Identity of a catalog entry: the Bugzilla product and component ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    /// Numeric product id.
    pub product_id: u64,
    /// Numeric component id.
    pub component_id: u64,
}

/// One product/component pair from the catalog file.
///
/// The serialized field names follow the `components-min.json` layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef {
    /// Product id as known to Bugzilla.
    pub product_id: u64,
    /// Product display name (e.g., "Core").
    pub product_name: String,
    /// Component id as known to Bugzilla.
    pub component_id: u64,
    /// Component display name (e.g., "DOM: Events").
    pub component_name: String,
    /// Free-form component description.
    #[serde(rename = "component_description", default)]
    pub description: String,
    /// Whether the component is part of the current selection.
    #[serde(skip)]
    pub selected: bool,
}

impl ComponentRef {
    /// Identity key of this entry.
    #[must_use]
    pub const fn key(&self) -> ComponentKey {
        ComponentKey {
            product_id: self.product_id,
            component_id: self.component_id,
        }
    }

    /// The `"{product}:{component}"` form used in the address.
    #[must_use]
    pub fn address_value(&self) -> String {
        format!("{}:{}", self.product_name, self.component_name)
    }

    /// Label shown in the component list.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.product_name, self.component_name)
    }
}

/// A flag attached to a bug (needinfo, review, feedback...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugFlag {
    /// Flag type name, e.g. `needinfo`.
    pub name: String,
    /// User the flag is requested from, when it is a request.
    pub requestee: Option<String>,
    /// User who set the flag.
    pub setter: String,
}

/// A bug as returned by `GET bug`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bug {
    /// Numeric bug id.
    pub id: u64,
    /// Bug type (defect, enhancement, task).
    #[serde(rename = "type")]
    pub bug_type: String,
    /// Raw severity value (e.g., `S3`, `--`).
    pub severity: String,
    /// Raw priority value (e.g., `P1`, `--`).
    pub priority: String,
    /// One-line summary.
    pub summary: String,
    /// Keywords attached to the bug.
    pub keywords: Vec<String>,
    /// Component name.
    pub component: String,
    /// Product name.
    pub product: String,
    /// Assignee login.
    pub assigned_to: String,
    /// Reporter login.
    pub creator: String,
    /// Creation timestamp (ISO-8601).
    pub creation_time: String,
    /// Flags set on the bug.
    pub flags: Vec<BugFlag>,
}

/// Response envelope for `GET bug`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BugList {
    /// Bugs matching the query.
    #[serde(default)]
    pub bugs: Vec<Bug>,
}

/// The fixed set of named searches the dashboard runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchName {
    /// Recently filed defects with no severity or still in an untriaged component.
    Triage,
    /// Open needinfo requests untouched for a while.
    StaleNeedinfo,
    /// Open review/feedback requests untouched for a while.
    StaleReview,
    /// Regressions with no status decision for the beta train.
    StaleDecision,
    /// Regressions with no status for release or beta.
    StaleRange,
}

impl SearchName {
    /// Every named search in display order.
    pub const ALL: [Self; 5] = [
        Self::Triage,
        Self::StaleNeedinfo,
        Self::StaleReview,
        Self::StaleDecision,
        Self::StaleRange,
    ];

    /// Searches shown in the Stale tab accordion.
    pub const STALE: [Self; 4] = [
        Self::StaleNeedinfo,
        Self::StaleReview,
        Self::StaleDecision,
        Self::StaleRange,
    ];

    /// Stable machine key used in logs and report output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::StaleNeedinfo => "stale-needinfo",
            Self::StaleReview => "stale-review",
            Self::StaleDecision => "stale-decision",
            Self::StaleRange => "stale-range",
        }
    }

    /// Human-readable section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Triage => "Bugs needing a triage decision",
            Self::StaleNeedinfo => "Stale needinfo requests",
            Self::StaleReview => "Stale review requests",
            Self::StaleDecision => "Regressions without a status decision",
            Self::StaleRange => "Regressions without a regression range status",
        }
    }

    /// Parse a machine key back into a search name.
    #[must_use]
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == s.trim())
    }
}

/// One bug projected into display fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRow {
    /// Bug id; rows are keyed and ordered by it.
    pub id: u64,
    /// Bug type.
    pub bug_type: String,
    /// Human severity label.
    pub severity: String,
    /// Raw priority value currently displayed.
    pub priority: String,
    /// Human priority label for `priority`.
    pub priority_label: String,
    /// Summary followed by keywords.
    pub description: String,
    /// `"{product}: {component}"`.
    pub component: String,
    /// Owner and reporter line.
    pub users: String,
    /// Creation time, `YYYY-MM-DD HH:MM`.
    pub created: String,
    /// Link to the bug page.
    pub url: String,
    /// Inline message for this row (failed priority edit).
    pub notice: Option<String>,
}

/// Load state of one named search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing has been requested yet.
    NotLoaded,
    /// No component is selected, so the search is suppressed.
    NothingSelected,
    /// A request is in flight.
    Loading,
    /// The last request completed.
    Loaded,
    /// The last request failed; rows from before the failure are kept.
    Failed(String),
}

/// View model of one named search handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchView {
    /// Current load state.
    pub status: SearchStatus,
    /// Rows sorted by ascending id.
    pub rows: Vec<ViewRow>,
    /// Result count of the last completed load; `None` until one completes.
    pub count: Option<usize>,
    /// Browser link to the same search on the Bugzilla web UI.
    pub link: Option<String>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            status: SearchStatus::NotLoaded,
            rows: Vec::new(),
            count: None,
            link: None,
        }
    }
}

impl SearchView {
    /// Badge text shown next to a section title.
    ///
    /// `(none!)` for an empty result, `(n)` otherwise, and empty while nothing
    /// has completed.
    #[must_use]
    pub fn marker(&self) -> String {
        match (&self.status, self.count) {
            (SearchStatus::NothingSelected, _) => String::new(),
            (_, Some(0)) => "(none!)".to_string(),
            (_, Some(n)) => format!("({n})"),
            (_, None) => String::new(),
        }
    }

    /// Whether the marker should be highlighted as needing attention.
    #[must_use]
    pub fn is_pending_attention(&self) -> bool {
        matches!(self.count, Some(n) if n > 0)
            && !matches!(self.status, SearchStatus::NothingSelected)
    }
}
