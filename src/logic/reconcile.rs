//! Result reconciler: raw bugs → sorted, keyed view rows.

use crate::config::LabelTables;
use crate::logic::templates::PostFilter;
use crate::state::{Bug, ViewRow};
use crate::util::format_bug_time;

/// How bugs are projected into rows: label vocabularies and link base.
#[derive(Clone, Debug)]
pub struct RowFormat {
    /// Priority/severity labels.
    pub labels: LabelTables,
    /// Web UI base ending in `/`; bug links are `{web_base}show_bug.cgi?id={id}`.
    pub web_base: String,
}

impl RowFormat {
    /// Link to the bug page for `id`.
    #[must_use]
    pub fn bug_url(&self, id: u64) -> String {
        format!("{}show_bug.cgi?id={id}", self.web_base)
    }

    /// What: Project one bug into display fields.
    ///
    /// Inputs:
    /// - `bug`: Fetched bug.
    ///
    /// Output:
    /// - `ViewRow` with labels resolved, summary+keywords, owner/reporter and creation time.
    #[must_use]
    pub fn project(&self, bug: &Bug) -> ViewRow {
        let mut description = bug.summary.clone();
        if !bug.keywords.is_empty() {
            description.push(' ');
            description.push_str(&bug.keywords.join(","));
        }
        ViewRow {
            id: bug.id,
            bug_type: bug.bug_type.clone(),
            severity: self.labels.severity.label(&bug.severity),
            priority: bug.priority.clone(),
            priority_label: self.labels.priority.label(&bug.priority),
            description,
            component: format!("{}: {}", bug.product, bug.component),
            users: format!("Owner: {} Reporter: {}", bug.assigned_to, bug.creator),
            created: format_bug_time(&bug.creation_time),
            url: self.bug_url(bug.id),
            notice: None,
        }
    }

    /// Re-label a row after its priority changed locally.
    pub fn set_priority(&self, row: &mut ViewRow, priority: &str) {
        row.priority = priority.to_string();
        row.priority_label = self.labels.priority.label(priority);
    }
}

/// Output of [`reconcile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    /// Rows sorted by ascending bug id.
    pub rows: Vec<ViewRow>,
    /// Number of rows; zero is the reportable "none" state.
    pub count: usize,
}

/// What: Filter, sort and project a fetched bug list.
///
/// Inputs:
/// - `bugs`: Raw bugs in server order.
/// - `post_filter`: Optional client-side predicate.
/// - `format`: Row projection settings.
///
/// Output:
/// - Rows ordered by ascending id and their count.
///
/// Details:
/// - Pure: no I/O, same output for any permutation of the same input set.
#[must_use]
pub fn reconcile(
    mut bugs: Vec<Bug>,
    post_filter: Option<PostFilter>,
    format: &RowFormat,
) -> Reconciled {
    if let Some(keep) = post_filter {
        bugs.retain(|b| keep(b));
    }
    bugs.sort_by_key(|b| b.id);
    let rows: Vec<ViewRow> = bugs.iter().map(|b| format.project(b)).collect();
    let count = rows.len();
    Reconciled { rows, count }
}
