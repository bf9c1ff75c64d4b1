//! Dashboard engine: selection, address history, named searches and priority edits.
//!
//! The engine is owned by the event loop. Every network operation goes through
//! the [`RequestTracker`]; completions come back as [`TrackerEvent`]s on the
//! receiver returned by [`Dashboard::new`] and are applied with
//! [`Dashboard::handle_completion`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::logic::query::{CommonParams, build_query};
use crate::logic::reconcile::{RowFormat, reconcile};
use crate::logic::templates::SearchTemplate;
use crate::logic::tracker::{Completion, RequestTracker};
use crate::sources::BugSource;
use crate::state::{
    Address, AddressHistory, Bug, Catalog, ComponentKey, SearchName, SearchStatus, SearchView,
    ViewRow,
};

/// Keys under which requests are tracked; one live request per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKey {
    /// A named search.
    Search(SearchName),
    /// A priority update for one bug.
    Priority(u64),
}

/// Successful outcome of a tracked request.
#[derive(Debug)]
pub enum Payload {
    /// Bugs returned by a search, in server order.
    Bugs(Vec<Bug>),
    /// The server accepted a priority change.
    PriorityUpdated,
}

/// Message delivered by the tracker when a request finishes.
pub type TrackerEvent = Completion<RequestKey, Payload>;

/// Why a priority edit was refused before reaching the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    /// No API key is configured.
    MissingApiKey,
    /// The bug is not shown in any view.
    UnknownBug(u64),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "an API key is required to change priorities"),
            Self::UnknownBug(id) => write!(f, "bug {id} is not on the dashboard"),
        }
    }
}

impl std::error::Error for EditError {}

/// Optimistic priority change awaiting the server.
#[derive(Clone, Debug)]
struct PendingEdit {
    /// Last value known to be on the server; restored on failure.
    previous: String,
    /// Value shown while the request is in flight.
    requested: String,
}

/// The engine behind the dashboard views.
///
/// Invariant: the tracker never holds two live requests under one [`RequestKey`],
/// so each named search has at most one fetch in flight and late results from a
/// superseded fetch are discarded.
pub struct Dashboard {
    catalog: Catalog,
    history: AddressHistory,
    templates: Vec<SearchTemplate>,
    views: BTreeMap<SearchName, SearchView>,
    tracker: RequestTracker<RequestKey, Payload>,
    source: Arc<dyn BugSource>,
    format: RowFormat,
    api_key: Option<Zeroizing<String>>,
    pending_edits: HashMap<u64, PendingEdit>,
}

impl Dashboard {
    /// What: Build the engine and apply the initial address to the catalog.
    ///
    /// Inputs:
    /// - `catalog`: Loaded component catalog.
    /// - `initial`: Startup address; its `component` values become the selection.
    /// - `templates`: Named searches to run.
    /// - `source`: Bug tracker backend.
    /// - `format`: Row projection settings.
    /// - `api_key`: Key for authenticated edits, if any.
    ///
    /// Output:
    /// - `(dashboard, events)`; feed every message from `events` to
    ///   [`Self::handle_completion`].
    ///
    /// Details:
    /// - Nothing is dispatched here; call [`Self::refresh_all`] once a runtime is running.
    #[must_use]
    pub fn new(
        mut catalog: Catalog,
        initial: Address,
        templates: Vec<SearchTemplate>,
        source: Arc<dyn BugSource>,
        format: RowFormat,
        api_key: Option<Zeroizing<String>>,
    ) -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        catalog.from_address(&initial.components());
        let views = templates
            .iter()
            .map(|t| (t.name, SearchView::default()))
            .collect();
        let (tracker, events) = RequestTracker::new();
        (
            Self {
                catalog,
                history: AddressHistory::new(initial),
                templates,
                views,
                tracker,
                source,
                format,
                api_key: api_key.filter(|k| !k.trim().is_empty()),
                pending_edits: HashMap::new(),
            },
            events,
        )
    }

    /// The component catalog with current selection flags.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The address reflecting the current selection.
    #[must_use]
    pub fn address(&self) -> &Address {
        self.history.current()
    }

    /// View state of one named search.
    #[must_use]
    pub fn view(&self, name: SearchName) -> Option<&SearchView> {
        self.views.get(&name)
    }

    /// All views in [`SearchName`] order.
    pub fn views(&self) -> impl Iterator<Item = (SearchName, &SearchView)> {
        self.views.iter().map(|(n, v)| (*n, v))
    }

    /// Row projection settings.
    #[must_use]
    pub const fn format(&self) -> &RowFormat {
        &self.format
    }

    /// Whether history navigation backwards is possible.
    #[must_use]
    pub const fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    /// Whether history navigation forwards is possible.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    /// Number of requests in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.pending_len()
    }

    /// Whether an API key is available for edits.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Replace the API key; blank keys count as none.
    pub fn set_api_key(&mut self, key: Option<Zeroizing<String>>) {
        self.api_key = key.filter(|k| !k.trim().is_empty());
    }

    /// First row for bug `id` across all views.
    #[must_use]
    pub fn find_row(&self, id: u64) -> Option<&ViewRow> {
        self.views
            .values()
            .flat_map(|v| v.rows.iter())
            .find(|r| r.id == id)
    }

    /// What: Flip one component and re-run every search.
    ///
    /// Inputs:
    /// - `key`: Identity of the catalog entry.
    ///
    /// Output:
    /// - `false` when the key is not in the catalog (nothing changes).
    ///
    /// Details:
    /// - Pushes the new address onto the history before dispatching.
    pub fn toggle(&mut self, key: ComponentKey) -> bool {
        let Some(now_selected) = self.catalog.toggle(key) else {
            debug!(?key, "[Dashboard] toggle for unknown component");
            return false;
        };
        let next = self
            .history
            .current()
            .with_components(&self.catalog.to_address());
        info!(
            selected = now_selected,
            total = self.catalog.selected_count(),
            address = %next,
            "[Dashboard] selection changed"
        );
        self.history.push(next);
        self.refresh_all();
        true
    }

    /// Step back in the address history and re-run the searches. Returns `false` at the start.
    pub fn navigate_back(&mut self) -> bool {
        let Some(addr) = self.history.back().cloned() else {
            return false;
        };
        self.apply_address(&addr);
        true
    }

    /// Step forward in the address history and re-run the searches. Returns `false` at the end.
    pub fn navigate_forward(&mut self) -> bool {
        let Some(addr) = self.history.forward().cloned() else {
            return false;
        };
        self.apply_address(&addr);
        true
    }

    fn apply_address(&mut self, addr: &Address) {
        self.catalog.from_address(&addr.components());
        debug!(address = %addr, "[Dashboard] history navigation");
        self.refresh_all();
    }

    /// What: Cancel outstanding searches and dispatch every named search for the selection.
    ///
    /// Details:
    /// - With an empty selection nothing is dispatched and every view reports
    ///   [`SearchStatus::NothingSelected`] with rows, count and link cleared.
    /// - Priority updates in flight are left alone.
    pub fn refresh_all(&mut self) {
        let cancelled = self
            .tracker
            .cancel_matching(|k| matches!(k, RequestKey::Search(_)));
        if cancelled > 0 {
            debug!(cancelled, "[Dashboard] cancelled outstanding searches");
        }
        if self.catalog.selected_count() == 0 {
            for view in self.views.values_mut() {
                *view = SearchView {
                    status: SearchStatus::NothingSelected,
                    ..SearchView::default()
                };
            }
            info!("[Dashboard] nothing selected; searches suppressed");
            return;
        }
        let common = self.catalog.common_params();
        for idx in 0..self.templates.len() {
            self.dispatch_search(idx, &common);
        }
    }

    /// What: Re-run one named search.
    ///
    /// Output:
    /// - `false` when the search is unknown or nothing is selected.
    pub fn refresh(&mut self, name: SearchName) -> bool {
        let Some(idx) = self.templates.iter().position(|t| t.name == name) else {
            return false;
        };
        if self.catalog.selected_count() == 0 {
            if let Some(view) = self.views.get_mut(&name) {
                view.status = SearchStatus::NothingSelected;
            }
            return false;
        }
        let common = self.catalog.common_params();
        self.dispatch_search(idx, &common);
        true
    }

    fn dispatch_search(&mut self, idx: usize, common: &CommonParams) {
        let template = &self.templates[idx];
        let name = template.name;
        let query = build_query(template, common);
        let link = format!(
            "{}buglist.cgi?{}",
            self.format.web_base,
            query.to_query_string()
        );
        let request = self.source.search(query);
        let id = self.tracker.dispatch(RequestKey::Search(name), async move {
            request
                .await
                .map(Payload::Bugs)
                .map_err(|e| e.to_string())
        });
        debug!(search = name.key(), id, "[Dashboard] search dispatched");
        let view = self.views.entry(name).or_default();
        view.status = SearchStatus::Loading;
        view.link = Some(link);
    }

    /// What: Apply a tracker completion to the views.
    ///
    /// Inputs:
    /// - `event`: Message received from the tracker channel.
    ///
    /// Output:
    /// - `true` when a view changed; `false` for stale or cancelled results.
    ///
    /// Details:
    /// - Search failures keep the previous rows and record the error.
    /// - Priority failures restore the last server value and attach a notice to the row.
    pub fn handle_completion(&mut self, event: TrackerEvent) -> bool {
        let key = event.key;
        let Some(result) = self.tracker.settle(event) else {
            return false;
        };
        match (key, result) {
            (RequestKey::Search(name), Ok(Payload::Bugs(bugs))) => {
                self.apply_search_result(name, bugs);
            }
            (RequestKey::Search(name), Err(err)) => {
                warn!(search = name.key(), error = %err, "[Dashboard] search failed");
                if let Some(view) = self.views.get_mut(&name) {
                    view.status = SearchStatus::Failed(err);
                }
            }
            (RequestKey::Priority(id), Ok(_)) => {
                if let Some(edit) = self.pending_edits.remove(&id) {
                    info!(bug = id, priority = %edit.requested, "[Dashboard] priority updated");
                }
            }
            (RequestKey::Priority(id), Err(err)) => self.revert_priority(id, &err),
            (RequestKey::Search(name), Ok(Payload::PriorityUpdated)) => {
                debug!(search = name.key(), "[Dashboard] unexpected payload for search");
                return false;
            }
        }
        true
    }

    fn apply_search_result(&mut self, name: SearchName, bugs: Vec<Bug>) {
        let post_filter = self
            .templates
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.post_filter);
        let fetched = bugs.len();
        let mut out = reconcile(bugs, post_filter, &self.format);
        for row in &mut out.rows {
            if let Some(edit) = self.pending_edits.get_mut(&row.id) {
                edit.previous.clone_from(&row.priority);
                self.format.set_priority(row, &edit.requested);
            }
        }
        info!(
            search = name.key(),
            fetched,
            shown = out.count,
            "[Dashboard] search loaded"
        );
        let view = self.views.entry(name).or_default();
        view.rows = out.rows;
        view.count = Some(out.count);
        view.status = SearchStatus::Loaded;
    }

    fn revert_priority(&mut self, id: u64, err: &str) {
        let Some(edit) = self.pending_edits.remove(&id) else {
            return;
        };
        warn!(
            bug = id,
            requested = %edit.requested,
            restored = %edit.previous,
            error = %err,
            "[Dashboard] priority update failed"
        );
        let notice = format!("Priority update failed: {err}");
        for row in rows_for(&mut self.views, id) {
            self.format.set_priority(row, &edit.previous);
            row.notice = Some(notice.clone());
        }
    }

    /// What: Change the priority of a bug optimistically.
    ///
    /// Inputs:
    /// - `id`: Bug id shown in some view.
    /// - `priority`: New raw priority value (e.g., `P1`).
    ///
    /// Output:
    /// - `Ok(())` once the update is dispatched and the rows show the new value.
    ///
    /// # Errors
    /// - [`EditError::MissingApiKey`] when no key is configured; nothing is sent.
    /// - [`EditError::UnknownBug`] when no view shows the bug.
    pub fn set_priority(&mut self, id: u64, priority: &str) -> Result<(), EditError> {
        let Some(key) = self.api_key.clone() else {
            return Err(EditError::MissingApiKey);
        };
        let current = self
            .find_row(id)
            .map(|r| r.priority.clone())
            .ok_or(EditError::UnknownBug(id))?;
        self.pending_edits
            .entry(id)
            .and_modify(|e| e.requested = priority.to_string())
            .or_insert_with(|| PendingEdit {
                previous: current,
                requested: priority.to_string(),
            });
        for row in rows_for(&mut self.views, id) {
            self.format.set_priority(row, priority);
            row.notice = None;
        }
        let request = self.source.update_priority(id, priority.to_string(), key);
        self.tracker.dispatch(RequestKey::Priority(id), async move {
            request
                .await
                .map(|()| Payload::PriorityUpdated)
                .map_err(|e| e.to_string())
        });
        info!(bug = id, priority, "[Dashboard] priority update dispatched");
        Ok(())
    }
}

/// Every row showing bug `id`, across all views.
fn rows_for(
    views: &mut BTreeMap<SearchName, SearchView>,
    id: u64,
) -> impl Iterator<Item = &mut ViewRow> {
    views
        .values_mut()
        .flat_map(|v| v.rows.iter_mut())
        .filter(move |r| r.id == id)
}
