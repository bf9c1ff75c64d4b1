//! End-to-end engine flows against a gated in-memory bug source.
//!
//! Every search the engine dispatches parks on a oneshot until the test
//! releases it, so completion order is fully controlled.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use triagedash::config::{LabelTables, ReleaseTrain};
use triagedash::logic::{
    Dashboard, EditError, Query, RowFormat, TrackerEvent, standard_templates,
};
use triagedash::sources::{self, BugSource};
use triagedash::state::{
    Address, Bug, BugFlag, Catalog, ComponentKey, ComponentRef, SearchName, SearchStatus,
};
use zeroize::Zeroizing;

/// Outcome handed to a parked request.
type Reply<T> = oneshot::Sender<Result<T, String>>;

#[derive(Default)]
struct GatedSource {
    searches: Mutex<Vec<(Query, Reply<Vec<Bug>>)>>,
    updates: Mutex<Vec<(u64, String, Reply<()>)>>,
}

impl GatedSource {
    /// Remove and return every search dispatched so far, in dispatch order.
    fn take_searches(&self) -> Vec<(Query, Reply<Vec<Bug>>)> {
        std::mem::take(&mut *self.searches.lock().expect("lock"))
    }

    fn take_updates(&self) -> Vec<(u64, String, Reply<()>)> {
        std::mem::take(&mut *self.updates.lock().expect("lock"))
    }
}

async fn parked<T: Send + 'static>(rx: oneshot::Receiver<Result<T, String>>) -> sources::Result<T> {
    match rx.await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err("request dropped".into()),
    }
}

impl BugSource for GatedSource {
    fn search(&self, query: Query) -> BoxFuture<'static, sources::Result<Vec<Bug>>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().expect("lock").push((query, tx));
        parked(rx).boxed()
    }

    fn update_priority(
        &self,
        id: u64,
        priority: String,
        _api_key: Zeroizing<String>,
    ) -> BoxFuture<'static, sources::Result<()>> {
        let (tx, rx) = oneshot::channel();
        self.updates.lock().expect("lock").push((id, priority, tx));
        parked(rx).boxed()
    }
}

fn entry(pid: u64, product: &str, cid: u64, component: &str) -> ComponentRef {
    ComponentRef {
        product_id: pid,
        product_name: product.into(),
        component_id: cid,
        component_name: component.into(),
        description: String::new(),
        selected: false,
    }
}

fn bug(id: u64, priority: &str) -> Bug {
    Bug {
        id,
        bug_type: "defect".into(),
        priority: priority.into(),
        summary: format!("bug {id}"),
        product: "A".into(),
        component: "1".into(),
        ..Bug::default()
    }
}

fn engine(
    address: &str,
    api_key: Option<&str>,
) -> (
    Dashboard,
    mpsc::UnboundedReceiver<TrackerEvent>,
    Arc<GatedSource>,
) {
    let source = Arc::new(GatedSource::default());
    let (dash, rx) = Dashboard::new(
        Catalog::new(vec![entry(1, "A", 1, "1"), entry(2, "B", 2, "2")]),
        Address::parse(address),
        standard_templates(&ReleaseTrain::default()),
        Arc::clone(&source) as Arc<dyn BugSource>,
        RowFormat {
            labels: LabelTables::default(),
            web_base: "https://bz.example/".into(),
        },
        api_key.map(|k| Zeroizing::new(k.to_string())),
    );
    (dash, rx, source)
}

const B2: ComponentKey = ComponentKey {
    product_id: 2,
    component_id: 2,
};

/// Receive the next completion or fail after a short wait.
async fn next(rx: &mut mpsc::UnboundedReceiver<TrackerEvent>) -> TrackerEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("completion in time")
        .expect("channel open")
}

/// Whether anything arrives within a short window.
async fn quiet(rx: &mut mpsc::UnboundedReceiver<TrackerEvent>) -> bool {
    tokio::time::timeout(Duration::from_millis(50), rx.recv())
        .await
        .is_err()
}

#[tokio::test]
/// What: Changing the selection supersedes every outstanding search.
///
/// Inputs:
/// - `A:1` selected and refreshed; `B:2` toggled on before any reply.
/// - The old requests are answered anyway, then the new ones.
///
/// Output:
/// - Nothing from the old generation reaches the engine; the triage view shows
///   the second generation's rows only.
async fn selection_change_discards_superseded_results() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", None);
    dash.refresh_all();
    let first = source.take_searches();
    assert_eq!(first.len(), SearchName::ALL.len());
    assert_eq!(dash.in_flight(), SearchName::ALL.len());

    assert!(dash.toggle(B2));
    let second = source.take_searches();
    assert_eq!(second.len(), SearchName::ALL.len());
    assert_eq!(dash.in_flight(), SearchName::ALL.len());

    for (_, reply) in first {
        let _ = reply.send(Ok(vec![bug(1, "P1")]));
    }
    assert!(quiet(&mut rx).await, "superseded searches must not deliver");

    for (i, (_, reply)) in second.into_iter().enumerate() {
        let bugs = if i == 0 {
            vec![bug(30, "--"), bug(20, "--")]
        } else {
            Vec::new()
        };
        let _ = reply.send(Ok(bugs));
    }
    for _ in 0..SearchName::ALL.len() {
        let event = next(&mut rx).await;
        assert!(dash.handle_completion(event));
    }
    assert_eq!(dash.in_flight(), 0);

    let triage = dash.view(SearchName::Triage).expect("triage view");
    assert_eq!(triage.status, SearchStatus::Loaded);
    let ids: Vec<u64> = triage.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![20, 30]);
    assert_eq!(triage.marker(), "(2)");
    let stale = dash.view(SearchName::StaleNeedinfo).expect("stale view");
    assert_eq!(stale.marker(), "(none!)");
}

#[tokio::test]
/// What: Deselecting the last component suppresses every search.
///
/// Inputs:
/// - `A:1` selected and refreshed, then toggled off while requests are pending.
///
/// Output:
/// - No new requests, nothing in flight, every view `NothingSelected` with no rows or link.
async fn empty_selection_suppresses_searches() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", None);
    dash.refresh_all();
    let pending = source.take_searches();
    assert!(dash.toggle(ComponentKey {
        product_id: 1,
        component_id: 1,
    }));
    assert!(source.take_searches().is_empty());
    assert_eq!(dash.in_flight(), 0);
    for (_, reply) in pending {
        let _ = reply.send(Ok(vec![bug(1, "P1")]));
    }
    assert!(quiet(&mut rx).await);
    for (_, view) in dash.views() {
        assert_eq!(view.status, SearchStatus::NothingSelected);
        assert!(view.rows.is_empty());
        assert!(view.link.is_none());
        assert_eq!(view.marker(), "");
    }
    assert!(!dash.refresh(SearchName::Triage));
    assert_eq!(dash.address().to_query_string(), "");
}

#[tokio::test]
/// What: Searches are scoped to exactly the selected components.
///
/// Inputs:
/// - Catalog `[A:1, B:2]`; only `A:1` selected.
///
/// Output:
/// - Every query carries `product=A` and `component=1` and never mentions `B` or `2`.
/// - Each view links to the same search on the web UI.
async fn queries_follow_selection() {
    let (mut dash, _rx, source) = engine("component=A%3A1", None);
    dash.refresh_all();
    let searches = source.take_searches();
    for (query, _) in &searches {
        assert_eq!(query.values("product"), vec!["A"]);
        assert_eq!(query.values("component"), vec!["1"]);
        assert!(!query.mentions("B"));
        assert!(!query.mentions("2"));
    }
    let triage_qs = searches[0].0.to_query_string();
    let link = dash
        .view(SearchName::Triage)
        .and_then(|v| v.link.clone())
        .expect("link");
    assert_eq!(link, format!("https://bz.example/buglist.cgi?{triage_qs}"));
}

#[tokio::test]
/// What: The address mirrors the selection and history moves without growing.
///
/// Inputs:
/// - Start at `A:1`, toggle `B:2` on, go back, go forward.
///
/// Output:
/// - Addresses decode to the selected values; back and forward restore the
///   selection and re-run the searches.
async fn address_history_round_trip() {
    let (mut dash, _rx, source) = engine("?component=A%3A1", None);
    assert!(!dash.can_go_back());
    assert!(dash.toggle(B2));
    let both = dash.address().clone();
    assert_eq!(both.components(), vec!["A:1", "B:2"]);
    assert_eq!(Address::parse(&both.to_query_string()), both);
    source.take_searches();

    assert!(dash.navigate_back());
    assert_eq!(dash.catalog().to_address(), vec!["A:1"]);
    assert_eq!(dash.address().components(), vec!["A:1"]);
    assert_eq!(source.take_searches().len(), SearchName::ALL.len());
    assert!(dash.can_go_forward());

    assert!(dash.navigate_forward());
    assert_eq!(dash.address(), &both);
    assert_eq!(dash.catalog().to_address(), vec!["A:1", "B:2"]);
    assert!(!dash.navigate_forward());
    assert!(dash.navigate_back());
    assert!(!dash.navigate_back());
}

#[tokio::test]
/// What: Self-needinfos are filtered out of the stale-needinfo view.
///
/// Inputs:
/// - Bug 1 with needinfo from a to a; bug 2 with needinfo from a to b.
///
/// Output:
/// - The stale-needinfo view shows bug 2 only.
async fn stale_needinfo_drops_self_requests() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", None);
    dash.refresh(SearchName::StaleNeedinfo);
    let mut searches = source.take_searches();
    assert_eq!(searches.len(), 1);
    let flagged = |id, requestee: &str| Bug {
        flags: vec![BugFlag {
            name: "needinfo".into(),
            requestee: Some(requestee.into()),
            setter: "a".into(),
        }],
        ..bug(id, "--")
    };
    let (_, reply) = searches.remove(0);
    let _ = reply.send(Ok(vec![flagged(1, "a"), flagged(2, "b")]));
    let event = next(&mut rx).await;
    assert!(dash.handle_completion(event));
    let view = dash.view(SearchName::StaleNeedinfo).expect("view");
    assert_eq!(view.count, Some(1));
    assert_eq!(view.rows[0].id, 2);
}

#[tokio::test]
/// What: A failed search keeps the rows of the last successful load.
async fn failed_search_keeps_previous_rows() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", None);
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "P3")]));
    assert!(dash.handle_completion(next(&mut rx).await));

    dash.refresh(SearchName::Triage);
    assert_eq!(
        dash.view(SearchName::Triage).map(|v| v.status.clone()),
        Some(SearchStatus::Loading)
    );
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Err("HTTP 503: Service Unavailable".into()));
    assert!(dash.handle_completion(next(&mut rx).await));

    let view = dash.view(SearchName::Triage).expect("view");
    assert_eq!(
        view.status,
        SearchStatus::Failed("HTTP 503: Service Unavailable".into())
    );
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, 5);
    assert_eq!(view.count, Some(1));
    assert_eq!(dash.in_flight(), 0);
    assert!(dash.refresh(SearchName::Triage));
    assert_eq!(dash.in_flight(), 1);
}

#[tokio::test]
/// What: Priority edits without an API key are rejected before any request.
async fn priority_edit_requires_api_key() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", None);
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "--")]));
    assert!(dash.handle_completion(next(&mut rx).await));

    assert_eq!(dash.set_priority(5, "P1"), Err(EditError::MissingApiKey));
    assert!(source.take_updates().is_empty());
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("--"));

    dash.set_api_key(Some(Zeroizing::new("   ".into())));
    assert!(!dash.has_api_key());
    assert_eq!(dash.set_priority(5, "P1"), Err(EditError::MissingApiKey));
}

#[tokio::test]
/// What: A rejected priority edit restores the previous value with a notice.
///
/// Inputs:
/// - Bug 5 at `--`, edited to `P1`; the server answers 401.
///
/// Output:
/// - The row shows `P1` while the request is pending, then `--` again with a
///   notice naming the failure.
async fn priority_failure_reverts_row() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", Some("secret"));
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "--")]));
    assert!(dash.handle_completion(next(&mut rx).await));

    assert_eq!(dash.set_priority(99, "P1"), Err(EditError::UnknownBug(99)));
    dash.set_priority(5, "P1").expect("dispatched");
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("P1"));

    let mut updates = source.take_updates();
    assert_eq!(updates.len(), 1);
    let (id, priority, reply) = updates.remove(0);
    assert_eq!((id, priority.as_str()), (5, "P1"));
    let _ = reply.send(Err("HTTP 401: You must log in".into()));
    assert!(dash.handle_completion(next(&mut rx).await));

    let row = dash.find_row(5).expect("row");
    assert_eq!(row.priority, "--");
    assert_eq!(
        row.notice.as_deref(),
        Some("Priority update failed: HTTP 401: You must log in")
    );
}

#[tokio::test]
/// What: A refresh landing while an edit is pending keeps showing the requested value.
///
/// Inputs:
/// - Bug 5 edited to `P2`; triage refreshed and answered with the old server value.
///
/// Output:
/// - The row still shows `P2`; after the edit succeeds it stays `P2`.
async fn pending_edit_survives_refresh() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", Some("secret"));
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "--")]));
    assert!(dash.handle_completion(next(&mut rx).await));

    dash.set_priority(5, "P2").expect("dispatched");
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "--")]));
    assert!(dash.handle_completion(next(&mut rx).await));
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("P2"));

    let (_, _, reply) = source.take_updates().remove(0);
    let _ = reply.send(Ok(()));
    assert!(dash.handle_completion(next(&mut rx).await));
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("P2"));
    assert_eq!(dash.in_flight(), 0);
}

#[tokio::test]
/// What: A failed edit restores the server value seen by the latest refresh.
///
/// Inputs:
/// - Bug 5 loaded at `--` and edited to `P1`; a refresh returns it at `P3`;
///   the update is then rejected.
///
/// Output:
/// - The row shows `P1` while pending and `P3` after the failure.
async fn priority_failure_restores_refreshed_value() {
    let (mut dash, mut rx, source) = engine("component=A%3A1", Some("secret"));
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "--")]));
    assert!(dash.handle_completion(next(&mut rx).await));

    dash.set_priority(5, "P1").expect("dispatched");
    dash.refresh(SearchName::Triage);
    let (_, reply) = source.take_searches().remove(0);
    let _ = reply.send(Ok(vec![bug(5, "P3")]));
    assert!(dash.handle_completion(next(&mut rx).await));
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("P1"));

    let (_, _, reply) = source.take_updates().remove(0);
    let _ = reply.send(Err("HTTP 401: You must log in".into()));
    assert!(dash.handle_completion(next(&mut rx).await));
    assert_eq!(dash.find_row(5).map(|r| r.priority.as_str()), Some("P3"));
}
