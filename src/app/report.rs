//! Headless report: run the searches once and render them as plain text.

use std::fmt::Write as _;

use tokio::sync::mpsc;

use crate::logic::{Dashboard, TrackerEvent};
use crate::state::{SearchName, SearchStatus};

use super::runtime::Result;

/// What: Run the searches for the startup selection and wait for all of them.
///
/// Inputs:
/// - `dash`: Engine built for the session.
/// - `tracker_rx`: Its completion receiver.
/// - `only`: Optional search key limiting the run to one search.
///
/// Output:
/// - The rendered report.
///
/// # Errors
/// - Returns `Err` when `only` names an unknown search.
pub async fn run_report(
    dash: &mut Dashboard,
    tracker_rx: &mut mpsc::UnboundedReceiver<TrackerEvent>,
    only: Option<&str>,
) -> Result<String> {
    let names: Vec<SearchName> = match only {
        Some(key) => vec![
            SearchName::from_key(key).ok_or_else(|| format!("unknown search '{key}'"))?,
        ],
        None => SearchName::ALL.to_vec(),
    };
    if let [name] = names.as_slice() {
        dash.refresh(*name);
    } else {
        dash.refresh_all();
    }
    while dash.in_flight() > 0 {
        let Some(done) = tracker_rx.recv().await else {
            break;
        };
        dash.handle_completion(done);
    }
    Ok(render_report(dash, &names))
}

/// What: Render the given searches as text.
///
/// Inputs:
/// - `dash`: Engine with settled views.
/// - `names`: Searches to include, in order.
///
/// Output:
/// - Address line, then per search a header with its count marker or state,
///   followed by one block per row.
#[must_use]
pub fn render_report(dash: &Dashboard, names: &[SearchName]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "address: {}", dash.address());
    for name in names {
        let Some(view) = dash.view(*name) else {
            continue;
        };
        let state = match &view.status {
            SearchStatus::NothingSelected => "nothing selected".to_string(),
            SearchStatus::Failed(e) => format!("failed: {e}"),
            SearchStatus::Loading | SearchStatus::NotLoaded => "not loaded".to_string(),
            SearchStatus::Loaded => view.marker(),
        };
        let _ = writeln!(out, "\n== {} [{}] {state}", name.title(), name.key());
        if let Some(link) = &view.link {
            let _ = writeln!(out, "   {link}");
        }
        for row in &view.rows {
            let _ = writeln!(
                out,
                "{:>9}  {:<3} {:<3} {:<12} {}",
                row.id, row.priority, row.severity, row.bug_type, row.description
            );
            let _ = writeln!(
                out,
                "           {} | {} | {}",
                row.component, row.users, row.created
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use zeroize::Zeroizing;

    use crate::config::{LabelTables, ReleaseTrain};
    use crate::logic::query::Query;
    use crate::logic::{RowFormat, standard_templates};
    use crate::sources::{self, BugSource};
    use crate::state::{Address, Bug, Catalog, ComponentRef};

    struct OneBug;

    impl BugSource for OneBug {
        fn search(&self, _query: Query) -> BoxFuture<'static, sources::Result<Vec<Bug>>> {
            async {
                Ok(vec![Bug {
                    id: 42,
                    bug_type: "defect".into(),
                    severity: "S2".into(),
                    priority: "P1".into(),
                    summary: "Crash on load".into(),
                    product: "Core".into(),
                    component: "DOM".into(),
                    ..Bug::default()
                }])
            }
            .boxed()
        }

        fn update_priority(
            &self,
            _id: u64,
            _priority: String,
            _api_key: Zeroizing<String>,
        ) -> BoxFuture<'static, sources::Result<()>> {
            async { Ok(()) }.boxed()
        }
    }

    fn dashboard(address: &str) -> (Dashboard, mpsc::UnboundedReceiver<TrackerEvent>) {
        Dashboard::new(
            Catalog::new(vec![ComponentRef {
                product_id: 1,
                product_name: "Core".into(),
                component_id: 2,
                component_name: "DOM".into(),
                description: String::new(),
                selected: false,
            }]),
            Address::parse(address),
            standard_templates(&ReleaseTrain::default()),
            Arc::new(OneBug),
            RowFormat {
                labels: LabelTables::default(),
                web_base: "https://bz.example/".into(),
            },
            None,
        )
    }

    #[tokio::test]
    /// What: A single-search report waits for the result and lists the row.
    ///
    /// Inputs:
    /// - Selection `Core:DOM`, `--search triage`, source returning bug 42.
    ///
    /// Output:
    /// - Header with `(1)`, the bug line and no other search sections.
    async fn report_single_search_lists_rows() {
        let (mut dash, mut rx) = dashboard("component=Core:DOM");
        let out = run_report(&mut dash, &mut rx, Some("triage"))
            .await
            .expect("report");
        assert!(out.starts_with("address: component=Core%3ADOM\n"));
        assert!(out.contains("[triage] (1)"));
        assert!(out.contains("       42  P1"));
        assert!(out.contains("Crash on load"));
        assert!(!out.contains("[stale-review]"));
    }

    #[tokio::test]
    /// What: Without a selection every section reports that nothing is selected.
    async fn report_without_selection() {
        let (mut dash, mut rx) = dashboard("");
        let out = run_report(&mut dash, &mut rx, None).await.expect("report");
        assert_eq!(out.matches("nothing selected").count(), 5);
    }

    #[tokio::test]
    /// What: Unknown search keys are rejected.
    async fn report_rejects_unknown_search() {
        let (mut dash, mut rx) = dashboard("component=Core:DOM");
        assert!(run_report(&mut dash, &mut rx, Some("bogus")).await.is_err());
    }
}
