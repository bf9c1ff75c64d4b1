//! Bugzilla data retrieval: the catalog file and the REST API.

use futures::future::BoxFuture;
use zeroize::Zeroizing;

use crate::logic::query::Query;
use crate::state::Bug;

mod bugzilla;
mod catalog;

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bugzilla::BugzillaClient;
pub use catalog::{load_catalog, parse_catalog};

/// What: Remote operations the dashboard engine needs from a bug tracker.
///
/// Details:
/// - Futures are `'static` so they can be spawned as independent tasks and
///   aborted when superseded.
/// - Implemented by [`BugzillaClient`]; tests substitute in-process fakes.
pub trait BugSource: Send + Sync {
    /// Run a search and return the matching bugs in server order.
    fn search(&self, query: Query) -> BoxFuture<'static, Result<Vec<Bug>>>;

    /// Set the priority of bug `id`, authenticated with `api_key`.
    fn update_priority(
        &self,
        id: u64,
        priority: String,
        api_key: Zeroizing<String>,
    ) -> BoxFuture<'static, Result<()>>;
}
