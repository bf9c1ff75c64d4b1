//! Request tracker: at most one live request per key, stale results discarded.
//!
//! Every dispatch gets a fresh id. Completions flow back over an unbounded
//! channel and are only accepted by [`RequestTracker::settle`] when their id is
//! still the pending one for their key.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Result of one dispatched request, tagged with the key and id it was issued under.
#[derive(Debug)]
pub struct Completion<K, T> {
    /// Logical request key.
    pub key: K,
    /// Dispatch id; compared against the pending handle on settle.
    pub id: u64,
    /// Payload or error message.
    pub result: Result<T, String>,
}

/// Handle for an in-flight request.
#[derive(Debug)]
struct RequestHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl RequestHandle {
    /// Mark cancelled and abort the task. Returns `true` only on the first call.
    fn cancel(&self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::SeqCst);
        self.abort.abort();
        first
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Keyed registry of in-flight requests.
#[derive(Debug)]
pub struct RequestTracker<K, T> {
    next_id: u64,
    pending: HashMap<K, RequestHandle>,
    completion_tx: mpsc::UnboundedSender<Completion<K, T>>,
}

impl<K, T> RequestTracker<K, T>
where
    K: Clone + Debug + Eq + Hash + Send + 'static,
    T: Send + 'static,
{
    /// What: Create a tracker and the receiver its completions arrive on.
    ///
    /// Output:
    /// - `(tracker, completion_rx)`; the caller drains `completion_rx` and feeds
    ///   each message back through [`Self::settle`].
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Completion<K, T>>) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        (
            Self {
                next_id: 0,
                pending: HashMap::new(),
                completion_tx,
            },
            completion_rx,
        )
    }

    /// What: Start `fut` under `key`, cancelling any request already pending for it.
    ///
    /// Inputs:
    /// - `key`: Logical request key.
    /// - `fut`: Request future; must be spawnable on the current tokio runtime.
    ///
    /// Output:
    /// - Id assigned to this dispatch.
    ///
    /// Details:
    /// - The spawned task checks its cancel flag after `fut` resolves and sends nothing
    ///   if it was cancelled; the task is also aborted so the I/O is dropped early.
    pub fn dispatch<F>(&mut self, key: K, fut: F) -> u64
    where
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        if let Some(prev) = self.pending.remove(&key) {
            prev.cancel();
            tracing::debug!(
                key = ?key,
                superseded = prev.id,
                "[Tracker] superseded pending request"
            );
        }
        self.next_id += 1;
        let id = self.next_id;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.completion_tx.clone();
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = fut.await;
            if flag.load(Ordering::SeqCst) {
                return;
            }
            let _ = tx.send(Completion {
                key: task_key,
                id,
                result,
            });
        });
        self.pending.insert(
            key,
            RequestHandle {
                id,
                cancelled,
                abort: task.abort_handle(),
            },
        );
        id
    }

    /// What: Accept a completion if it is still current.
    ///
    /// Inputs:
    /// - `completion`: Message received from the completion channel.
    ///
    /// Output:
    /// - `Some(result)` when the id matches the pending handle for its key and that
    ///   handle was not cancelled; `None` for superseded or cancelled results.
    pub fn settle(&mut self, completion: Completion<K, T>) -> Option<Result<T, String>> {
        let current = self
            .pending
            .get(&completion.key)
            .is_some_and(|h| h.id == completion.id && !h.is_cancelled());
        if !current {
            tracing::debug!(
                key = ?completion.key,
                id = completion.id,
                "[Tracker] discarding stale completion"
            );
            return None;
        }
        self.pending.remove(&completion.key);
        Some(completion.result)
    }

    /// Cancel the pending request for `key`. Returns `false` when nothing was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some_and(|h| h.cancel())
    }

    /// Cancel every pending request whose key matches `pred`. Returns how many were cancelled.
    pub fn cancel_matching(&mut self, pred: impl Fn(&K) -> bool) -> usize {
        let keys: Vec<K> = self.pending.keys().filter(|k| pred(k)).cloned().collect();
        keys.iter().filter(|k| self.cancel(k)).count()
    }

    /// Cancel everything in flight.
    pub fn cancel_all(&mut self) -> usize {
        self.cancel_matching(|_| true)
    }

    /// Whether a request is in flight for `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of requests in flight.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
