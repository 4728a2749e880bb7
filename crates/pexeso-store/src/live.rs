//! Live views: query results that keep arriving as the store changes.
//!
//! A [`ScoreFeed`] is a registry of subscribers, each bound to a
//! [`ScoreQuery`]. A subscriber gets the current result when it registers and
//! a freshly queried result every time [`ScoreFeed::publish`] runs.
//!
//! The feed does not order itself against writes. The owner serialises
//! "mutate then publish" against "query then register" so that no write is
//! missed or delivered twice.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use pexeso_core::ScoreRecord;

use crate::error::{Result, StoreError};
use crate::traits::ScoreStore;

/// Identifies one live view within a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The query behind a live view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoreQuery {
    /// Every record, in listing order.
    All,
    /// Records of one player, in listing order.
    Player(String),
}

impl ScoreQuery {
    /// Run the query against a store.
    pub async fn run<S: ScoreStore + ?Sized>(&self, store: &S) -> Result<Vec<ScoreRecord>> {
        match self {
            ScoreQuery::All => store.all_scores().await,
            ScoreQuery::Player(name) => store.scores_for_player(name).await,
        }
    }
}

/// The receiving end of a live view.
///
/// Every change queues a full copy of the list, and the queue is unbounded.
/// A view that is held but rarely read should use [`Subscription::latest`],
/// which drains the backlog and keeps only the newest list.
///
/// Dropping it ends the subscription; the feed prunes it on the next publish.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    query: ScoreQuery,
    rx: mpsc::UnboundedReceiver<Vec<ScoreRecord>>,
}

impl Subscription {
    /// This view's id, for [`ScoreFeed::unsubscribe`].
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The query this view follows.
    pub fn query(&self) -> &ScoreQuery {
        &self.query
    }

    /// Wait for the next delivered list.
    ///
    /// Returns `None` once the view has been unsubscribed or the feed dropped.
    pub async fn recv(&mut self) -> Option<Vec<ScoreRecord>> {
        self.rx.recv().await
    }

    /// Take the next delivered list if one is already waiting.
    pub fn try_recv(&mut self) -> Option<Vec<ScoreRecord>> {
        self.rx.try_recv().ok()
    }

    /// Drain pending deliveries and keep only the newest.
    pub fn latest(&mut self) -> Option<Vec<ScoreRecord>> {
        let mut newest = None;
        while let Ok(list) = self.rx.try_recv() {
            newest = Some(list);
        }
        newest
    }
}

struct Subscriber {
    query: ScoreQuery,
    tx: mpsc::UnboundedSender<Vec<ScoreRecord>>,
}

/// Registry of live views over one store.
pub struct ScoreFeed {
    subscribers: Mutex<HashMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

impl ScoreFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SubscriptionId, Subscriber>>> {
        self.subscribers
            .lock()
            .map_err(|e| StoreError::Storage(format!("mutex poisoned: {}", e)))
    }

    /// Register a view whose first delivery is `initial`.
    pub fn register(&self, query: ScoreQuery, initial: Vec<ScoreRecord>) -> Result<Subscription> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        // The receiver is alive, so this cannot fail.
        let _ = tx.send(initial);

        self.lock()?.insert(
            id,
            Subscriber {
                query: query.clone(),
                tx,
            },
        );
        debug!(%id, ?query, "registered live view");

        Ok(Subscription { id, query, rx })
    }

    /// End a view. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let removed = self.lock()?.remove(&id).is_some();
        if removed {
            debug!(%id, "unsubscribed live view");
        }
        Ok(removed)
    }

    /// Number of registered views.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether no view is registered.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Re-run every view's query and deliver the results.
    ///
    /// Each distinct query runs once. A query that fails is logged and its
    /// views miss this delivery; the other views are still served. Views
    /// whose receiver is gone are dropped. Returns the number of deliveries
    /// made.
    pub async fn publish<S: ScoreStore + ?Sized>(&self, store: &S) -> Result<usize> {
        let targets: Vec<(SubscriptionId, ScoreQuery, mpsc::UnboundedSender<Vec<ScoreRecord>>)> =
            self.lock()?
                .iter()
                .map(|(id, sub)| (*id, sub.query.clone(), sub.tx.clone()))
                .collect();

        let mut results: HashMap<ScoreQuery, Vec<ScoreRecord>> = HashMap::new();
        let mut failed: HashSet<ScoreQuery> = HashSet::new();
        let mut closed = Vec::new();
        let mut delivered = 0;

        for (id, query, tx) in targets {
            if tx.is_closed() {
                closed.push(id);
                continue;
            }

            if failed.contains(&query) {
                continue;
            }
            if !results.contains_key(&query) {
                match query.run(store).await {
                    Ok(list) => {
                        results.insert(query.clone(), list);
                    }
                    Err(e) => {
                        warn!(error = %e, ?query, "live view query failed, skipping its views");
                        failed.insert(query.clone());
                        continue;
                    }
                }
            }

            let list = results.get(&query).cloned().unwrap_or_default();
            if tx.send(list).is_ok() {
                delivered += 1;
            } else {
                closed.push(id);
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.lock()?;
            for id in &closed {
                subscribers.remove(id);
            }
            trace!(pruned = closed.len(), "pruned closed live views");
        }

        Ok(delivered)
    }
}

impl Default for ScoreFeed {
    fn default() -> Self {
        Self::new()
    }
}
