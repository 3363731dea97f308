//! Memoizing cache for server-derived collections.
//!
//! One [`QueryCache`] holds every read of one record type. Entries are
//! replaced wholesale when a request settles, so there is never a partial
//! write to an entry's data. The cache is single-threaded: interior
//! mutability via `RefCell`, and no borrow is ever held across an await.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::join_all;
use log::debug;

use super::key::QueryKey;
use crate::error::DriveError;
use crate::store::StoreFuture;

/// Re-runnable read bound to one key's parameters.
pub type Loader<T> = Rc<dyn Fn() -> StoreFuture<'static, Result<Vec<T>, DriveError>>>;

/// Callback receiving every change of a subscribed entry.
pub type Listener<T> = Rc<dyn Fn(&CacheEntry<T>)>;

/// Snapshot of one cached read.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<T> {
    /// Last successfully loaded data (server order)
    pub data: Vec<T>,
    /// A request for this key is in flight
    pub is_loading: bool,
    /// Data predates an invalidation; the next fetch reloads it
    pub is_stale: bool,
    /// Error of the most recent failed request, cleared on success
    pub error: Option<DriveError>,
    /// Data has been loaded at least once
    pub is_fetched: bool,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            is_loading: false,
            is_stale: false,
            error: None,
            is_fetched: false,
        }
    }
}

impl<T> CacheEntry<T> {
    fn needs_fetch(&self) -> bool {
        !self.is_fetched || self.is_stale
    }
}

struct Slot<T> {
    entry: CacheEntry<T>,
    loader: Option<Loader<T>>,
    /// Sequence number of the most recently issued request
    issued: u64,
    /// Requests numbered up to here were issued before the last invalidation
    invalidated_through: u64,
    subscribers: Vec<(u64, Listener<T>)>,
    /// Seen unreferenced by the previous sweep
    swept: bool,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            entry: CacheEntry::default(),
            loader: None,
            issued: 0,
            invalidated_through: 0,
            subscribers: Vec::new(),
            swept: false,
        }
    }

    fn listeners(&self) -> Vec<Listener<T>> {
        self.subscribers.iter().map(|(_, l)| l.clone()).collect()
    }
}

fn notify<T>(listeners: &[Listener<T>], entry: &CacheEntry<T>) {
    for listener in listeners {
        listener(entry);
    }
}

/// Cache of reads keyed by [`QueryKey`].
pub struct QueryCache<T> {
    slots: RefCell<HashMap<QueryKey, Slot<T>>>,
    next_subscriber: Cell<u64>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            next_subscriber: Cell::new(0),
        }
    }
}

impl<T: Clone + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of `key`, if the cache knows it.
    pub fn get(&self, key: &QueryKey) -> Option<CacheEntry<T>> {
        self.slots.borrow().get(key).map(|slot| slot.entry.clone())
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Return cached data for `key`, loading it first when absent or stale.
    ///
    /// A request already in flight that was issued after the last
    /// invalidation is shared instead of duplicated; the returned snapshot
    /// then still has `is_loading` set. On failure the cached data is kept,
    /// the error is recorded on the entry and pushed to every subscriber,
    /// and the error is returned.
    pub async fn fetch(
        &self,
        key: &QueryKey,
        loader: Loader<T>,
    ) -> Result<CacheEntry<T>, DriveError> {
        let (ticket, listeners, snapshot) = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            slot.loader = Some(loader.clone());
            slot.swept = false;

            if !slot.entry.needs_fetch() {
                return Ok(slot.entry.clone());
            }
            if slot.entry.is_loading && slot.issued > slot.invalidated_through {
                debug!("cache: joining in-flight request for {}", key);
                return Ok(slot.entry.clone());
            }

            slot.issued += 1;
            slot.entry.is_loading = true;
            (slot.issued, slot.listeners(), slot.entry.clone())
        };

        notify(&listeners, &snapshot);
        debug!("cache: fetching {} (request #{})", key, ticket);

        let mut pending = PendingRequest {
            cache: self,
            key,
            ticket,
            settled: false,
        };
        let result = loader().await;
        pending.settled = true;
        self.settle(key, ticket, result)
    }

    /// Clear the loading flag of a request dropped before it settled.
    ///
    /// Only the latest request owns the flag; an abandoned older one leaves
    /// the entry alone.
    fn abandon(&self, key: &QueryKey, ticket: u64) {
        let (listeners, snapshot) = {
            let Ok(mut slots) = self.slots.try_borrow_mut() else {
                return;
            };
            let Some(slot) = slots.get_mut(key) else {
                return;
            };
            if slot.issued != ticket || !slot.entry.is_loading {
                return;
            }
            debug!("cache: request #{} for {} dropped before settling", ticket, key);
            slot.entry.is_loading = false;
            (slot.listeners(), slot.entry.clone())
        };
        notify(&listeners, &snapshot);
    }

    /// Apply a finished request to its entry.
    fn settle(
        &self,
        key: &QueryKey,
        ticket: u64,
        result: Result<Vec<T>, DriveError>,
    ) -> Result<CacheEntry<T>, DriveError> {
        let (listeners, snapshot, outcome) = {
            let mut slots = self.slots.borrow_mut();
            let Some(slot) = slots.get_mut(key) else {
                // Evicted while in flight: nothing to update.
                return result.map(|data| CacheEntry {
                    data,
                    is_fetched: true,
                    ..CacheEntry::default()
                });
            };

            if ticket != slot.issued {
                debug!(
                    "cache: discarding response #{} for {} (latest is #{})",
                    ticket, key, slot.issued
                );
                let current = slot.entry.clone();
                return result.map(|_| current);
            }

            slot.entry.is_loading = false;
            let outcome = match result {
                Ok(data) => {
                    slot.entry.data = data;
                    slot.entry.is_fetched = true;
                    slot.entry.error = None;
                    slot.entry.is_stale = ticket <= slot.invalidated_through;
                    Ok(())
                }
                Err(err) => {
                    slot.entry.error = Some(err.clone());
                    Err(err)
                }
            };
            (slot.listeners(), slot.entry.clone(), outcome)
        };

        notify(&listeners, &snapshot);
        outcome.map(|()| snapshot)
    }

    /// Mark every entry whose endpoint starts with `prefix` as stale.
    ///
    /// Requests already in flight for those keys are treated as predating
    /// the invalidation. Returns the affected keys that have subscribers;
    /// the rest reload lazily on their next fetch.
    pub fn invalidate(&self, prefix: &str) -> Vec<QueryKey> {
        let mut active = Vec::new();
        let mut pending = Vec::new();
        {
            let mut slots = self.slots.borrow_mut();
            for (key, slot) in slots.iter_mut() {
                if !key.matches_prefix(prefix) {
                    continue;
                }
                slot.entry.is_stale = true;
                slot.invalidated_through = slot.issued;
                if !slot.subscribers.is_empty() {
                    active.push(key.clone());
                    pending.push((slot.listeners(), slot.entry.clone()));
                }
            }
        }
        debug!(
            "cache: invalidated {} ({} active entries)",
            prefix,
            active.len()
        );

        for (listeners, entry) in &pending {
            notify(listeners, entry);
        }
        active
    }

    /// Reload `keys` with the loaders remembered from their last fetch.
    ///
    /// Keys never fetched (no loader) or evicted are skipped.
    pub async fn refetch(&self, keys: &[QueryKey]) -> Vec<Result<CacheEntry<T>, DriveError>> {
        let jobs: Vec<_> = keys
            .iter()
            .filter_map(|key| {
                let loader = self.slots.borrow().get(key)?.loader.clone()?;
                Some(self.fetch(key, loader))
            })
            .collect();
        join_all(jobs).await
    }

    /// Register `listener` for changes of `key`.
    ///
    /// The listener is called right away with the current entry when data
    /// has already been loaded. Dropping the returned [`Subscription`]
    /// unregisters it.
    pub fn subscribe(self: &Rc<Self>, key: &QueryKey, listener: Listener<T>) -> Subscription<T> {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);

        let current = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            slot.subscribers.push((id, listener.clone()));
            slot.swept = false;
            slot.entry.is_fetched.then(|| slot.entry.clone())
        };

        if let Some(entry) = current {
            listener(&entry);
        }

        Subscription {
            cache: Rc::downgrade(self),
            key: key.clone(),
            id,
        }
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.slots
            .borrow()
            .get(key)
            .map_or(0, |slot| slot.subscribers.len())
    }

    fn unsubscribe(&self, key: &QueryKey, id: u64) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(key) {
            slot.subscribers.retain(|(sid, _)| *sid != id);
        }
    }

    /// Evict entries nobody references, after a grace period of one sweep.
    ///
    /// An entry without subscribers and without a request in flight is
    /// marked on the first sweep and evicted on the next one if it is still
    /// unreferenced. Subscribing or fetching clears the mark. Returns the
    /// number of evicted entries.
    pub fn sweep(&self) -> usize {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|key, slot| {
            if !slot.subscribers.is_empty() || slot.entry.is_loading {
                slot.swept = false;
                return true;
            }
            if slot.swept {
                debug!("cache: evicting {}", key);
                return false;
            }
            slot.swept = true;
            true
        });
        before - slots.len()
    }
}

/// Ticket of an issued request, held across the loader's await.
struct PendingRequest<'a, T: Clone + 'static> {
    cache: &'a QueryCache<T>,
    key: &'a QueryKey,
    ticket: u64,
    settled: bool,
}

impl<T: Clone + 'static> Drop for PendingRequest<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.cache.abandon(self.key, self.ticket);
        }
    }
}

/// RAII handle for a cache subscription.
pub struct Subscription<T: Clone + 'static> {
    cache: Weak<QueryCache<T>>,
    key: QueryKey,
    id: u64,
}

impl<T: Clone + 'static> Subscription<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl<T: Clone + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(cache) = self.cache.upgrade() {
            cache.unsubscribe(&self.key, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use futures::channel::oneshot;
    use futures::poll;

    use super::*;

    type Reply = Result<Vec<u32>, DriveError>;

    fn key(endpoint: &str) -> QueryKey {
        QueryKey::endpoint_only(endpoint)
    }

    /// Loader answering immediately with `data`, counting calls.
    fn ready_loader(data: Vec<u32>, calls: Rc<Cell<usize>>) -> Loader<u32> {
        Rc::new(move || -> StoreFuture<'static, Reply> {
            calls.set(calls.get() + 1);
            let data = data.clone();
            Box::pin(async move { Ok(data) })
        })
    }

    /// Loader whose replies are released by the test, one channel per call.
    fn gated_loader() -> (Loader<u32>, Rc<RefCell<VecDeque<oneshot::Sender<Reply>>>>) {
        let senders = Rc::new(RefCell::new(VecDeque::new()));
        let queue = senders.clone();
        let loader: Loader<u32> = Rc::new(move || -> StoreFuture<'static, Reply> {
            let (tx, rx) = oneshot::channel();
            queue.borrow_mut().push_back(tx);
            Box::pin(async move {
                rx.await
                    .unwrap_or_else(|_| Err(DriveError::Network("cancelled".into())))
            })
        });
        (loader, senders)
    }

    fn recorder() -> (Listener<u32>, Rc<RefCell<Vec<CacheEntry<u32>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener: Listener<u32> = Rc::new(move |entry: &CacheEntry<u32>| {
            sink.borrow_mut().push(entry.clone());
        });
        (listener, seen)
    }

    #[tokio::test]
    async fn test_fetch_loads_then_memoizes() {
        let cache = QueryCache::new();
        let calls = Rc::new(Cell::new(0));
        let k = key("/api/files");

        let entry = cache.fetch(&k, ready_loader(vec![1, 2], calls.clone())).await.unwrap();
        assert_eq!(entry.data, vec![1, 2]);
        assert!(!entry.is_loading);
        assert!(!entry.is_stale);
        assert!(entry.is_fetched);

        cache.fetch(&k, ready_loader(vec![9], calls.clone())).await.unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.get(&k).unwrap().data, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_of_every_prefixed_key() {
        let cache = QueryCache::new();
        let calls = Rc::new(Cell::new(0));
        let keys = [
            QueryKey::files(None),
            QueryKey::files(Some(5)),
            QueryKey::search("a"),
        ];
        for k in &keys {
            cache.fetch(k, ready_loader(vec![1], calls.clone())).await.unwrap();
        }
        assert_eq!(calls.get(), 3);

        cache.invalidate("/api/files");
        for k in &keys {
            assert!(cache.get(k).unwrap().is_stale);
            let entry = cache.fetch(k, ready_loader(vec![2], calls.clone())).await.unwrap();
            assert_eq!(entry.data, vec![2]);
            assert!(!entry.is_stale);
        }
        assert_eq!(calls.get(), 6);
    }

    #[tokio::test]
    async fn test_invalidate_leaves_other_prefixes_alone() {
        let cache = QueryCache::new();
        let calls = Rc::new(Cell::new(0));
        let folders = QueryKey::folders(None);
        cache.fetch(&folders, ready_loader(vec![1], calls.clone())).await.unwrap();

        cache.invalidate("/api/files");
        assert!(!cache.get(&folders).unwrap().is_stale);
        cache.fetch(&folders, ready_loader(vec![1], calls.clone())).await.unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_error_keeps_last_good_value() {
        let cache = Rc::new(QueryCache::new());
        let k = key("/api/files");
        let calls = Rc::new(Cell::new(0));
        cache.fetch(&k, ready_loader(vec![7], calls)).await.unwrap();

        let (listener, seen) = recorder();
        let _sub = cache.subscribe(&k, listener);
        cache.invalidate("/api/files");

        let failing: Loader<u32> = Rc::new(|| -> StoreFuture<'static, Reply> {
            Box::pin(async { Err(DriveError::Network("offline".into())) })
        });
        let err = cache.fetch(&k, failing).await.unwrap_err();
        assert_eq!(err, DriveError::Network("offline".into()));

        let entry = cache.get(&k).unwrap();
        assert_eq!(entry.data, vec![7]);
        assert!(!entry.is_loading);
        assert_eq!(entry.error, Some(err.clone()));

        let last = seen.borrow().last().cloned().unwrap();
        assert_eq!(last.error, Some(err));
        assert_eq!(last.data, vec![7]);
    }

    #[tokio::test]
    async fn test_in_flight_request_is_shared() {
        let cache = QueryCache::new();
        let k = key("/api/folders");
        let (loader, senders) = gated_loader();

        let mut first = Box::pin(cache.fetch(&k, loader.clone()));
        assert!(poll!(&mut first).is_pending());
        assert!(cache.get(&k).unwrap().is_loading);

        let joined = cache.fetch(&k, loader.clone()).await.unwrap();
        assert!(joined.is_loading);
        assert_eq!(senders.borrow().len(), 1);

        let tx = senders.borrow_mut().pop_front().unwrap();
        tx.send(Ok(vec![3])).unwrap();
        let entry = first.await.unwrap();
        assert_eq!(entry.data, vec![3]);
        assert!(!entry.is_loading);
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let cache = QueryCache::new();
        let k = key("/api/files");
        let (loader, senders) = gated_loader();

        let mut older = Box::pin(cache.fetch(&k, loader.clone()));
        assert!(poll!(&mut older).is_pending());

        cache.invalidate("/api/files");
        let mut newer = Box::pin(cache.fetch(&k, loader.clone()));
        assert!(poll!(&mut newer).is_pending());
        assert_eq!(senders.borrow().len(), 2);

        let tx_old = senders.borrow_mut().pop_front().unwrap();
        let tx_new = senders.borrow_mut().pop_front().unwrap();

        tx_new.send(Ok(vec![2])).unwrap();
        assert_eq!(newer.await.unwrap().data, vec![2]);

        tx_old.send(Ok(vec![1])).unwrap();
        let returned = older.await.unwrap();
        assert_eq!(returned.data, vec![2]);

        let entry = cache.get(&k).unwrap();
        assert_eq!(entry.data, vec![2]);
        assert!(!entry.is_stale);
        assert!(!entry.is_loading);
    }

    #[tokio::test]
    async fn test_response_issued_before_invalidation_stays_stale() {
        let cache = QueryCache::new();
        let k = key("/api/files");
        let (loader, senders) = gated_loader();

        let mut pending = Box::pin(cache.fetch(&k, loader.clone()));
        assert!(poll!(&mut pending).is_pending());
        cache.invalidate("/api/files");

        let tx = senders.borrow_mut().pop_front().unwrap();
        tx.send(Ok(vec![1])).unwrap();
        let entry = pending.await.unwrap();
        assert_eq!(entry.data, vec![1]);
        assert!(entry.is_stale);

        // The next read goes back to the server
        let calls = Rc::new(Cell::new(0));
        let fresh = cache.fetch(&k, ready_loader(vec![1, 2], calls.clone())).await.unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(fresh.data, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_subscription_lifecycle() {
        let cache = Rc::new(QueryCache::new());
        let k = key("/api/files");
        let calls = Rc::new(Cell::new(0));

        let (listener, seen) = recorder();
        let sub = cache.subscribe(&k, listener);
        assert_eq!(cache.subscriber_count(&k), 1);
        // Nothing loaded yet, so no immediate call
        assert!(seen.borrow().is_empty());

        cache.fetch(&k, ready_loader(vec![4], calls.clone())).await.unwrap();
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 2);
            assert!(seen[0].is_loading);
            assert_eq!(seen[1].data, vec![4]);
        }

        // A late subscriber gets the current value immediately
        let (late, late_seen) = recorder();
        let _late_sub = cache.subscribe(&k, late);
        assert_eq!(late_seen.borrow()[0].data, vec![4]);

        drop(sub);
        assert_eq!(cache.subscriber_count(&k), 1);
    }

    #[tokio::test]
    async fn test_invalidate_reports_and_refetches_active_keys() {
        let cache = Rc::new(QueryCache::new());
        let calls = Rc::new(Cell::new(0));
        let watched = QueryKey::files(Some(1));
        let idle = QueryKey::files(Some(2));

        cache.fetch(&watched, ready_loader(vec![1], calls.clone())).await.unwrap();
        cache.fetch(&idle, ready_loader(vec![2], calls.clone())).await.unwrap();
        let (listener, seen) = recorder();
        let _sub = cache.subscribe(&watched, listener);

        let active = cache.invalidate("/api/files");
        assert_eq!(active, vec![watched.clone()]);
        assert!(seen.borrow().last().unwrap().is_stale);

        let results = cache.refetch(&active).await;
        assert_eq!(results.len(), 1);
        assert_eq!(calls.get(), 3);
        assert!(!cache.get(&watched).unwrap().is_stale);
        // Idle key is refetched lazily
        assert!(cache.get(&idle).unwrap().is_stale);
    }

    #[tokio::test]
    async fn test_sweep_grace_period() {
        let cache = Rc::new(QueryCache::new());
        let calls = Rc::new(Cell::new(0));
        let kept = key("/api/folders");
        let dropped = key("/api/files");

        cache.fetch(&kept, ready_loader(vec![1], calls.clone())).await.unwrap();
        cache.fetch(&dropped, ready_loader(vec![2], calls.clone())).await.unwrap();
        let (listener, _) = recorder();
        let _sub = cache.subscribe(&kept, listener);

        assert_eq!(cache.sweep(), 0);
        assert!(cache.get(&dropped).is_some());

        assert_eq!(cache.sweep(), 1);
        assert!(cache.get(&dropped).is_none());
        assert!(cache.get(&kept).is_some());
        assert_eq!(cache.sweep(), 0);
    }

    #[tokio::test]
    async fn test_fetch_between_sweeps_resets_grace() {
        let cache = QueryCache::new();
        let calls = Rc::new(Cell::new(0));
        let k = key("/api/files");
        cache.fetch(&k, ready_loader(vec![1], calls.clone())).await.unwrap();

        cache.sweep();
        cache.fetch(&k, ready_loader(vec![1], calls.clone())).await.unwrap();
        assert_eq!(cache.sweep(), 0);
        assert_eq!(cache.sweep(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_fetch_releases_key() {
        let cache = Rc::new(QueryCache::new());
        let k = key("/api/files");
        let (listener, seen) = recorder();
        let _sub = cache.subscribe(&k, listener);

        let (gated, senders) = gated_loader();
        let mut abandoned = Box::pin(cache.fetch(&k, gated));
        assert!(poll!(&mut abandoned).is_pending());
        drop(abandoned);

        let entry = cache.get(&k).unwrap();
        assert!(!entry.is_loading);
        assert!(!entry.is_fetched);
        assert!(!seen.borrow().last().unwrap().is_loading);
        assert_eq!(senders.borrow().len(), 1);

        let calls = Rc::new(Cell::new(0));
        let entry = cache.fetch(&k, ready_loader(vec![4], calls.clone())).await.unwrap();
        assert_eq!(entry.data, vec![4]);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_dropped_fetch_can_be_swept() {
        let cache = QueryCache::new();
        let k = key("/api/folders");
        let (gated, _senders) = gated_loader();

        let mut abandoned = Box::pin(cache.fetch(&k, gated));
        assert!(poll!(&mut abandoned).is_pending());
        drop(abandoned);

        assert_eq!(cache.sweep(), 0);
        assert_eq!(cache.sweep(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_dropping_superseded_fetch_keeps_newer_loading() {
        let cache = QueryCache::new();
        let k = key("/api/files");
        let (gated, senders) = gated_loader();

        let mut older = Box::pin(cache.fetch(&k, gated.clone()));
        assert!(poll!(&mut older).is_pending());
        cache.invalidate("/api/files");
        let mut newer = Box::pin(cache.fetch(&k, gated));
        assert!(poll!(&mut newer).is_pending());
        assert_eq!(senders.borrow().len(), 2);

        drop(older);
        assert!(cache.get(&k).unwrap().is_loading);

        let tx = senders.borrow_mut().pop_back().unwrap();
        tx.send(Ok(vec![8])).unwrap();
        let entry = newer.await.unwrap();
        assert_eq!(entry.data, vec![8]);
        assert!(!entry.is_loading);
    }
}
