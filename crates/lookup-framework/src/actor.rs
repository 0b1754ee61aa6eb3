//! # Generic Cache Actor
//!
//! This module defines the `CacheActor`, the component that owns a session-scoped lookup
//! cache. It implements the "Server" side of the Actor Model: messages are processed
//! sequentially, so the store needs no locks, while remote fetches run in their own tasks
//! and report back through an internal completion channel.

use crate::client::CacheClient;
use crate::entity::LookupEntity;
use crate::message::{CacheRequest, Resolved, Response, Source};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A finished fetch: the value, or the reason it is replaced by the placeholder.
type Completion<T> = (<T as LookupEntity>::Key, Result<T, FetchFailure>);

#[derive(Debug, thiserror::Error)]
enum FetchFailure {
    #[error("{0}")]
    Error(String),
    #[error("fetch task aborted: {0}")]
    Panicked(String),
}

/// The generic actor that owns an append-only lookup cache.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the resolved values (`store`),
/// the waiters of fetches that are still in flight (`pending`) and the receiver end of the
/// request channel.
///
/// **Concurrency Model**:
/// The actor handles one message at a time, but a `Resolve` for an unknown key does not
/// block the loop: the fetch is spawned and the actor keeps serving `Peek`s and `Resolve`s
/// for other keys. A second `Resolve` for a key that is already in flight is parked next to
/// the first one, so each key is fetched at most once per session.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `CacheActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass the remote client into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use lookup_framework::{CacheActor, LookupEntity, Source};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Label(String);
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("unreachable")]
/// struct LabelError;
///
/// #[async_trait]
/// impl LookupEntity for Label {
///     type Key = u32;
///     type Context = ();
///     type Error = LabelError;
///
///     async fn fetch(key: &u32, _: &()) -> Result<Self, Self::Error> {
///         Ok(Label(format!("label-{key}")))
///     }
///     fn placeholder(key: &u32) -> Self { Label(key.to_string()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = CacheActor::<Label>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let first = client.resolve(7).await.unwrap();
///     assert_eq!(first.source, Source::Remote);
///     let second = client.resolve(7).await.unwrap();
///     assert_eq!(second.source, Source::Cache);
/// }
/// ```
///
/// ## Operations
///
/// * **Peek**: Returns a clone of the cached value, or `None`. Never fetches.
/// * **Resolve**:
///     1. Cached ⇒ answered immediately with [`Source::Cache`].
///     2. In flight ⇒ the waiter is parked until the running fetch completes.
///     3. Otherwise ⇒ a fetch task is spawned and the waiter parked.
/// * **Insert**: Seeds a value unless the key is already resolved.
/// * **Completion** (internal): Stores the fetched value, or the entity's placeholder on
///   failure, and answers every parked waiter.
pub struct CacheActor<T: LookupEntity> {
    receiver: mpsc::Receiver<CacheRequest<T>>,
    store: HashMap<T::Key, T>,
    pending: HashMap<T::Key, Vec<Response<Resolved<T>>>>,
}

impl<T: LookupEntity> CacheActor<T> {
    /// Creates a new `CacheActor` and its associated `CacheClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, CacheClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            pending: HashMap::new(),
        };
        (actor, CacheClient::new(sender))
    }

    /// Runs the actor's event loop until every client is dropped and no fetch is in flight.
    ///
    /// # Context Injection
    /// The `context` is moved behind an `Arc` and shared with every spawned fetch.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Cache actor started");

        let context = Arc::new(context);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<T>>();
        let mut accepting = true;

        loop {
            if !accepting && self.pending.is_empty() {
                break;
            }

            tokio::select! {
                msg = self.receiver.recv(), if accepting => match msg {
                    Some(msg) => self.handle(msg, entity_type, &context, &done_tx),
                    None => {
                        let in_flight = self.pending.len();
                        debug!(entity_type, in_flight, "Request channel closed");
                        accepting = false;
                    }
                },
                Some((key, outcome)) = done_rx.recv(), if !self.pending.is_empty() => {
                    self.complete(key, outcome, entity_type);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn handle(
        &mut self,
        msg: CacheRequest<T>,
        entity_type: &str,
        context: &Arc<T::Context>,
        done_tx: &mpsc::UnboundedSender<Completion<T>>,
    ) {
        match msg {
            CacheRequest::Peek { key, respond_to } => {
                let value = self.store.get(&key).cloned();
                debug!(entity_type, %key, hit = value.is_some(), "Peek");
                let _ = respond_to.send(Ok(value));
            }
            CacheRequest::Resolve { key, respond_to } => {
                if let Some(value) = self.store.get(&key) {
                    debug!(entity_type, %key, "Resolve hit");
                    let _ = respond_to.send(Ok(Resolved::new(value.clone(), Source::Cache)));
                    return;
                }

                if let Some(waiters) = self.pending.get_mut(&key) {
                    debug!(entity_type, %key, waiters = waiters.len() + 1, "Resolve coalesced");
                    waiters.push(respond_to);
                    return;
                }

                debug!(entity_type, %key, "Resolve miss, fetching");
                self.pending.insert(key.clone(), vec![respond_to]);

                let ctx = Arc::clone(context);
                let done = done_tx.clone();
                tokio::spawn(async move {
                    // The inner task isolates a panicking fetch so the key still completes.
                    let fetch_key = key.clone();
                    let fetch = tokio::spawn(async move { T::fetch(&fetch_key, &ctx).await });
                    let outcome = match fetch.await {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(e)) => Err(FetchFailure::Error(e.to_string())),
                        Err(e) => Err(FetchFailure::Panicked(e.to_string())),
                    };
                    let _ = done.send((key, outcome));
                });
            }
            CacheRequest::Insert {
                key,
                value,
                respond_to,
            } => {
                let inserted = if self.store.contains_key(&key) {
                    false
                } else {
                    self.store.insert(key.clone(), value);
                    true
                };
                debug!(entity_type, %key, inserted, "Insert");
                let _ = respond_to.send(Ok(inserted));
            }
            CacheRequest::Len { respond_to } => {
                let _ = respond_to.send(Ok(self.store.len()));
            }
        }
    }

    fn complete(&mut self, key: T::Key, outcome: Result<T, FetchFailure>, entity_type: &str) {
        let fetched = match outcome {
            Ok(value) => Resolved::new(value, Source::Remote),
            Err(e) => {
                warn!(entity_type, %key, error = %e, "Fetch failed, caching placeholder");
                Resolved::new(T::placeholder(&key), Source::Placeholder)
            }
        };

        // A seeded value that landed while the fetch was running wins.
        let resolved = match self.store.get(&key) {
            Some(existing) => Resolved::new(existing.clone(), Source::Cache),
            None => {
                self.store.insert(key.clone(), fetched.value.clone());
                fetched
            }
        };

        let waiters = self.pending.remove(&key).unwrap_or_default();
        info!(
            entity_type,
            %key,
            source = ?resolved.source,
            waiters = waiters.len(),
            size = self.store.len(),
            "Resolved"
        );
        for respond_to in waiters {
            let _ = respond_to.send(Ok(resolved.clone()));
        }
    }
}
