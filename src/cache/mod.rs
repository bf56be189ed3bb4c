//! Render cache with request coalescing.
//!
//! [`RenderCache`] memoizes completed render results and tracks in-flight
//! renders so that at most one render runs per unique [`CacheKey`]. Callers
//! that arrive while a render is running share its outcome instead of
//! starting another one.
//!
//! # States
//!
//! Every key is in exactly one of three states:
//!
//! ```text
//!            get_cached_render
//!   absent ────────────────────► in-flight
//!     ▲                            │   │
//!     │          fetch failed      │   │ fetch succeeded
//!     └────────────────────────────┘   ▼
//!     ▲                             completed
//!     │          clear_all             │
//!     └────────────────────────────────┘
//! ```
//!
//! Failures are never cached: the next request for a failed key starts a
//! fresh fetch. A fetch that panics counts as a failure.

mod key;

pub use key::{CacheKey, build_key};

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use futures::future::{self, BoxFuture, Either, FutureExt, Ready, Shared};
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{IconError, Result};
use crate::icon::IconRenderParams;

/// A render shared between every caller waiting on the same key.
pub type PendingRender<T> = Shared<BoxFuture<'static, Result<T>>>;

/// Future returned by [`RenderCache::get_cached_render`].
///
/// Resolves immediately on a cache hit, otherwise waits on the shared
/// in-flight render.
pub type RenderFuture<T> = Either<Ready<Result<T>>, PendingRender<T>>;

// ============================================================================
// Cache State
// ============================================================================

struct InFlight<T> {
    /// Distinguishes this render from one registered for the same key after
    /// a `clear_all`.
    generation: u64,
    pending: PendingRender<T>,
}

struct CacheState<T> {
    completed: LruCache<CacheKey, T>,
    in_flight: HashMap<CacheKey, InFlight<T>>,
    next_generation: u64,
}

impl<T: Clone> CacheState<T> {
    /// Moves a finished render out of the in-flight table.
    ///
    /// Renders that were cleared while running still reach their waiters but
    /// leave the tables untouched.
    fn settle(&mut self, key: &CacheKey, generation: u64, result: &Result<T>) {
        match self.in_flight.get(key) {
            Some(flight) if flight.generation == generation => {}
            _ => {
                log::debug!("Discarding stale render for {key}");
                return;
            }
        }

        self.in_flight.remove(key);
        match result {
            Ok(value) => {
                self.completed.put(key.clone(), value.clone());
            }
            Err(err) => {
                log::warn!("Render failed for {key}: {err}");
            }
        }
    }
}

// ============================================================================
// RenderCache
// ============================================================================

/// Memo of completed renders plus a table of in-flight renders.
///
/// Cloning a `RenderCache` yields another handle to the same tables.
///
/// # Example
///
/// ```
/// use galileo_icons::{IconRenderParams, RenderCache};
///
/// # futures::executor::block_on(async {
/// let cache = RenderCache::<String>::new();
/// let params = IconRenderParams::new("alpha", "x1", "flat", 0.0, 64);
///
/// let value = cache
///     .get_cached_render(&params, || async { Ok("r1".to_string()) })
///     .await
///     .unwrap();
/// assert_eq!(value, "r1");
///
/// // Second request is served from the memo; the fetcher is not called.
/// let again = cache
///     .get_cached_render(&params, || async { Ok("r2".to_string()) })
///     .await
///     .unwrap();
/// assert_eq!(again, "r1");
/// # });
/// ```
pub struct RenderCache<T> {
    state: Arc<Mutex<CacheState<T>>>,
}

impl<T> Clone for RenderCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RenderCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> RenderCache<T> {
    /// Creates a cache whose completed table grows without bound.
    pub fn new() -> Self {
        Self::from_lru(LruCache::unbounded())
    }

    /// Creates a cache that keeps at most `capacity` completed results,
    /// evicting the least recently used one when full.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::from_lru(LruCache::new(capacity))
    }

    fn from_lru(completed: LruCache<CacheKey, T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                completed,
                in_flight: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    /// Returns the result for `params`, fetching it at most once.
    ///
    /// 1. A completed result is returned without calling `fetch`.
    /// 2. An in-flight render for the same key is joined without calling `fetch`.
    /// 3. Otherwise a render is registered as in-flight before this function
    ///    returns, and `fetch` is called exactly once when it is first driven.
    ///
    /// The lookup and registration happen under one lock, so concurrent callers
    /// can never both start a fetch for the same key. `fetch` itself runs after
    /// the lock is released and may call back into the cache.
    ///
    /// A panic inside `fetch` is reported to every waiter as
    /// [`IconError::Provider`] and leaves the key absent.
    ///
    /// Inside a Tokio runtime the render is also spawned as a detached task,
    /// so it completes even if every caller drops its future.
    pub fn get_cached_render<F, Fut>(&self, params: &IconRenderParams, fetch: F) -> RenderFuture<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let key = CacheKey::from_params(params);
        let mut state = self.state.lock();

        if let Some(value) = state.completed.get(&key) {
            log::debug!("Render cache hit: {key}");
            return Either::Left(future::ready(Ok(value.clone())));
        }

        if let Some(flight) = state.in_flight.get(&key) {
            log::debug!("Joining in-flight render: {key}");
            return Either::Right(flight.pending.clone());
        }

        let generation = state.next_generation;
        state.next_generation = state.next_generation.wrapping_add(1);

        log::debug!("Rendering {key}");
        let pending = settle_on_completion(
            Arc::downgrade(&self.state),
            key.clone(),
            generation,
            params.provider.clone(),
            fetch,
        );
        state.in_flight.insert(
            key,
            InFlight {
                generation,
                pending: pending.clone(),
            },
        );
        drop(state);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(pending.clone().map(|_| ()));
        }

        Either::Right(pending)
    }

    /// Empties both the completed and the in-flight tables.
    ///
    /// Running fetches are not cancelled; their callers still receive the
    /// result, but it is not stored.
    pub fn clear_all(&self) {
        let mut state = self.state.lock();
        log::info!(
            "Clearing render cache ({} completed, {} in flight)",
            state.completed.len(),
            state.in_flight.len()
        );
        state.completed.clear();
        state.in_flight.clear();
    }

    /// Number of completed results held.
    pub fn len(&self) -> usize {
        self.state.lock().completed.len()
    }

    /// Returns true if no completed results are held.
    pub fn is_empty(&self) -> bool {
        self.state.lock().completed.is_empty()
    }

    /// Number of renders currently in flight.
    pub fn in_flight_len(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Returns true if a completed result exists for `params`.
    pub fn contains(&self, params: &IconRenderParams) -> bool {
        self.state
            .lock()
            .completed
            .contains(&CacheKey::from_params(params))
    }
}

/// Wraps `fetch` so that its outcome is recorded in the cache tables before
/// it reaches any waiter.
fn settle_on_completion<T, F, Fut>(
    state: Weak<Mutex<CacheState<T>>>,
    key: CacheKey,
    generation: u64,
    provider: String,
    fetch: F,
) -> PendingRender<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    async move {
        let result = AssertUnwindSafe(async move { fetch().await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(IconError::provider(provider, panic_message(payload.as_ref())))
            });
        if let Some(state) = state.upgrade() {
            state.lock().settle(&key, generation, &result);
        }
        result
    }
    .boxed()
    .shared()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("render panicked: {detail}")
}

// ============================================================================
// Tests
// ============================================================================
