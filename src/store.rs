// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Client-resident entity store: one invalidation-driven cache per
//! (collection, scope) pair.
//!
//! A collection is fetched on first read and then served from memory until a
//! mutation marks it stale. Fetch failures are held as a distinct error state
//! and surfaced to callers until the key is invalidated again; concurrent
//! readers of the same key share a single in-flight fetch.

use crate::error::{AppError, Result};
use crate::models::{
    Favorite, Follow, MealPlanEntry, Recipe, RecentlyViewed, Review, SharedRecipe,
    ShoppingListItem, User,
};
use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Cache state of one (collection, scope) slot.
enum QueryState<T> {
    /// Never fetched
    Empty,
    /// Served from memory
    Fresh(Arc<Vec<T>>),
    /// Invalidated; previous data retained until the refetch lands
    Stale(Arc<Vec<T>>),
    /// Last fetch failed; sticky until invalidated
    Failed(String),
}

struct Slot<T> {
    state: RwLock<QueryState<T>>,
    /// Serializes fetches for this key so concurrent readers issue one.
    fetch_lock: tokio::sync::Mutex<()>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(QueryState::Empty),
            fetch_lock: tokio::sync::Mutex::new(()),
        }
    }
}

/// Per-scope cache of one entity collection.
pub struct Query<K, T> {
    slots: DashMap<K, Arc<Slot<T>>>,
}

impl<K, T> Default for Query<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<K, T> Query<K, T>
where
    K: Eq + Hash + Clone,
{
    fn slot(&self, key: &K) -> Arc<Slot<T>> {
        self.slots
            .entry(key.clone())
            .or_default()
            .value()
            .clone()
    }

    /// Return the cached collection, fetching if this key is empty, stale,
    /// or being read for the first time.
    ///
    /// A failed fetch leaves the slot in an error state that is returned to
    /// every caller until [`invalidate`](Self::invalidate) resets it.
    pub async fn get_or_fetch<F>(&self, key: &K, fetch: F) -> Result<Arc<Vec<T>>>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        let slot = self.slot(key);

        if let QueryState::Fresh(data) = &*slot.state.read().unwrap() {
            return Ok(data.clone());
        }
        if let QueryState::Failed(msg) = &*slot.state.read().unwrap() {
            return Err(AppError::BackendUnavailable(msg.clone()));
        }

        let _fetching = slot.fetch_lock.lock().await;

        // Re-check: another reader may have completed the fetch while we
        // waited on the lock.
        match &*slot.state.read().unwrap() {
            QueryState::Fresh(data) => return Ok(data.clone()),
            QueryState::Failed(msg) => {
                return Err(AppError::BackendUnavailable(msg.clone()));
            }
            _ => {}
        }

        match fetch.await {
            Ok(data) => {
                let data = Arc::new(data);
                *slot.state.write().unwrap() = QueryState::Fresh(data.clone());
                Ok(data)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Collection fetch failed");
                *slot.state.write().unwrap() = QueryState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Mark this key stale; the next read refetches.
    ///
    /// An error state is cleared as well, which is how callers retry a
    /// failed collection.
    pub fn invalidate(&self, key: &K) {
        let Some(slot) = self.slots.get(key).map(|s| s.value().clone()) else {
            return;
        };
        let mut state = slot.state.write().unwrap();
        *state = match std::mem::replace(&mut *state, QueryState::Empty) {
            QueryState::Fresh(data) | QueryState::Stale(data) => QueryState::Stale(data),
            QueryState::Empty | QueryState::Failed(_) => QueryState::Empty,
        };
    }
}

/// The normalized base collections the derived views are computed from.
///
/// Recipes and users are global; reviews are scoped by recipe id; everything
/// else is scoped by the owning user id.
#[derive(Default)]
pub struct Collections {
    pub recipes: Query<(), Recipe>,
    pub users: Query<(), User>,
    pub reviews: Query<String, Review>,
    pub favorites: Query<String, Favorite>,
    pub recents: Query<String, RecentlyViewed>,
    pub follows: Query<String, Follow>,
    pub shopping: Query<String, ShoppingListItem>,
    pub meal_plan: Query<String, MealPlanEntry>,
    pub shared: Query<String, SharedRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_fetch(
        counter: &Arc<AtomicUsize>,
    ) -> impl Future<Output = Result<Vec<u32>>> {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        }
    }

    #[tokio::test]
    async fn test_second_read_served_from_cache() {
        let query: Query<String, u32> = Query::default();
        let fetches = Arc::new(AtomicUsize::new(0));
        let key = "user-1".to_string();

        let first = query.get_or_fetch(&key, counted_fetch(&fetches)).await.unwrap();
        let second = query.get_or_fetch(&key, counted_fetch(&fetches)).await.unwrap();

        assert_eq!(*first, vec![1, 2, 3]);
        assert_eq!(*second, vec![1, 2, 3]);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_triggers_refetch() {
        let query: Query<String, u32> = Query::default();
        let fetches = Arc::new(AtomicUsize::new(0));
        let key = "user-1".to_string();

        query.get_or_fetch(&key, counted_fetch(&fetches)).await.unwrap();
        query.invalidate(&key);
        query.get_or_fetch(&key, counted_fetch(&fetches)).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_sticky_until_invalidated() {
        let query: Query<String, u32> = Query::default();
        let fetches = Arc::new(AtomicUsize::new(0));
        let key = "user-1".to_string();

        let failing = {
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                Err(AppError::BackendUnavailable("connection refused".to_string()))
            }
        };
        assert!(query.get_or_fetch(&key, failing).await.is_err());

        // The error state is served without a new fetch
        let result = query.get_or_fetch(&key, counted_fetch(&fetches)).await;
        assert!(matches!(result, Err(AppError::BackendUnavailable(_))));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        // Re-invalidating is the retry path
        query.invalidate(&key);
        let recovered = query.get_or_fetch(&key, counted_fetch(&fetches)).await.unwrap();
        assert_eq!(*recovered, vec![1, 2, 3]);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let query: Query<String, u32> = Query::default();
        let fetches = Arc::new(AtomicUsize::new(0));

        query
            .get_or_fetch(&"a".to_string(), counted_fetch(&fetches))
            .await
            .unwrap();
        query
            .get_or_fetch(&"b".to_string(), counted_fetch(&fetches))
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        query.invalidate(&"a".to_string());
        query
            .get_or_fetch(&"b".to_string(), counted_fetch(&fetches))
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }
}
