//! Transport client: handler access, live queries and the auth hook.
//!
//! One [`Client`] wraps the document store and exposes the per-entity
//! handler sets plus [`Client::watch`], which turns any async query closure
//! into a live query re-run on every invalidation of the tables it reads.
//! The auth slot holds a token provider that is re-consulted on every use,
//! so a refreshed token is picked up without re-wiring anything.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use pressroom_api::{ApiError, WatchCallbacks, WatchHandle};

use crate::handlers::{
    CategoryHandlers, GameHandlers, NewsHandlers, PostHandlers, PostReplyHandlers,
};
use crate::store::ReactiveStore;
use crate::translations::TranslationHandlers;

/// Source of the current access token. Implemented by the session manager;
/// the client never caches the returned value.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

pub struct Client {
    store: Arc<dyn ReactiveStore>,
    pub categories: CategoryHandlers,
    pub news: NewsHandlers,
    pub translations: TranslationHandlers,
    pub posts: PostHandlers,
    pub replies: PostReplyHandlers,
    pub games: GameHandlers,
    auth: RwLock<Option<Arc<dyn TokenProvider>>>,
}

impl Client {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Arc<Self> {
        Arc::new(Self {
            categories: CategoryHandlers::new(store.clone()),
            news: NewsHandlers::new(store.clone()),
            translations: TranslationHandlers::new(store.clone()),
            posts: PostHandlers::new(store.clone()),
            replies: PostReplyHandlers::new(store.clone()),
            games: GameHandlers::new(store.clone()),
            auth: RwLock::new(None),
            store,
        })
    }

    /// Install the token provider. Called by the session manager on login
    /// and cleared on logout or refresh failure.
    pub fn set_auth(&self, provider: Option<Arc<dyn TokenProvider>>) {
        *self.auth.write().unwrap() = provider;
    }

    /// The token to attach to the next remote call, resolved fresh from the
    /// provider on every invocation.
    pub fn current_token(&self) -> Option<String> {
        self.auth
            .read()
            .unwrap()
            .as_ref()
            .and_then(|provider| provider.token())
    }

    pub fn store(&self) -> &Arc<dyn ReactiveStore> {
        &self.store
    }

    /// Open a live query.
    ///
    /// `query` runs once immediately and again after every invalidation of
    /// any table in `tables`; each run delivers a full snapshot through
    /// `callbacks`. Bursts of invalidations are coalesced into a single
    /// re-run. Delivery stops permanently once the returned handle is
    /// cancelled; a result computed before cancellation but arriving after
    /// it is discarded.
    pub fn watch<T, F, Fut>(
        self: &Arc<Self>,
        tables: &[&str],
        query: F,
        callbacks: WatchCallbacks<T>,
    ) -> WatchHandle
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send,
    {
        let mut invalidations = self.store.invalidations(tables);
        let alive = Arc::new(AtomicBool::new(true));
        let task_alive = alive.clone();

        let task = tokio::spawn(async move {
            loop {
                let result = query().await;
                if !task_alive.load(Ordering::SeqCst) {
                    return;
                }
                match result {
                    Ok(snapshot) => (callbacks.on_snapshot)(snapshot),
                    Err(err) => {
                        tracing::warn!(error = %err, "live query failed");
                        (callbacks.on_error)(err);
                    }
                }

                if invalidations.recv().await.is_none() {
                    return;
                }
                // Coalesce a burst into one re-run.
                while invalidations.try_recv().is_ok() {}
            }
        });

        WatchHandle::new(alive, task.abort_handle())
    }

    /// Run a mutation, logging failures before handing them back.
    pub async fn mutate<T, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match fut.await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!(operation, error = %err, "mutation failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pressroom_api::{Category, CreateCategory};
    use std::sync::Mutex;
    use std::time::Duration;

    fn create_input(name: &str, slug: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            description: None,
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn watch_delivers_initial_and_updated_snapshots() {
        let client = Client::new(Arc::new(MemoryStore::new()));
        let snapshots: Arc<Mutex<Vec<Vec<Category>>>> = Arc::default();

        let seen = snapshots.clone();
        let query_client = client.clone();
        let handle = client.watch(
            &["categories"],
            move || {
                let client = query_client.clone();
                async move { client.categories.list().await }
            },
            WatchCallbacks::new(
                move |snapshot| seen.lock().unwrap().push(snapshot),
                |_| {},
            ),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(snapshots.lock().unwrap().len(), 1);
        assert!(snapshots.lock().unwrap()[0].is_empty());

        client
            .categories
            .create(create_input("Esports", "esports"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let seen = snapshots.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].len(), 1);
        drop(seen);

        handle.cancel();
    }

    #[tokio::test]
    async fn cancelled_watch_stops_delivering() {
        let client = Client::new(Arc::new(MemoryStore::new()));
        let snapshots: Arc<Mutex<Vec<Vec<Category>>>> = Arc::default();

        let seen = snapshots.clone();
        let query_client = client.clone();
        let handle = client.watch(
            &["categories"],
            move || {
                let client = query_client.clone();
                async move { client.categories.list().await }
            },
            WatchCallbacks::new(
                move |snapshot| seen.lock().unwrap().push(snapshot),
                |_| {},
            ),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        assert!(!handle.is_active());
        let delivered = snapshots.lock().unwrap().len();

        client
            .categories
            .create(create_input("Late", "late"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(snapshots.lock().unwrap().len(), delivered);
    }

    #[tokio::test]
    async fn token_is_resolved_fresh_from_the_provider() {
        struct Rotating(Mutex<Option<String>>);
        impl TokenProvider for Rotating {
            fn token(&self) -> Option<String> {
                self.0.lock().unwrap().clone()
            }
        }

        let client = Client::new(Arc::new(MemoryStore::new()));
        assert_eq!(client.current_token(), None);

        let provider = Arc::new(Rotating(Mutex::new(Some("t1".to_string()))));
        client.set_auth(Some(provider.clone()));
        assert_eq!(client.current_token().as_deref(), Some("t1"));

        *provider.0.lock().unwrap() = Some("t2".to_string());
        assert_eq!(client.current_token().as_deref(), Some("t2"));

        client.set_auth(None);
        assert_eq!(client.current_token(), None);
    }
}
