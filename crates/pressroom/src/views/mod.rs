//! View-model layer: live-query state containers for UI consumption.
//!
//! A [`LiveQuery`] mirrors the latest snapshot of one remote query plus its
//! loading/error state. Reloading disposes of the previous subscription
//! before opening the next one, so a view never receives snapshots from a
//! query it abandoned. On failure the last good data is retained alongside
//! the user-facing error message.

mod categories;
mod games;
mod news;
mod posts;
mod translations;

pub use categories::CategoriesView;
pub use games::GamesView;
pub use news::{NewsEditor, NewsForm, NewsListView};
pub use posts::{PostForm, PostRepliesView, PostsView};
pub use translations::{TranslationEditor, TranslationForm};

use std::sync::{Arc, Mutex};

use pressroom_api::{WatchCallbacks, WatchHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

struct Shared<T> {
    state: QueryState,
    data: Option<T>,
    error: Option<String>,
}

pub struct LiveQuery<T> {
    shared: Arc<Mutex<Shared<T>>>,
    handle: Mutex<Option<WatchHandle>>,
}

impl<T: Clone + Send + 'static> LiveQuery<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: QueryState::Idle,
                data: None,
                error: None,
            })),
            handle: Mutex::new(None),
        }
    }

    pub fn state(&self) -> QueryState {
        self.shared.lock().unwrap().state
    }

    /// The latest snapshot. Retained through a failure so the UI can keep
    /// showing stale data next to the error.
    pub fn data(&self) -> Option<T> {
        self.shared.lock().unwrap().data.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.shared.lock().unwrap().error.clone()
    }

    /// Open (or reopen) the subscription. Any previous subscription is
    /// cancelled first.
    pub fn load(&self, open: impl FnOnce(WatchCallbacks<T>) -> WatchHandle) {
        self.dispose();
        {
            let mut shared = self.shared.lock().unwrap();
            shared.state = QueryState::Loading;
            shared.error = None;
        }

        let on_snapshot = self.shared.clone();
        let on_error = self.shared.clone();
        let callbacks = WatchCallbacks::new(
            move |snapshot| {
                let mut shared = on_snapshot.lock().unwrap();
                shared.state = QueryState::Ready;
                shared.data = Some(snapshot);
                shared.error = None;
            },
            move |err| {
                let mut shared = on_error.lock().unwrap();
                shared.state = QueryState::Failed;
                shared.error = Some(err.user_message());
            },
        );

        *self.handle.lock().unwrap() = Some(open(callbacks));
    }

    /// Cancel the subscription and reset to idle. Data is cleared; the view
    /// is going away.
    pub fn cleanup(&self) {
        self.dispose();
        let mut shared = self.shared.lock().unwrap();
        shared.state = QueryState::Idle;
        shared.data = None;
        shared.error = None;
    }

    fn dispose(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.cancel();
        }
    }
}

impl<T: Clone + Send + 'static> Default for LiveQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}
