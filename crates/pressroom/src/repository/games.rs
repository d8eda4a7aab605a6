use std::sync::Arc;

use pressroom_api::{ApiError, CreateGame, DocId, Game, UpdateGame, WatchCallbacks, WatchHandle};

use crate::client::Client;

#[derive(Clone)]
pub struct GameRepository {
    client: Arc<Client>,
}

impl GameRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn watch_all(&self, callbacks: WatchCallbacks<Vec<Game>>) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["games"],
            move || {
                let client = client.clone();
                async move { client.games.list().await }
            },
            callbacks,
        )
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Game>, ApiError> {
        self.client.games.get_by_slug(slug).await
    }

    pub async fn create(&self, input: CreateGame) -> Result<DocId, ApiError> {
        self.client
            .mutate("games.create", self.client.games.create(input))
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdateGame) -> Result<(), ApiError> {
        self.client
            .mutate("games.update", self.client.games.update(id, input))
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("games.remove", self.client.games.remove(id))
            .await
    }
}
