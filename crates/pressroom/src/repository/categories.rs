use std::sync::Arc;

use pressroom_api::{
    ApiError, Category, CreateCategory, DocId, UpdateCategory, WatchCallbacks, WatchHandle,
};

use crate::client::Client;

#[derive(Clone)]
pub struct CategoryRepository {
    client: Arc<Client>,
}

impl CategoryRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Live snapshot of all categories, newest first.
    pub fn watch_all(&self, callbacks: WatchCallbacks<Vec<Category>>) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["categories"],
            move || {
                let client = client.clone();
                async move { client.categories.list().await }
            },
            callbacks,
        )
    }

    pub fn watch_one(
        &self,
        id: DocId,
        callbacks: WatchCallbacks<Option<Category>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["categories"],
            move || {
                let client = client.clone();
                let id = id.clone();
                async move { client.categories.get(&id).await }
            },
            callbacks,
        )
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiError> {
        self.client.categories.get_by_slug(slug).await
    }

    pub async fn create(&self, input: CreateCategory) -> Result<DocId, ApiError> {
        self.client
            .mutate("categories.create", self.client.categories.create(input))
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdateCategory) -> Result<(), ApiError> {
        self.client
            .mutate("categories.update", self.client.categories.update(id, input))
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("categories.remove", self.client.categories.remove(id))
            .await
    }
}
