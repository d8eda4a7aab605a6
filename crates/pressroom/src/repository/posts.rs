use std::sync::Arc;

use pressroom_api::{
    ApiError, CreatePost, DocId, Post, PostFilter, UpdatePost, WatchCallbacks, WatchHandle,
};

use crate::client::Client;

#[derive(Clone)]
pub struct PostRepository {
    client: Arc<Client>,
}

impl PostRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn watch_list(
        &self,
        filter: PostFilter,
        callbacks: WatchCallbacks<Vec<Post>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["post"],
            move || {
                let client = client.clone();
                let filter = filter.clone();
                async move { client.posts.list(&filter).await }
            },
            callbacks,
        )
    }

    pub fn watch_one(&self, id: DocId, callbacks: WatchCallbacks<Option<Post>>) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["post"],
            move || {
                let client = client.clone();
                let id = id.clone();
                async move { client.posts.get(&id).await }
            },
            callbacks,
        )
    }

    pub fn watch_by_author(
        &self,
        author_id: String,
        callbacks: WatchCallbacks<Vec<Post>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["post"],
            move || {
                let client = client.clone();
                let author_id = author_id.clone();
                async move { client.posts.get_by_author(&author_id).await }
            },
            callbacks,
        )
    }

    pub async fn create(&self, input: CreatePost) -> Result<DocId, ApiError> {
        self.client
            .mutate("posts.create", self.client.posts.create(input))
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdatePost) -> Result<(), ApiError> {
        self.client
            .mutate("posts.update", self.client.posts.update(id, input))
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("posts.remove", self.client.posts.remove(id))
            .await
    }
}
