use std::sync::Arc;

use pressroom_api::{
    ApiError, CreatePostReply, DocId, PostReply, UpdatePostReply, WatchCallbacks, WatchHandle,
};

use crate::client::Client;

#[derive(Clone)]
pub struct PostReplyRepository {
    client: Arc<Client>,
}

impl PostReplyRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Live replies of one post, newest first.
    pub fn watch_by_post(
        &self,
        post_id: DocId,
        callbacks: WatchCallbacks<Vec<PostReply>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["post_reply"],
            move || {
                let client = client.clone();
                let post_id = post_id.clone();
                async move { client.replies.list_by_post(&post_id).await }
            },
            callbacks,
        )
    }

    pub async fn get_by_author(&self, author_id: &str) -> Result<Vec<PostReply>, ApiError> {
        self.client.replies.get_by_author(author_id).await
    }

    pub async fn get_by_parent(&self, parent_id: &DocId) -> Result<Vec<PostReply>, ApiError> {
        self.client.replies.get_by_parent(parent_id).await
    }

    pub async fn create(&self, input: CreatePostReply) -> Result<DocId, ApiError> {
        self.client
            .mutate("replies.create", self.client.replies.create(input))
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdatePostReply) -> Result<(), ApiError> {
        self.client
            .mutate("replies.update", self.client.replies.update(id, input))
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("replies.remove", self.client.replies.remove(id))
            .await
    }
}
