use std::sync::Arc;

use pressroom_api::{ApiError, CreatePostReply, DocId, PostReply, UpdatePostReply};
use serde_json::json;

use super::{as_doc, decode, decode_many};
use crate::store::{Doc, Order, Query, ReactiveStore};

#[derive(Clone)]
pub struct PostReplyHandlers {
    store: Arc<dyn ReactiveStore>,
}

impl PostReplyHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// Replies of one post, newest first. Threading is left to the caller
    /// via `parent_reply_id`.
    pub async fn list_by_post(&self, post_id: &DocId) -> Result<Vec<PostReply>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("post_reply")
                    .with_index("by_post", vec![json!(post_id)])
                    .order(Order::Desc),
            )
            .await?;
        decode_many(rows)
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<PostReply>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    pub async fn get_by_author(&self, author_id: &str) -> Result<Vec<PostReply>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("post_reply")
                    .with_index("by_author", vec![json!(author_id)])
                    .order(Order::Desc),
            )
            .await?;
        decode_many(rows)
    }

    /// Direct children of one reply.
    pub async fn get_by_parent(&self, parent_reply_id: &DocId) -> Result<Vec<PostReply>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("post_reply")
                    .with_index("by_parent", vec![json!(parent_reply_id)])
                    .order(Order::Desc),
            )
            .await?;
        decode_many(rows)
    }

    /// Create a reply. A `parent_reply_id` must reference an existing reply
    /// of the same post; a cross-post or dangling parent is rejected before
    /// anything is written.
    pub async fn create(&self, input: CreatePostReply) -> Result<DocId, ApiError> {
        if let Some(parent_id) = &input.parent_reply_id {
            let parent = self
                .get(parent_id)
                .await?
                .ok_or_else(|| ApiError::validation("parent reply does not exist"))?;
            if parent.post_id != input.post_id {
                return Err(ApiError::validation(
                    "parent reply belongs to a different post",
                ));
            }
        }

        let now = pressroom_api::now_millis();
        self.store
            .insert(
                "post_reply",
                as_doc(json!({
                    "postId": input.post_id,
                    "authorId": input.author_id,
                    "content": input.content,
                    "parentReplyId": input.parent_reply_id,
                    "createdAt": now,
                    "updatedAt": now,
                })),
            )
            .await
    }

    /// Only the body of a reply is editable after creation.
    pub async fn update(&self, id: &DocId, input: UpdatePostReply) -> Result<(), ApiError> {
        if self.get(id).await?.is_none() {
            return Err(ApiError::not_found("post reply", id));
        }

        let mut patch = Doc::new();
        patch.insert("content".to_string(), json!(input.content));
        patch.insert("updatedAt".to_string(), json!(pressroom_api::now_millis()));
        self.store.patch(id, patch).await
    }

    /// Delete one reply; descendants are left dangling.
    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn handlers() -> PostReplyHandlers {
        PostReplyHandlers::new(Arc::new(MemoryStore::new()))
    }

    fn reply(post: &str, parent: Option<&DocId>) -> CreatePostReply {
        CreatePostReply {
            post_id: DocId::from(post),
            author_id: "user-1".to_string(),
            content: "hi".to_string(),
            parent_reply_id: parent.cloned(),
        }
    }

    #[tokio::test]
    async fn nested_reply_under_same_post_is_accepted() {
        let replies = handlers();
        let root = replies.create(reply("post:1", None)).await.unwrap();
        let child = replies.create(reply("post:1", Some(&root))).await.unwrap();

        let children = replies.get_by_parent(&root).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child);
    }

    #[tokio::test]
    async fn cross_post_parent_is_rejected() {
        let replies = handlers();
        let root = replies.create(reply("post:1", None)).await.unwrap();

        let err = replies
            .create(reply("post:2", Some(&root)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn dangling_parent_is_rejected() {
        let replies = handlers();
        let err = replies
            .create(reply("post:1", Some(&DocId::from("post_reply:404"))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn update_touches_content_only() {
        let replies = handlers();
        let id = replies.create(reply("post:1", None)).await.unwrap();

        replies
            .update(
                &id,
                UpdatePostReply {
                    content: "edited".to_string(),
                },
            )
            .await
            .unwrap();

        let row = replies.get(&id).await.unwrap().unwrap();
        assert_eq!(row.content, "edited");
        assert_eq!(row.author_id, "user-1");
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_post() {
        let replies = handlers();
        replies.create(reply("post:1", None)).await.unwrap();
        replies.create(reply("post:2", None)).await.unwrap();

        let listed = replies.list_by_post(&DocId::from("post:1")).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
