use std::sync::Arc;

use pressroom_api::{ApiError, CreatePost, DocId, Post, PostFilter, UpdatePost};
use serde_json::json;

use super::{as_doc, decode, decode_many};
use crate::store::{Doc, Order, Query, ReactiveStore};

/// Forum posts. Same publish semantics as news, minus translations and
/// featuring; category is optional.
#[derive(Clone)]
pub struct PostHandlers {
    store: Arc<dyn ReactiveStore>,
}

impl PostHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// Same filter precedence as the news listing: category index first,
    /// published flag applied in memory when combined.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, ApiError> {
        if let Some(category_id) = &filter.category_id {
            let rows = self
                .store
                .run(Query::table("post").with_index("by_category", vec![json!(category_id)]))
                .await?;
            let mut items: Vec<Post> = decode_many(rows)?;
            if let Some(published) = filter.published {
                items.retain(|p| p.published == published);
            }
            return Ok(items);
        }

        if let Some(published) = filter.published {
            let rows = self
                .store
                .run(Query::table("post").with_index("by_published", vec![json!(published)]))
                .await?;
            return decode_many(rows);
        }

        let rows = self
            .store
            .run(Query::table("post").order(Order::Desc))
            .await?;
        decode_many(rows)
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<Post>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    pub async fn get_by_author(&self, author_id: &str) -> Result<Vec<Post>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("post")
                    .with_index("by_author", vec![json!(author_id)])
                    .order(Order::Desc),
            )
            .await?;
        decode_many(rows)
    }

    pub async fn create(&self, input: CreatePost) -> Result<DocId, ApiError> {
        let now = pressroom_api::now_millis();
        self.store
            .insert(
                "post",
                as_doc(json!({
                    "title": input.title,
                    "content": input.content,
                    "excerpt": input.excerpt,
                    "categoryId": input.category_id,
                    "authorId": input.author_id,
                    "published": input.published,
                    "publishedAt": input.published.then_some(now),
                    "createdAt": now,
                    "updatedAt": now,
                })),
            )
            .await
    }

    /// Partial update with the stamp-once publish rule.
    pub async fn update(&self, id: &DocId, input: UpdatePost) -> Result<(), ApiError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("post", id))?;

        let now = pressroom_api::now_millis();
        let mut patch = Doc::new();
        if let Some(title) = input.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(content) = input.content {
            patch.insert("content".to_string(), json!(content));
        }
        if let Some(excerpt) = input.excerpt {
            patch.insert("excerpt".to_string(), json!(excerpt));
        }
        if let Some(category_id) = input.category_id {
            patch.insert("categoryId".to_string(), json!(category_id));
        }
        if let Some(published) = input.published {
            patch.insert("published".to_string(), json!(published));
            if published && existing.published_at.is_none() {
                patch.insert("publishedAt".to_string(), json!(now));
            }
        }
        patch.insert("updatedAt".to_string(), json!(now));

        self.store.patch(id, patch).await
    }

    /// Delete the post only; replies are left orphaned.
    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.store.delete(id).await
    }
}
