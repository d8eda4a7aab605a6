use std::sync::Arc;

use pressroom_api::{ApiError, Category, CreateCategory, DocId, UpdateCategory};
use serde_json::json;

use super::{as_doc, decode, decode_many};
use crate::store::{Doc, Order, Query, ReactiveStore};

#[derive(Clone)]
pub struct CategoryHandlers {
    store: Arc<dyn ReactiveStore>,
}

impl CategoryHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// All categories in reverse-insertion order.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let rows = self
            .store
            .run(Query::table("categories").order(Order::Desc))
            .await?;
        decode_many(rows)
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<Category>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiError> {
        self.store
            .first(Query::table("categories").with_index("by_slug", vec![json!(slug)]))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn create(&self, input: CreateCategory) -> Result<DocId, ApiError> {
        let now = pressroom_api::now_millis();
        self.store
            .insert(
                "categories",
                as_doc(json!({
                    "name": input.name,
                    "description": input.description,
                    "slug": input.slug,
                    "createdAt": now,
                    "updatedAt": now,
                })),
            )
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdateCategory) -> Result<(), ApiError> {
        if self.get(id).await?.is_none() {
            return Err(ApiError::not_found("category", id));
        }

        let mut patch = Doc::new();
        if let Some(name) = input.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(description) = input.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(slug) = input.slug {
            patch.insert("slug".to_string(), json!(slug));
        }
        patch.insert("updatedAt".to_string(), json!(pressroom_api::now_millis()));

        self.store.patch(id, patch).await
    }

    /// Delete unconditionally; news referencing this category are left
    /// untouched.
    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.store.delete(id).await
    }
}
