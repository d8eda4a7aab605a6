use std::sync::Arc;

use pressroom_api::{ApiError, CreateGame, DocId, Game, UpdateGame};
use serde_json::json;

use super::{as_doc, decode, decode_many};
use crate::store::{Doc, Order, Query, ReactiveStore};

/// Same slug-lookup pattern as categories; slug uniqueness is intentionally
/// not enforced here.
#[derive(Clone)]
pub struct GameHandlers {
    store: Arc<dyn ReactiveStore>,
}

impl GameHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Game>, ApiError> {
        let rows = self
            .store
            .run(Query::table("games").order(Order::Desc))
            .await?;
        decode_many(rows)
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<Game>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Game>, ApiError> {
        self.store
            .first(Query::table("games").with_index("by_slug", vec![json!(slug)]))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn create(&self, input: CreateGame) -> Result<DocId, ApiError> {
        let now = pressroom_api::now_millis();
        self.store
            .insert(
                "games",
                as_doc(json!({
                    "name": input.name,
                    "image": input.image,
                    "slug": input.slug,
                    "description": input.description,
                    "createdAt": now,
                    "updatedAt": now,
                })),
            )
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdateGame) -> Result<(), ApiError> {
        if self.get(id).await?.is_none() {
            return Err(ApiError::not_found("game", id));
        }

        let mut patch = Doc::new();
        if let Some(name) = input.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(image) = input.image {
            patch.insert("image".to_string(), json!(image));
        }
        if let Some(slug) = input.slug {
            patch.insert("slug".to_string(), json!(slug));
        }
        if let Some(description) = input.description {
            patch.insert("description".to_string(), json!(description));
        }
        patch.insert("updatedAt".to_string(), json!(pressroom_api::now_millis()));

        self.store.patch(id, patch).await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn crud_round_trip() {
        let handlers = GameHandlers::new(Arc::new(MemoryStore::new()));
        let id = handlers
            .create(CreateGame {
                name: "Valorant".to_string(),
                image: "valorant.png".to_string(),
                slug: "valorant".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert!(handlers.get_by_slug("valorant").await.unwrap().is_some());

        handlers
            .update(
                &id,
                UpdateGame {
                    description: Some("Tactical shooter".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = handlers.get(&id).await.unwrap().unwrap();
        assert_eq!(updated.description.as_deref(), Some("Tactical shooter"));
        assert_eq!(updated.name, "Valorant");

        handlers.remove(&id).await.unwrap();
        assert!(handlers.get(&id).await.unwrap().is_none());
    }
}
