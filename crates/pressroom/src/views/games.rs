use pressroom_api::{ApiError, CreateGame, DocId, Game, UpdateGame};

use super::LiveQuery;
use crate::repository::GameRepository;
use crate::validation::validate_slug;

pub struct GamesView {
    repo: GameRepository,
    pub list: LiveQuery<Vec<Game>>,
}

impl GamesView {
    pub fn new(repo: GameRepository) -> Self {
        Self {
            repo,
            list: LiveQuery::new(),
        }
    }

    pub fn load(&self) {
        let repo = self.repo.clone();
        self.list.load(|callbacks| repo.watch_all(callbacks));
    }

    pub async fn create(&self, input: CreateGame) -> Result<DocId, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ApiError::validation("a game name is required"));
        }
        validate_slug(&input.slug)?;
        self.repo.create(input).await
    }

    pub async fn update(&self, id: &DocId, input: UpdateGame) -> Result<(), ApiError> {
        if let Some(slug) = &input.slug {
            validate_slug(slug)?;
        }
        self.repo.update(id, input).await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.repo.remove(id).await
    }

    pub fn cleanup(&self) {
        self.list.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::Client;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn listing_updates_after_create() {
        let client = Client::new(Arc::new(MemoryStore::new()));
        let view = GamesView::new(GameRepository::new(client));
        view.load();
        tokio::time::sleep(Duration::from_millis(50)).await;

        view.create(CreateGame {
            name: "Valorant".to_string(),
            image: "valorant.png".to_string(),
            slug: "valorant".to_string(),
            description: None,
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(view.list.data().unwrap().len(), 1);
        view.cleanup();
    }
}
