use pressroom_api::{ApiError, Category, CreateCategory, DocId, UpdateCategory};

use super::LiveQuery;
use crate::repository::CategoryRepository;
use crate::validation::validate_category;

/// Category management screen: live listing plus validated mutations.
pub struct CategoriesView {
    repo: CategoryRepository,
    pub list: LiveQuery<Vec<Category>>,
}

impl CategoriesView {
    pub fn new(repo: CategoryRepository) -> Self {
        Self {
            repo,
            list: LiveQuery::new(),
        }
    }

    pub fn load(&self) {
        let repo = self.repo.clone();
        self.list.load(|callbacks| repo.watch_all(callbacks));
    }

    pub async fn create(&self, input: CreateCategory) -> Result<DocId, ApiError> {
        validate_category(&input.name, &input.slug, input.description.as_deref())?;
        self.repo.create(input).await
    }

    pub async fn update(&self, id: &DocId, input: UpdateCategory) -> Result<(), ApiError> {
        if let Some(slug) = &input.slug {
            crate::validation::validate_slug(slug)?;
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

    fn view() -> CategoriesView {
        let client = Client::new(Arc::new(MemoryStore::new()));
        CategoriesView::new(CategoryRepository::new(client))
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let view = view();
        view.load();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = view
            .create(CreateCategory {
                name: "X".to_string(),
                description: None,
                slug: "Bad Slug!".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(view.list.data().unwrap().is_empty());
        view.cleanup();
    }
}
