use std::sync::Arc;

use pressroom_api::{ApiError, CreateNews, DocId, News, NewsFilter, UpdateNews};

use super::LiveQuery;
use crate::auth::SessionManager;
use crate::repository::NewsRepository;
use crate::validation::validate_article;

/// Editable article fields as the form holds them. The author is never part
/// of the form; it comes from the signed-in session on submit.
#[derive(Debug, Clone, Default)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<DocId>,
    pub published: bool,
    pub is_featured: bool,
}

/// Admin listing of articles with live filters.
pub struct NewsListView {
    repo: NewsRepository,
    pub list: LiveQuery<Vec<News>>,
}

impl NewsListView {
    pub fn new(repo: NewsRepository) -> Self {
        Self {
            repo,
            list: LiveQuery::new(),
        }
    }

    /// (Re)load with the given filters; the previous subscription is
    /// replaced.
    pub fn load(&self, filter: NewsFilter) {
        let repo = self.repo.clone();
        self.list
            .load(|callbacks| repo.watch_list(filter, callbacks));
    }

    pub fn cleanup(&self) {
        self.list.cleanup();
    }
}

/// Create/edit form controller for one article.
pub struct NewsEditor {
    repo: NewsRepository,
    session: Arc<SessionManager>,
    pub current: LiveQuery<Option<News>>,
}

impl NewsEditor {
    pub fn new(repo: NewsRepository, session: Arc<SessionManager>) -> Self {
        Self {
            repo,
            session,
            current: LiveQuery::new(),
        }
    }

    pub fn load(&self, id: DocId) {
        let repo = self.repo.clone();
        self.current.load(|callbacks| repo.watch_one(id, callbacks));
    }

    /// Validate and create, stamping the session user as author.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when no user is signed in, `Validation` when the form
    /// fails the article limits or no category is chosen.
    pub async fn submit_new(&self, form: NewsForm) -> Result<DocId, ApiError> {
        let author = self.session.current_user().ok_or(ApiError::Unauthorized {
            message: "sign in to create articles".to_string(),
        })?;
        validate_article(&form.title, &form.content, form.excerpt.as_deref())?;
        let category_id = form
            .category_id
            .ok_or_else(|| ApiError::validation("a category is required"))?;

        self.repo
            .create(CreateNews {
                title: form.title,
                content: form.content,
                excerpt: form.excerpt,
                cover_image: form.cover_image,
                category_id,
                author_id: author.id,
                published: form.published,
                is_featured: Some(form.is_featured),
            })
            .await
    }

    /// Validate and save edits to an existing article. Authorship is never
    /// rewritten on edit.
    pub async fn submit_edit(&self, id: &DocId, form: NewsForm) -> Result<(), ApiError> {
        if self.session.current_user().is_none() {
            return Err(ApiError::Unauthorized {
                message: "sign in to edit articles".to_string(),
            });
        }
        validate_article(&form.title, &form.content, form.excerpt.as_deref())?;

        self.repo
            .update(
                id,
                UpdateNews {
                    title: Some(form.title),
                    content: Some(form.content),
                    excerpt: form.excerpt,
                    cover_image: form.cover_image,
                    category_id: form.category_id,
                    published: Some(form.published),
                    is_featured: Some(form.is_featured),
                },
            )
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.repo.remove(id).await
    }

    pub fn cleanup(&self) {
        self.current.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, IdentityProvider, TokenSet};
    use crate::store::MemoryStore;
    use crate::Client;
    use async_trait::async_trait;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    struct StubProvider;

    #[async_trait]
    impl IdentityProvider for StubProvider {
        async fn recover_session(&self) -> Result<Option<TokenSet>, ApiError> {
            Ok(None)
        }
        async fn login(&self, _: Option<Credentials>) -> Result<TokenSet, ApiError> {
            let token = encode(
                &Header::default(),
                &json!({"sub": "author-7", "preferred_username": "ana"}),
                &EncodingKey::from_secret(b"test"),
            )
            .unwrap();
            Ok(TokenSet {
                access_token: token,
                refresh_token: None,
                expires_in: Some(300),
            })
        }
        async fn refresh(&self, _: &str) -> Result<TokenSet, ApiError> {
            Err(ApiError::Unauthorized {
                message: "no".to_string(),
            })
        }
        async fn logout(&self, _: Option<&str>) -> Result<(), ApiError> {
            Ok(())
        }
    }

    async fn editor() -> (NewsEditor, Arc<SessionManager>, Arc<Client>) {
        let client = Client::new(Arc::new(MemoryStore::new()));
        let session = SessionManager::new(Arc::new(StubProvider), client.clone());
        let editor = NewsEditor::new(NewsRepository::new(client.clone()), session.clone());
        (editor, session, client)
    }

    fn form() -> NewsForm {
        NewsForm {
            title: "A headline".to_string(),
            content: "Body text that is long enough.".to_string(),
            category_id: Some(DocId::from("categories:0")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn submit_requires_a_session() {
        let (editor, _, _) = editor().await;
        let err = editor.submit_new(form()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn author_comes_from_the_session_user() {
        let (editor, session, client) = editor().await;
        session.login(None).await.unwrap();

        let id = editor.submit_new(form()).await.unwrap();
        let created = client.news.get(&id).await.unwrap().unwrap();
        assert_eq!(created.author_id, "author-7");
    }

    #[tokio::test]
    async fn form_limits_are_enforced_before_the_call() {
        let (editor, session, _) = editor().await;
        session.login(None).await.unwrap();

        let err = editor
            .submit_new(NewsForm {
                title: "Hi".to_string(),
                ..form()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
