use pressroom_api::{
    ApiError, CreateTranslation, DocId, Locale, NewsFilter, TranslationStatus,
};

use super::LiveQuery;
use crate::repository::TranslationRepository;
use crate::translations::{NewsWithCoverage, NewsWithTranslation};
use crate::validation::validate_slug;

/// Form state for one (article, locale) translation.
#[derive(Debug, Clone)]
pub struct TranslationForm {
    pub locale: Locale,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// Translation workbench: coverage dashboard plus the per-locale editor.
pub struct TranslationEditor {
    repo: TranslationRepository,
    /// Articles with coverage, for the dashboard table.
    pub coverage: LiveQuery<Vec<NewsWithCoverage>>,
    /// Resolved content of the article/locale currently open.
    pub resolved: LiveQuery<NewsWithTranslation>,
}

impl TranslationEditor {
    pub fn new(repo: TranslationRepository) -> Self {
        Self {
            repo,
            coverage: LiveQuery::new(),
            resolved: LiveQuery::new(),
        }
    }

    pub fn load_dashboard(&self, filter: NewsFilter) {
        let repo = self.repo.clone();
        self.coverage
            .load(|callbacks| repo.watch_coverage(filter, callbacks));
    }

    pub fn open(&self, news_id: DocId, locale_tag: String) {
        let repo = self.repo.clone();
        self.resolved
            .load(|callbacks| repo.watch_resolved(news_id, locale_tag, callbacks));
    }

    /// Save the form as the translation for its locale, creating or
    /// replacing as needed. The slug is validated locally; uniqueness
    /// within the locale is the handler's call.
    pub async fn save(&self, news_id: &DocId, form: TranslationForm) -> Result<DocId, ApiError> {
        if form.title.trim().is_empty() {
            return Err(ApiError::validation("a translated title is required"));
        }
        if let Some(slug) = &form.slug {
            validate_slug(slug)?;
        }

        self.repo
            .upsert(CreateTranslation {
                news_id: news_id.clone(),
                locale: form.locale,
                title: form.title,
                excerpt: form.excerpt,
                body: form.body,
                slug: form.slug,
                seo_title: form.seo_title,
                seo_description: form.seo_description,
                status: None,
            })
            .await
    }

    pub async fn set_status(
        &self,
        id: &DocId,
        status: TranslationStatus,
    ) -> Result<(), ApiError> {
        self.repo.set_status(id, status).await
    }

    pub async fn delete(&self, id: &DocId) -> Result<(), ApiError> {
        self.repo.delete(id).await
    }

    /// Scaffold draft rows for every missing locale of one article.
    pub async fn scaffold_missing(&self, news_id: &DocId) -> Result<Vec<DocId>, ApiError> {
        self.repo.create_missing(news_id).await
    }

    pub fn cleanup(&self) {
        self.coverage.cleanup();
        self.resolved.cleanup();
    }
}
