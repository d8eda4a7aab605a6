use std::sync::Arc;

use pressroom_api::{
    ApiError, CreateTranslation, DocId, NewsFilter, TranslationStatus, WatchCallbacks, WatchHandle,
};

use crate::client::Client;
use crate::translations::{NewsWithCoverage, NewsWithTranslation, TranslationCoverage};

#[derive(Clone)]
pub struct TranslationRepository {
    client: Arc<Client>,
}

impl TranslationRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Live resolved content for one article under one locale. Watches both
    /// the article and its translations, since either side changes the
    /// resolution.
    pub fn watch_resolved(
        &self,
        news_id: DocId,
        locale_tag: String,
        callbacks: WatchCallbacks<NewsWithTranslation>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news", "newsTranslations"],
            move || {
                let client = client.clone();
                let news_id = news_id.clone();
                let locale_tag = locale_tag.clone();
                async move { client.translations.resolve(&news_id, &locale_tag).await }
            },
            callbacks,
        )
    }

    /// Live per-article coverage across the filtered news listing.
    pub fn watch_coverage(
        &self,
        filter: NewsFilter,
        callbacks: WatchCallbacks<Vec<NewsWithCoverage>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news", "newsTranslations"],
            move || {
                let client = client.clone();
                let filter = filter.clone();
                async move { client.translations.list_with_coverage(&filter).await }
            },
            callbacks,
        )
    }

    pub fn watch_merged_list(
        &self,
        filter: NewsFilter,
        locale_tag: String,
        callbacks: WatchCallbacks<Vec<NewsWithTranslation>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news", "newsTranslations"],
            move || {
                let client = client.clone();
                let filter = filter.clone();
                let locale_tag = locale_tag.clone();
                async move { client.translations.merge_list(&filter, &locale_tag).await }
            },
            callbacks,
        )
    }

    pub async fn coverage(&self, news_id: &DocId) -> Result<TranslationCoverage, ApiError> {
        self.client.translations.compute_coverage(news_id).await
    }

    pub async fn upsert(&self, input: CreateTranslation) -> Result<DocId, ApiError> {
        self.client
            .mutate("translations.upsert", self.client.translations.upsert(input))
            .await
    }

    pub async fn set_status(
        &self,
        id: &DocId,
        status: TranslationStatus,
    ) -> Result<(), ApiError> {
        self.client
            .mutate(
                "translations.set_status",
                self.client.translations.set_status(id, status),
            )
            .await
    }

    pub async fn delete(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("translations.delete", self.client.translations.delete(id))
            .await
    }

    pub async fn create_missing(&self, news_id: &DocId) -> Result<Vec<DocId>, ApiError> {
        self.client
            .mutate(
                "translations.create_missing",
                self.client.translations.create_missing(news_id),
            )
            .await
    }
}
