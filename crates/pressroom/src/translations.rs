//! Translation storage and resolution for news articles.
//!
//! The source locale lives on the `News` row itself; every other locale is
//! a `NewsTranslation` row keyed by (news_id, locale). Resolution prefers a
//! *published* translation and otherwise falls back to the source content,
//! so unfinished drafts never leak to readers.

use std::sync::Arc;

use pressroom_api::{
    ApiError, CreateTranslation, DocId, Locale, News, NewsFilter, NewsTranslation,
    TranslationStatus, SOURCE_LOCALE, SUPPORTED_LOCALES,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::handlers::{as_doc, decode, decode_many, NewsHandlers};
use crate::store::{Doc, Query, ReactiveStore};

/// The content to actually render for one (article, locale) pair after
/// fallback rules are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveContent {
    pub locale: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    /// False when the source content was served instead of a translation.
    pub is_translated: bool,
}

/// An article joined with its translation row (if any) and the resolved
/// effective content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsWithTranslation {
    pub news: News,
    pub translation: Option<NewsTranslation>,
    pub effective: EffectiveContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCoverage {
    pub locale: Locale,
    pub exists: bool,
    pub status: Option<TranslationStatus>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCoverage {
    pub total: usize,
    pub translated: usize,
    /// Whole-number percentage of supported locales with a row.
    pub percent: u32,
    pub locales: Vec<LocaleCoverage>,
    pub missing: Vec<Locale>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsWithCoverage {
    pub news: News,
    pub coverage: TranslationCoverage,
}

#[derive(Clone)]
pub struct TranslationHandlers {
    store: Arc<dyn ReactiveStore>,
    news: NewsHandlers,
}

impl TranslationHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        let news = NewsHandlers::new(store.clone());
        Self { store, news }
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<NewsTranslation>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    /// The translation row for one (news, locale) pair, if present.
    pub async fn get_translation(
        &self,
        news_id: &DocId,
        locale: Locale,
    ) -> Result<Option<NewsTranslation>, ApiError> {
        self.store
            .first(
                Query::table("newsTranslations")
                    .with_index("by_news_id_locale", vec![json!(news_id), json!(locale)]),
            )
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn list_for_news(&self, news_id: &DocId) -> Result<Vec<NewsTranslation>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("newsTranslations")
                    .with_index("by_news_id", vec![json!(news_id)]),
            )
            .await?;
        decode_many(rows)
    }

    /// Resolve the content to render for an article under `locale_tag`.
    ///
    /// The source locale returns the article fields verbatim. Any other
    /// supported locale serves its translation only when that translation is
    /// published; a missing, draft or in-review row falls back to the source
    /// content with `is_translated` false.
    ///
    /// # Errors
    ///
    /// `NotFound` when the article does not exist, `Validation` for an
    /// unsupported locale tag.
    pub async fn resolve(
        &self,
        news_id: &DocId,
        locale_tag: &str,
    ) -> Result<NewsWithTranslation, ApiError> {
        let news = self
            .news
            .get(news_id)
            .await?
            .ok_or_else(|| ApiError::not_found("news", news_id))?;

        if locale_tag == SOURCE_LOCALE {
            let effective = source_content(&news);
            return Ok(NewsWithTranslation {
                news,
                translation: None,
                effective,
            });
        }

        let locale = Locale::parse(locale_tag)?;
        let translation = self.get_translation(news_id, locale).await?;

        let effective = match &translation {
            Some(t) if t.status == TranslationStatus::Published => EffectiveContent {
                locale: locale.as_str().to_string(),
                title: t.title.clone(),
                excerpt: t.excerpt.clone(),
                content: t.body.clone(),
                slug: t.slug.clone(),
                seo_title: t.seo_title.clone(),
                seo_description: t.seo_description.clone(),
                is_translated: true,
            },
            _ => source_content(&news),
        };

        Ok(NewsWithTranslation {
            news,
            translation,
            effective,
        })
    }

    /// List news through the standard filters and resolve each item for
    /// `locale_tag`. Output order matches the underlying news listing.
    pub async fn merge_list(
        &self,
        filter: &NewsFilter,
        locale_tag: &str,
    ) -> Result<Vec<NewsWithTranslation>, ApiError> {
        let items = self.news.list(filter).await?;
        let mut merged = Vec::with_capacity(items.len());
        for news in items {
            merged.push(self.resolve(&news.id, locale_tag).await?);
        }
        Ok(merged)
    }

    /// Per-locale coverage of one article across the supported set.
    pub async fn compute_coverage(&self, news_id: &DocId) -> Result<TranslationCoverage, ApiError> {
        let rows = self.list_for_news(news_id).await?;

        let mut locales = Vec::with_capacity(SUPPORTED_LOCALES.len());
        let mut missing = Vec::new();
        for locale in SUPPORTED_LOCALES {
            match rows.iter().find(|t| t.locale == locale) {
                Some(t) => locales.push(LocaleCoverage {
                    locale,
                    exists: true,
                    status: Some(t.status),
                    updated_at: Some(t.updated_at),
                }),
                None => {
                    locales.push(LocaleCoverage {
                        locale,
                        exists: false,
                        status: None,
                        updated_at: None,
                    });
                    missing.push(locale);
                }
            }
        }

        let total = SUPPORTED_LOCALES.len();
        let translated = total - missing.len();
        Ok(TranslationCoverage {
            total,
            translated,
            percent: (translated * 100 / total) as u32,
            locales,
            missing,
        })
    }

    /// The filtered news listing with coverage attached to each row.
    pub async fn list_with_coverage(
        &self,
        filter: &NewsFilter,
    ) -> Result<Vec<NewsWithCoverage>, ApiError> {
        let items = self.news.list(filter).await?;
        let mut out = Vec::with_capacity(items.len());
        for news in items {
            let coverage = self.compute_coverage(&news.id).await?;
            out.push(NewsWithCoverage { news, coverage });
        }
        Ok(out)
    }

    /// Create or replace the translation for (news, locale).
    ///
    /// On update every content field is replaced wholesale, not merged. A
    /// slug already used by a *different* article's translation in the same
    /// locale is a `Conflict`; reusing the row's own slug is fine.
    ///
    /// # Errors
    ///
    /// `NotFound` when the article does not exist, `Conflict` on a slug
    /// collision within the locale.
    pub async fn upsert(&self, input: CreateTranslation) -> Result<DocId, ApiError> {
        if self.news.get(&input.news_id).await?.is_none() {
            return Err(ApiError::not_found("news", &input.news_id));
        }

        if let Some(slug) = &input.slug {
            let holder = self
                .store
                .first(
                    Query::table("newsTranslations")
                        .with_index("by_locale_slug", vec![json!(input.locale), json!(slug)]),
                )
                .await?;
            if let Some(holder) = holder {
                let holder: NewsTranslation = decode(holder)?;
                if holder.news_id != input.news_id {
                    return Err(ApiError::conflict(format!(
                        "slug \"{slug}\" is already used by another {} translation",
                        input.locale
                    )));
                }
            }
        }

        let now = pressroom_api::now_millis();
        let existing = self.get_translation(&input.news_id, input.locale).await?;

        match existing {
            Some(row) => {
                let mut patch = Doc::new();
                patch.insert("title".to_string(), json!(input.title));
                patch.insert("excerpt".to_string(), json!(input.excerpt));
                patch.insert("body".to_string(), json!(input.body));
                patch.insert("slug".to_string(), json!(input.slug));
                patch.insert("seoTitle".to_string(), json!(input.seo_title));
                patch.insert("seoDescription".to_string(), json!(input.seo_description));
                if let Some(status) = input.status {
                    patch.insert("status".to_string(), json!(status));
                }
                patch.insert("updatedAt".to_string(), json!(now));
                self.store.patch(&row.id, patch).await?;
                Ok(row.id)
            }
            None => {
                self.store
                    .insert(
                        "newsTranslations",
                        as_doc(json!({
                            "newsId": input.news_id,
                            "locale": input.locale,
                            "title": input.title,
                            "excerpt": input.excerpt,
                            "body": input.body,
                            "slug": input.slug,
                            "seoTitle": input.seo_title,
                            "seoDescription": input.seo_description,
                            "status": input.status.unwrap_or(TranslationStatus::Draft),
                            "createdAt": now,
                            "updatedAt": now,
                        })),
                    )
                    .await
            }
        }
    }

    /// Move a translation to a new workflow status. Transitions are
    /// unconstrained; published can go straight back to draft.
    pub async fn set_status(
        &self,
        id: &DocId,
        status: TranslationStatus,
    ) -> Result<(), ApiError> {
        if self.get(id).await?.is_none() {
            return Err(ApiError::not_found("translation", id));
        }

        let mut patch = Doc::new();
        patch.insert("status".to_string(), json!(status));
        patch.insert("updatedAt".to_string(), json!(pressroom_api::now_millis()));
        self.store.patch(id, patch).await
    }

    pub async fn delete(&self, id: &DocId) -> Result<(), ApiError> {
        if self.get(id).await?.is_none() {
            return Err(ApiError::not_found("translation", id));
        }
        self.store.delete(id).await
    }

    /// Create an empty draft row for every supported locale the article does
    /// not yet have, prefilled from the source content. Idempotent: locales
    /// that already have a row are skipped. Returns the ids created.
    pub async fn create_missing(&self, news_id: &DocId) -> Result<Vec<DocId>, ApiError> {
        let news = self
            .news
            .get(news_id)
            .await?
            .ok_or_else(|| ApiError::not_found("news", news_id))?;
        let coverage = self.compute_coverage(news_id).await?;

        let now = pressroom_api::now_millis();
        let mut created = Vec::new();
        for locale in coverage.missing {
            let id = self
                .store
                .insert(
                    "newsTranslations",
                    as_doc(json!({
                        "newsId": news_id,
                        "locale": locale,
                        "title": news.title,
                        "excerpt": news.excerpt,
                        "body": "",
                        "slug": serde_json::Value::Null,
                        "seoTitle": serde_json::Value::Null,
                        "seoDescription": serde_json::Value::Null,
                        "status": TranslationStatus::Draft,
                        "createdAt": now,
                        "updatedAt": now,
                    })),
                )
                .await?;
            created.push(id);
        }

        if !created.is_empty() {
            tracing::info!(news_id = %news_id, count = created.len(), "created missing translation drafts");
        }
        Ok(created)
    }
}

fn source_content(news: &News) -> EffectiveContent {
    EffectiveContent {
        locale: SOURCE_LOCALE.to_string(),
        title: news.title.clone(),
        excerpt: news.excerpt.clone(),
        content: news.content.clone(),
        slug: None,
        seo_title: None,
        seo_description: None,
        is_translated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::CategoryHandlers;
    use crate::store::MemoryStore;
    use pressroom_api::{CreateCategory, CreateNews};

    async fn fixture() -> (TranslationHandlers, NewsHandlers, DocId) {
        let store: Arc<dyn ReactiveStore> = Arc::new(MemoryStore::new());
        let categories = CategoryHandlers::new(store.clone());
        let news = NewsHandlers::new(store.clone());
        let category = categories
            .create(CreateCategory {
                name: "General".to_string(),
                description: None,
                slug: "general".to_string(),
            })
            .await
            .unwrap();
        let news_id = news
            .create(CreateNews {
                title: "A".to_string(),
                content: "Hello".to_string(),
                excerpt: None,
                cover_image: None,
                category_id: category,
                author_id: "user-1".to_string(),
                published: true,
                is_featured: None,
            })
            .await
            .unwrap();
        (TranslationHandlers::new(store), news, news_id)
    }

    fn pt_input(news_id: &DocId) -> CreateTranslation {
        CreateTranslation {
            news_id: news_id.clone(),
            locale: Locale::Pt,
            title: "Olá".to_string(),
            excerpt: None,
            body: "Corpo".to_string(),
            slug: Some("ola".to_string()),
            seo_title: None,
            seo_description: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn draft_translation_falls_back_to_source_content() {
        let (translations, _, news_id) = fixture().await;
        translations.upsert(pt_input(&news_id)).await.unwrap();

        let resolved = translations.resolve(&news_id, "pt").await.unwrap();
        assert!(resolved.translation.is_some());
        assert!(!resolved.effective.is_translated);
        assert_eq!(resolved.effective.title, "A");
        assert_eq!(resolved.effective.locale, "en");
    }

    #[tokio::test]
    async fn published_translation_is_served() {
        let (translations, _, news_id) = fixture().await;
        let id = translations.upsert(pt_input(&news_id)).await.unwrap();
        translations
            .set_status(&id, TranslationStatus::Published)
            .await
            .unwrap();

        let resolved = translations.resolve(&news_id, "pt").await.unwrap();
        assert!(resolved.effective.is_translated);
        assert_eq!(resolved.effective.title, "Olá");
        assert_eq!(resolved.effective.content, "Corpo");
    }

    #[tokio::test]
    async fn source_locale_serves_news_fields_directly() {
        let (translations, _, news_id) = fixture().await;
        let resolved = translations.resolve(&news_id, "en").await.unwrap();
        assert!(resolved.translation.is_none());
        assert_eq!(resolved.effective.title, "A");
        assert_eq!(resolved.effective.content, "Hello");
        assert_eq!(resolved.effective.slug, None);
    }

    #[tokio::test]
    async fn unsupported_locale_is_a_validation_error() {
        let (translations, _, news_id) = fixture().await;
        let err = translations.resolve(&news_id, "de").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn upsert_replaces_rather_than_duplicates() {
        let (translations, _, news_id) = fixture().await;
        let first = translations.upsert(pt_input(&news_id)).await.unwrap();
        let second = translations
            .upsert(CreateTranslation {
                title: "Olá 2".to_string(),
                ..pt_input(&news_id)
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        let rows = translations.list_for_news(&news_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Olá 2");
    }

    #[tokio::test]
    async fn slug_conflict_within_locale_is_rejected_but_self_reuse_is_fine() {
        let (translations, news, news_id) = fixture().await;
        translations.upsert(pt_input(&news_id)).await.unwrap();

        // Same slug on the same row: allowed.
        translations.upsert(pt_input(&news_id)).await.unwrap();

        let other = news
            .create(CreateNews {
                title: "B".to_string(),
                content: "Other body".to_string(),
                excerpt: None,
                cover_image: None,
                category_id: DocId::from("categories:0"),
                author_id: "user-1".to_string(),
                published: false,
                is_featured: None,
            })
            .await
            .unwrap();

        let err = translations.upsert(pt_input(&other)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));

        // Same slug under a different locale does not collide.
        translations
            .upsert(CreateTranslation {
                locale: Locale::Es,
                ..pt_input(&other)
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn coverage_counts_existing_rows() {
        let (translations, _, news_id) = fixture().await;
        translations.upsert(pt_input(&news_id)).await.unwrap();

        let coverage = translations.compute_coverage(&news_id).await.unwrap();
        assert_eq!(coverage.total, 3);
        assert_eq!(coverage.translated, 1);
        assert_eq!(coverage.percent, 33);
        assert_eq!(coverage.missing, vec![Locale::Es, Locale::Fr]);
    }

    #[tokio::test]
    async fn create_missing_is_idempotent() {
        let (translations, _, news_id) = fixture().await;
        translations.upsert(pt_input(&news_id)).await.unwrap();

        let created = translations.create_missing(&news_id).await.unwrap();
        assert_eq!(created.len(), 2);

        let again = translations.create_missing(&news_id).await.unwrap();
        assert!(again.is_empty());

        let drafts = translations.list_for_news(&news_id).await.unwrap();
        assert_eq!(drafts.len(), 3);
        assert!(drafts
            .iter()
            .filter(|t| created.contains(&t.id))
            .all(|t| t.status == TranslationStatus::Draft && t.body.is_empty()));
    }
}
