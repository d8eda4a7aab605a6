use std::sync::Arc;

use pressroom_api::{ApiError, CreateNews, DocId, News, NewsFilter, UpdateNews};
use serde_json::json;

use super::{as_doc, decode, decode_many};
use crate::store::{Doc, Order, Query, ReactiveStore};

#[derive(Clone)]
pub struct NewsHandlers {
    store: Arc<dyn ReactiveStore>,
}

impl NewsHandlers {
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// List news with optional filters.
    ///
    /// Filter precedence: with a category filter, fetch via the category
    /// index and apply the published flag in memory; with only a published
    /// filter, use the published index; with none, return everything in
    /// reverse-insertion order. Both filter-combination paths must produce
    /// identical result sets for the same data.
    pub async fn list(&self, filter: &NewsFilter) -> Result<Vec<News>, ApiError> {
        if let Some(category_id) = &filter.category_id {
            let rows = self
                .store
                .run(Query::table("news").with_index("by_category", vec![json!(category_id)]))
                .await?;
            let mut items: Vec<News> = decode_many(rows)?;
            if let Some(published) = filter.published {
                items.retain(|n| n.published == published);
            }
            return Ok(items);
        }

        if let Some(published) = filter.published {
            let rows = self
                .store
                .run(Query::table("news").with_index("by_published", vec![json!(published)]))
                .await?;
            return decode_many(rows);
        }

        let rows = self
            .store
            .run(Query::table("news").order(Order::Desc))
            .await?;
        decode_many(rows)
    }

    pub async fn get(&self, id: &DocId) -> Result<Option<News>, ApiError> {
        self.store.get(id).await?.map(decode).transpose()
    }

    /// News by author, most recent first.
    pub async fn get_by_author(&self, author_id: &str) -> Result<Vec<News>, ApiError> {
        let rows = self
            .store
            .run(
                Query::table("news")
                    .with_index("by_author", vec![json!(author_id)])
                    .order(Order::Desc),
            )
            .await?;
        decode_many(rows)
    }

    /// Published news for a category addressed by slug, newest first by
    /// publish date (falling back to creation date). An unknown slug yields
    /// an empty list.
    pub async fn get_by_category_slug(&self, category_slug: &str) -> Result<Vec<News>, ApiError> {
        let category = self
            .store
            .first(Query::table("categories").with_index("by_slug", vec![json!(category_slug)]))
            .await?;
        let Some(category) = category else {
            return Ok(Vec::new());
        };

        let rows = self
            .store
            .run(Query::table("news").with_index("by_category", vec![category["id"].clone()]))
            .await?;
        let mut items: Vec<News> = decode_many(rows)?;
        items.retain(|n| n.published);
        items.sort_by_key(|n| std::cmp::Reverse(n.published_at.unwrap_or(n.created_at)));
        Ok(items)
    }

    /// Create a news article. When `published` is already true the publish
    /// timestamp is stamped with the creation time.
    pub async fn create(&self, input: CreateNews) -> Result<DocId, ApiError> {
        let now = pressroom_api::now_millis();
        self.store
            .insert(
                "news",
                as_doc(json!({
                    "title": input.title,
                    "content": input.content,
                    "excerpt": input.excerpt,
                    "coverImage": input.cover_image,
                    "categoryId": input.category_id,
                    "authorId": input.author_id,
                    "published": input.published,
                    "isFeatured": input.is_featured,
                    "publishedAt": input.published.then_some(now),
                    "createdAt": now,
                    "updatedAt": now,
                })),
            )
            .await
    }

    /// Apply a partial update. `published_at` is stamped exactly once, on
    /// the first transition to `published=true`; unpublishing never clears
    /// it.
    pub async fn update(&self, id: &DocId, input: UpdateNews) -> Result<(), ApiError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("news", id))?;

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
        if let Some(cover_image) = input.cover_image {
            patch.insert("coverImage".to_string(), json!(cover_image));
        }
        if let Some(category_id) = input.category_id {
            patch.insert("categoryId".to_string(), json!(category_id));
        }
        if let Some(is_featured) = input.is_featured {
            patch.insert("isFeatured".to_string(), json!(is_featured));
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

    /// Delete unconditionally; translations referencing this article are
    /// left untouched.
    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::CategoryHandlers;
    use crate::store::MemoryStore;
    use pressroom_api::CreateCategory;

    async fn fixture() -> (NewsHandlers, DocId) {
        let store: Arc<dyn ReactiveStore> = Arc::new(MemoryStore::new());
        let categories = CategoryHandlers::new(store.clone());
        let category_id = categories
            .create(CreateCategory {
                name: "General".to_string(),
                description: None,
                slug: "general".to_string(),
            })
            .await
            .unwrap();
        (NewsHandlers::new(store), category_id)
    }

    fn draft(category_id: &DocId, title: &str, published: bool) -> CreateNews {
        CreateNews {
            title: title.to_string(),
            content: "Hello world, long enough.".to_string(),
            excerpt: None,
            cover_image: None,
            category_id: category_id.clone(),
            author_id: "user-1".to_string(),
            published,
            is_featured: None,
        }
    }

    #[tokio::test]
    async fn published_at_is_stamped_once_and_never_cleared() {
        let (news, category) = fixture().await;
        let id = news.create(draft(&category, "A", false)).await.unwrap();
        assert_eq!(news.get(&id).await.unwrap().unwrap().published_at, None);

        news.update(
            &id,
            UpdateNews {
                published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stamped = news.get(&id).await.unwrap().unwrap().published_at.unwrap();

        // Unpublish: flag drops, stamp stays.
        news.update(
            &id,
            UpdateNews {
                published: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let after = news.get(&id).await.unwrap().unwrap();
        assert!(!after.published);
        assert_eq!(after.published_at, Some(stamped));

        // Republish: stamp unchanged.
        news.update(
            &id,
            UpdateNews {
                published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            news.get(&id).await.unwrap().unwrap().published_at,
            Some(stamped)
        );
    }

    #[tokio::test]
    async fn create_with_published_true_stamps_immediately() {
        let (news, category) = fixture().await;
        let id = news.create(draft(&category, "A", true)).await.unwrap();
        let row = news.get(&id).await.unwrap().unwrap();
        assert_eq!(row.published_at, Some(row.created_at));
    }

    #[tokio::test]
    async fn combined_filters_agree_with_single_filters() {
        let (news, category) = fixture().await;
        news.create(draft(&category, "pub", true)).await.unwrap();
        news.create(draft(&category, "draft", false)).await.unwrap();

        let both = news
            .list(&NewsFilter {
                published: Some(true),
                category_id: Some(category.clone()),
            })
            .await
            .unwrap();
        let published_only = news
            .list(&NewsFilter {
                published: Some(true),
                category_id: None,
            })
            .await
            .unwrap();

        let mut both_ids: Vec<_> = both.iter().map(|n| n.id.clone()).collect();
        let mut published_ids: Vec<_> = published_only.iter().map(|n| n.id.clone()).collect();
        both_ids.sort();
        published_ids.sort();
        assert_eq!(both_ids, published_ids);
        assert!(both.iter().all(|n| n.published && n.category_id == category));
    }

    #[tokio::test]
    async fn unfiltered_list_is_reverse_insertion_order() {
        let (news, category) = fixture().await;
        news.create(draft(&category, "first", false)).await.unwrap();
        news.create(draft(&category, "second", false)).await.unwrap();

        let all = news.list(&NewsFilter::default()).await.unwrap();
        assert_eq!(all[0].title, "second");
        assert_eq!(all[1].title, "first");
    }

    #[tokio::test]
    async fn category_slug_listing_only_returns_published() {
        let (news, category) = fixture().await;
        news.create(draft(&category, "pub", true)).await.unwrap();
        news.create(draft(&category, "draft", false)).await.unwrap();

        let listed = news.get_by_category_slug("general").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "pub");

        assert!(news.get_by_category_slug("nope").await.unwrap().is_empty());
    }
}
