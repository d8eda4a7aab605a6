use std::sync::Arc;

use pressroom_api::{
    ApiError, CreateNews, DocId, News, NewsFilter, UpdateNews, WatchCallbacks, WatchHandle,
};

use crate::client::Client;

#[derive(Clone)]
pub struct NewsRepository {
    client: Arc<Client>,
}

impl NewsRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Live filtered listing; re-delivers whenever the news table changes.
    pub fn watch_list(
        &self,
        filter: NewsFilter,
        callbacks: WatchCallbacks<Vec<News>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news"],
            move || {
                let client = client.clone();
                let filter = filter.clone();
                async move { client.news.list(&filter).await }
            },
            callbacks,
        )
    }

    pub fn watch_one(&self, id: DocId, callbacks: WatchCallbacks<Option<News>>) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news"],
            move || {
                let client = client.clone();
                let id = id.clone();
                async move { client.news.get(&id).await }
            },
            callbacks,
        )
    }

    pub fn watch_by_author(
        &self,
        author_id: String,
        callbacks: WatchCallbacks<Vec<News>>,
    ) -> WatchHandle {
        let client = self.client.clone();
        self.client.watch(
            &["news"],
            move || {
                let client = client.clone();
                let author_id = author_id.clone();
                async move { client.news.get_by_author(&author_id).await }
            },
            callbacks,
        )
    }

    /// One-shot public listing keyed by category slug; reads two tables so
    /// it is not exposed as a watch.
    pub async fn get_by_category_slug(&self, slug: &str) -> Result<Vec<News>, ApiError> {
        self.client.news.get_by_category_slug(slug).await
    }

    pub async fn create(&self, input: CreateNews) -> Result<DocId, ApiError> {
        self.client
            .mutate("news.create", self.client.news.create(input))
            .await
    }

    pub async fn update(&self, id: &DocId, input: UpdateNews) -> Result<(), ApiError> {
        self.client
            .mutate("news.update", self.client.news.update(id, input))
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.client
            .mutate("news.remove", self.client.news.remove(id))
            .await
    }
}
