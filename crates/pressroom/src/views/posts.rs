use std::sync::Arc;

use pressroom_api::{
    ApiError, CreatePost, CreatePostReply, DocId, Post, PostFilter, PostReply, UpdatePostReply,
};

use super::LiveQuery;
use crate::auth::SessionManager;
use crate::repository::{PostReplyRepository, PostRepository};
use crate::validation::{validate_article, validate_reply};

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Option<DocId>,
    pub published: bool,
}

/// Forum post listing plus validated post creation.
pub struct PostsView {
    repo: PostRepository,
    session: Arc<SessionManager>,
    pub list: LiveQuery<Vec<Post>>,
}

impl PostsView {
    pub fn new(repo: PostRepository, session: Arc<SessionManager>) -> Self {
        Self {
            repo,
            session,
            list: LiveQuery::new(),
        }
    }

    pub fn load(&self, filter: PostFilter) {
        let repo = self.repo.clone();
        self.list
            .load(|callbacks| repo.watch_list(filter, callbacks));
    }

    pub async fn submit(&self, form: PostForm) -> Result<DocId, ApiError> {
        let author = self.session.current_user().ok_or(ApiError::Unauthorized {
            message: "sign in to post".to_string(),
        })?;
        validate_article(&form.title, &form.content, form.excerpt.as_deref())?;

        self.repo
            .create(CreatePost {
                title: form.title,
                content: form.content,
                excerpt: form.excerpt,
                category_id: form.category_id,
                author_id: author.id,
                published: form.published,
            })
            .await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.repo.remove(id).await
    }

    pub fn cleanup(&self) {
        self.list.cleanup();
    }
}

/// Reply thread under one post.
pub struct PostRepliesView {
    repo: PostReplyRepository,
    session: Arc<SessionManager>,
    post_id: DocId,
    pub replies: LiveQuery<Vec<PostReply>>,
}

impl PostRepliesView {
    pub fn new(repo: PostReplyRepository, session: Arc<SessionManager>, post_id: DocId) -> Self {
        Self {
            repo,
            session,
            post_id,
            replies: LiveQuery::new(),
        }
    }

    pub fn load(&self) {
        let repo = self.repo.clone();
        let post_id = self.post_id.clone();
        self.replies
            .load(|callbacks| repo.watch_by_post(post_id, callbacks));
    }

    /// Post a reply, optionally nested under `parent_reply_id`.
    pub async fn reply(
        &self,
        content: String,
        parent_reply_id: Option<DocId>,
    ) -> Result<DocId, ApiError> {
        let author = self.session.current_user().ok_or(ApiError::Unauthorized {
            message: "sign in to reply".to_string(),
        })?;
        validate_reply(&content)?;

        self.repo
            .create(CreatePostReply {
                post_id: self.post_id.clone(),
                author_id: author.id,
                content,
                parent_reply_id,
            })
            .await
    }

    pub async fn edit(&self, id: &DocId, content: String) -> Result<(), ApiError> {
        validate_reply(&content)?;
        self.repo.update(id, UpdatePostReply { content }).await
    }

    pub async fn remove(&self, id: &DocId) -> Result<(), ApiError> {
        self.repo.remove(id).await
    }

    pub fn cleanup(&self) {
        self.replies.cleanup();
    }
}
