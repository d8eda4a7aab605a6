//! Persisted entity types.
//!
//! Field names serialize in camelCase because that is the wire format the
//! document store persists; the Rust side uses snake_case throughout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locale::Locale;

/// Opaque document id assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct DocId(pub String);

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        DocId(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        DocId(s)
    }
}

/// A content category. Slug is used as a lookup key; uniqueness is intended
/// but not enforced by the handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A news article in the source locale.
///
/// `published_at` is stamped exactly once, the first time `published`
/// transitions to true; unpublishing never clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: DocId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub category_id: DocId,
    /// External identity-provider user id; no referential check is made.
    pub author_id: String,
    pub published: bool,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Workflow status of a translation row. Transitions are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    Draft,
    Review,
    Published,
}

/// A localized rendition of a news article. At most one row exists per
/// (news_id, locale) pair; upsert enforces this by lookup, not by a
/// storage-level unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsTranslation {
    pub id: DocId,
    pub news_id: DocId,
    pub locale: Locale,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub body: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    pub status: TranslationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A forum-style post. Mirrors `News` minus translations, featuring and
/// cover image; category is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: DocId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category_id: Option<DocId>,
    pub author_id: String,
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A reply to a post, optionally nested under another reply of the same
/// post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReply {
    pub id: DocId,
    pub post_id: DocId,
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub parent_reply_id: Option<DocId>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A game entry; same slug-lookup pattern as `Category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: DocId,
    pub name: String,
    pub image: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Derived user identity, reconstructed from identity-provider token claims
/// on each auth refresh. Never persisted by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_serializes_in_camel_case() {
        let news = News {
            id: DocId::from("news:1"),
            title: "A".to_string(),
            content: "Hello".to_string(),
            excerpt: None,
            cover_image: None,
            category_id: DocId::from("categories:1"),
            author_id: "user-1".to_string(),
            published: true,
            is_featured: Some(true),
            published_at: Some(1000),
            created_at: 1000,
            updated_at: 1000,
        };

        let json = serde_json::to_value(&news).unwrap();
        assert_eq!(json["categoryId"], "categories:1");
        assert_eq!(json["publishedAt"], 1000);
        assert_eq!(json["isFeatured"], true);

        let back: News = serde_json::from_value(json).unwrap();
        assert_eq!(back, news);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = serde_json::json!({
            "id": "post_reply:1",
            "postId": "post:1",
            "authorId": "user-1",
            "content": "hi",
            "createdAt": 1,
            "updatedAt": 1,
        });
        let reply: PostReply = serde_json::from_value(json).unwrap();
        assert_eq!(reply.parent_reply_id, None);
    }

    #[test]
    fn translation_status_uses_lowercase_tags() {
        assert_eq!(
            serde_json::to_string(&TranslationStatus::Review).unwrap(),
            "\"review\""
        );
    }
}
