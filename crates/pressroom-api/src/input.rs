//! Input and filter structs for the remote operations.
//!
//! Each optional-filter bag of the original API surface is an explicit
//! struct with named optional fields; absence always means "no filter" or
//! "leave unchanged".

use serde::{Deserialize, Serialize};

use crate::entity::{DocId, TranslationStatus};
use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

/// Filters for news/post listings. When both are set, the category index is
/// consulted first and the published flag is applied in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsFilter {
    pub published: Option<bool>,
    pub category_id: Option<DocId>,
}

pub type PostFilter = NewsFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNews {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: DocId,
    pub author_id: String,
    pub published: bool,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNews {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<DocId>,
    pub published: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Option<DocId>,
    pub author_id: String,
    pub published: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<DocId>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostReply {
    pub post_id: DocId,
    pub author_id: String,
    pub content: String,
    pub parent_reply_id: Option<DocId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePostReply {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGame {
    pub name: String,
    pub image: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGame {
    pub name: Option<String>,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Full field set for a translation upsert. Provided fields replace the
/// existing row wholesale; `status` defaults to draft on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTranslation {
    pub news_id: DocId,
    pub locale: Locale,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub status: Option<TranslationStatus>,
}
