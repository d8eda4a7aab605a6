//! Shared types for the pressroom content-management data layer.
//!
//! This crate holds everything both sides of the transport boundary need:
//! entity structs, input/filter structs, the error taxonomy, the supported
//! locale set, table schema metadata, and the watch/subscription types used
//! by live queries.

pub mod entity;
pub mod error;
pub mod input;
pub mod locale;
pub mod schema;
pub mod watch;

pub use entity::{
    Category, DocId, Game, News, NewsTranslation, Post, PostReply, TranslationStatus, User,
};
pub use error::ApiError;
pub use input::{
    CreateCategory, CreateGame, CreateNews, CreatePost, CreatePostReply, CreateTranslation,
    NewsFilter, PostFilter, UpdateCategory, UpdateGame, UpdateNews, UpdatePost, UpdatePostReply,
};
pub use locale::{Locale, SOURCE_LOCALE, SUPPORTED_LOCALES};
pub use schema::{pressroom_schema, IndexSchema, TableSchema};
pub use watch::{WatchCallbacks, WatchHandle};

/// Current Unix timestamp in milliseconds.
///
/// All persisted timestamps (`created_at`, `updated_at`, `published_at`)
/// use this representation.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
