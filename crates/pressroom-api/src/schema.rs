//! Declarative table definitions with their secondary indexes.
//!
//! The store consults these to know which equality indexes to maintain.
//! Index fields are named in wire (camelCase) form because index keys are
//! extracted from serialized documents.

/// Schema for a single table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub indexes: Vec<IndexSchema>,
}

/// A named equality index over one or more document fields.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub name: &'static str,
    pub fields: Vec<&'static str>,
}

impl IndexSchema {
    pub fn new(name: &'static str, fields: &[&'static str]) -> Self {
        Self {
            name,
            fields: fields.to_vec(),
        }
    }
}

impl TableSchema {
    pub fn new(name: &'static str, indexes: Vec<IndexSchema>) -> Self {
        Self { name, indexes }
    }

    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

/// The full pressroom schema: categories, news, news translations, posts,
/// post replies, games.
pub fn pressroom_schema() -> Vec<TableSchema> {
    vec![
        TableSchema::new("categories", vec![IndexSchema::new("by_slug", &["slug"])]),
        TableSchema::new(
            "news",
            vec![
                IndexSchema::new("by_category", &["categoryId"]),
                IndexSchema::new("by_author", &["authorId"]),
                IndexSchema::new("by_published", &["published"]),
            ],
        ),
        TableSchema::new(
            "newsTranslations",
            vec![
                IndexSchema::new("by_news_id", &["newsId"]),
                IndexSchema::new("by_locale", &["locale"]),
                // Composite index backing the one-row-per-(news, locale) rule
                IndexSchema::new("by_news_id_locale", &["newsId", "locale"]),
                // For slug uniqueness checks per locale
                IndexSchema::new("by_locale_slug", &["locale", "slug"]),
            ],
        ),
        TableSchema::new(
            "post",
            vec![
                IndexSchema::new("by_category", &["categoryId"]),
                IndexSchema::new("by_author", &["authorId"]),
                IndexSchema::new("by_published", &["published"]),
            ],
        ),
        TableSchema::new(
            "post_reply",
            vec![
                IndexSchema::new("by_post", &["postId"]),
                IndexSchema::new("by_author", &["authorId"]),
                IndexSchema::new("by_parent", &["parentReplyId"]),
            ],
        ),
        TableSchema::new("games", vec![IndexSchema::new("by_slug", &["slug"])]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_all_tables() {
        let schema = pressroom_schema();
        let names: Vec<_> = schema.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "categories",
                "news",
                "newsTranslations",
                "post",
                "post_reply",
                "games"
            ]
        );
    }

    #[test]
    fn translation_indexes_cover_upsert_paths() {
        let schema = pressroom_schema();
        let table = schema.iter().find(|t| t.name == "newsTranslations").unwrap();
        let composite = table.index("by_news_id_locale").unwrap();
        assert_eq!(composite.fields, vec!["newsId", "locale"]);
        assert!(table.index("by_locale_slug").is_some());
    }
}
