//! In-memory document store with maintained secondary indexes.
//!
//! HashMap tables guarded by one RwLock, modeled as a stand-in for the
//! hosted reactive store: every committed write notifies table watchers so
//! live queries can re-run and redeliver their full result set. Useful as
//! the development/test backend and as the reference for store semantics.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use pressroom_api::{pressroom_schema, ApiError, DocId, TableSchema};
use tokio::sync::mpsc;

use super::{Doc, DocumentStore, Order, Query, StoreEvents};

pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

struct StoreState {
    tables: HashMap<String, TableState>,
    /// id -> owning table, so patch/delete need only the id
    locations: HashMap<DocId, String>,
    next_id: u64,
    watchers: Vec<TableWatcher>,
}

struct TableState {
    schema: TableSchema,
    docs: HashMap<DocId, Doc>,
    /// Insertion sequence per document; queries order by it
    seq: HashMap<DocId, u64>,
    /// index name -> encoded key -> member ids
    indexes: HashMap<&'static str, HashMap<String, Vec<DocId>>>,
}

struct TableWatcher {
    tables: HashSet<String>,
    tx: mpsc::UnboundedSender<()>,
}

impl MemoryStore {
    /// Create a store with the full pressroom schema.
    pub fn new() -> Self {
        Self::with_schema(pressroom_schema())
    }

    pub fn with_schema(schema: Vec<TableSchema>) -> Self {
        let tables = schema
            .into_iter()
            .map(|table| {
                let indexes = table
                    .indexes
                    .iter()
                    .map(|i| (i.name, HashMap::new()))
                    .collect();
                (
                    table.name.to_string(),
                    TableState {
                        schema: table,
                        docs: HashMap::new(),
                        seq: HashMap::new(),
                        indexes,
                    },
                )
            })
            .collect();

        Self {
            state: Arc::new(RwLock::new(StoreState {
                tables,
                locations: HashMap::new(),
                next_id: 0,
                watchers: Vec::new(),
            })),
        }
    }

    fn encode_key(keys: &[serde_json::Value]) -> String {
        serde_json::to_string(keys).unwrap_or_default()
    }

    fn index_key_for_doc(fields: &[&'static str], doc: &Doc) -> String {
        let keys: Vec<serde_json::Value> = fields
            .iter()
            .map(|f| doc.get(*f).cloned().unwrap_or(serde_json::Value::Null))
            .collect();
        Self::encode_key(&keys)
    }

    fn add_to_indexes(table: &mut TableState, id: &DocId, doc: &Doc) {
        for index in table.schema.indexes.clone() {
            let key = Self::index_key_for_doc(&index.fields, doc);
            table
                .indexes
                .get_mut(index.name)
                .expect("index declared in schema")
                .entry(key)
                .or_default()
                .push(id.clone());
        }
    }

    fn remove_from_indexes(table: &mut TableState, id: &DocId) {
        for buckets in table.indexes.values_mut() {
            for members in buckets.values_mut() {
                members.retain(|member| member != id);
            }
        }
    }

    /// Notify watchers of `table` and prune the ones whose receiver is gone.
    fn notify(state: &mut StoreState, table: &str) {
        state
            .watchers
            .retain(|w| !w.tables.contains(table) || w.tx.send(()).is_ok());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, table_name: &str, mut doc: Doc) -> Result<DocId, ApiError> {
        let mut state = self.state.write().unwrap();
        let seq = state.next_id;
        state.next_id += 1;

        let id = DocId(format!("{table_name}:{seq}"));
        doc.insert(
            "id".to_string(),
            serde_json::Value::String(id.0.clone()),
        );

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| ApiError::internal(format!("unknown table: {table_name}")))?;

        table.seq.insert(id.clone(), seq);
        Self::add_to_indexes(table, &id, &doc);
        table.docs.insert(id.clone(), doc);
        state.locations.insert(id.clone(), table_name.to_string());

        tracing::debug!(table = table_name, id = %id, "inserted document");
        Self::notify(&mut state, table_name);
        Ok(id)
    }

    async fn patch(&self, id: &DocId, partial: Doc) -> Result<(), ApiError> {
        let mut state = self.state.write().unwrap();
        let table_name = state
            .locations
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("document", id))?;

        let table = state.tables.get_mut(&table_name).unwrap();
        let doc = table
            .docs
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("document", id))?;
        for (field, value) in partial {
            if field == "id" {
                continue;
            }
            doc.insert(field, value);
        }

        let updated = doc.clone();
        Self::remove_from_indexes(table, id);
        Self::add_to_indexes(table, id, &updated);

        Self::notify(&mut state, &table_name);
        Ok(())
    }

    async fn delete(&self, id: &DocId) -> Result<(), ApiError> {
        let mut state = self.state.write().unwrap();
        let table_name = state
            .locations
            .remove(id)
            .ok_or_else(|| ApiError::not_found("document", id))?;

        let table = state.tables.get_mut(&table_name).unwrap();
        table.docs.remove(id);
        table.seq.remove(id);
        Self::remove_from_indexes(table, id);

        tracing::debug!(table = %table_name, id = %id, "deleted document");
        Self::notify(&mut state, &table_name);
        Ok(())
    }

    async fn get(&self, id: &DocId) -> Result<Option<Doc>, ApiError> {
        let state = self.state.read().unwrap();
        let Some(table_name) = state.locations.get(id) else {
            return Ok(None);
        };
        Ok(state.tables[table_name].docs.get(id).cloned())
    }

    async fn run(&self, query: Query) -> Result<Vec<Doc>, ApiError> {
        let state = self.state.read().unwrap();
        let table = state
            .tables
            .get(&query.table)
            .ok_or_else(|| ApiError::internal(format!("unknown table: {}", query.table)))?;

        let mut ids: Vec<DocId> = match &query.index {
            Some(lookup) => {
                let index = table.schema.index(&lookup.name).ok_or_else(|| {
                    ApiError::internal(format!(
                        "unknown index {} on table {}",
                        lookup.name, query.table
                    ))
                })?;
                if index.fields.len() != lookup.keys.len() {
                    return Err(ApiError::internal(format!(
                        "index {} expects {} key(s), got {}",
                        lookup.name,
                        index.fields.len(),
                        lookup.keys.len()
                    )));
                }
                table
                    .indexes
                    .get(index.name)
                    .and_then(|buckets| buckets.get(&Self::encode_key(&lookup.keys)))
                    .cloned()
                    .unwrap_or_default()
            }
            None => table.docs.keys().cloned().collect(),
        };

        ids.sort_by_key(|id| table.seq.get(id).copied().unwrap_or(0));
        if query.order == Order::Desc {
            ids.reverse();
        }

        Ok(ids
            .iter()
            .filter_map(|id| table.docs.get(id).cloned())
            .collect())
    }
}

impl StoreEvents for MemoryStore {
    fn invalidations(&self, tables: &[&str]) -> mpsc::UnboundedReceiver<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.write().unwrap();
        state.watchers.push(TableWatcher {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            tx,
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Doc {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_injects_it() {
        let store = MemoryStore::new();
        let id = store
            .insert("games", doc(json!({"name": "Chess", "image": "x.png", "slug": "chess"})))
            .await
            .unwrap();

        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched["id"], json!(id.as_str()));
        assert_eq!(fetched["name"], json!("Chess"));
    }

    #[tokio::test]
    async fn indexed_query_matches_only_exact_keys() {
        let store = MemoryStore::new();
        store
            .insert("categories", doc(json!({"name": "A", "slug": "a", "createdAt": 1, "updatedAt": 1})))
            .await
            .unwrap();
        let b = store
            .insert("categories", doc(json!({"name": "B", "slug": "b", "createdAt": 2, "updatedAt": 2})))
            .await
            .unwrap();

        let hit = store
            .first(Query::table("categories").with_index("by_slug", vec![json!("b")]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit["id"], json!(b.as_str()));

        let miss = store
            .first(Query::table("categories").with_index("by_slug", vec![json!("c")]))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn patch_reindexes_and_preserves_untouched_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert("categories", doc(json!({"name": "A", "slug": "a", "createdAt": 1, "updatedAt": 1})))
            .await
            .unwrap();

        store
            .patch(&id, doc(json!({"slug": "a2"})))
            .await
            .unwrap();

        let updated = store.get(&id).await.unwrap().unwrap();
        assert_eq!(updated["name"], json!("A"));
        assert_eq!(updated["slug"], json!("a2"));

        assert!(store
            .first(Query::table("categories").with_index("by_slug", vec![json!("a")]))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .first(Query::table("categories").with_index("by_slug", vec![json!("a2")]))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn patch_of_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .patch(&DocId::from("news:999"), Doc::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unindexed_query_returns_insertion_order_desc_when_asked() {
        let store = MemoryStore::new();
        let first = store
            .insert("games", doc(json!({"name": "1", "image": "i", "slug": "g1"})))
            .await
            .unwrap();
        let second = store
            .insert("games", doc(json!({"name": "2", "image": "i", "slug": "g2"})))
            .await
            .unwrap();

        let rows = store.run(Query::table("games").order(Order::Desc)).await.unwrap();
        assert_eq!(rows[0]["id"], json!(second.as_str()));
        assert_eq!(rows[1]["id"], json!(first.as_str()));
    }

    #[tokio::test]
    async fn writes_notify_watchers_of_the_touched_table_only() {
        let store = MemoryStore::new();
        let mut news_rx = store.invalidations(&["news"]);
        let mut games_rx = store.invalidations(&["games"]);

        store
            .insert("games", doc(json!({"name": "G", "image": "i", "slug": "g"})))
            .await
            .unwrap();

        assert!(games_rx.try_recv().is_ok());
        assert!(news_rx.try_recv().is_err());
    }
}
