//! Document store contract and the in-memory reactive implementation.
//!
//! The store exposes insert/patch/delete plus equality-indexed queries with
//! ascending/descending insertion order. Backends that can signal writes
//! additionally implement [`StoreEvents`], which live queries use to know
//! when to re-run; [`ReactiveStore`] combines both.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use pressroom_api::{ApiError, DocId};
use tokio::sync::mpsc;

/// A stored document: a flat map of wire-format (camelCase) fields. The
/// store injects the assigned `id` field on insert and on every read.
pub type Doc = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// An equality query against one table.
///
/// With an index, all of the index's fields must be keyed; without one, the
/// whole table is returned in the requested insertion order.
#[derive(Debug, Clone)]
pub struct Query {
    pub table: String,
    pub index: Option<IndexLookup>,
    pub order: Order,
}

#[derive(Debug, Clone)]
pub struct IndexLookup {
    pub name: String,
    pub keys: Vec<serde_json::Value>,
}

impl Query {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            index: None,
            order: Order::Asc,
        }
    }

    pub fn with_index(mut self, name: impl Into<String>, keys: Vec<serde_json::Value>) -> Self {
        self.index = Some(IndexLookup {
            name: name.into(),
            keys,
        });
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

/// The document store contract consumed by the CRUD handlers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning its assigned id.
    async fn insert(&self, table: &str, doc: Doc) -> Result<DocId, ApiError>;

    /// Apply the provided fields to an existing document. Fields absent
    /// from `partial` are left untouched; a `null` value overwrites.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` if the id does not resolve.
    async fn patch(&self, id: &DocId, partial: Doc) -> Result<(), ApiError>;

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` if the id does not resolve.
    async fn delete(&self, id: &DocId) -> Result<(), ApiError>;

    /// Fetch a document by id. Absence is not an error.
    async fn get(&self, id: &DocId) -> Result<Option<Doc>, ApiError>;

    /// Run an equality query, returning all matches.
    async fn run(&self, query: Query) -> Result<Vec<Doc>, ApiError>;

    /// Run a query and keep only the first match.
    async fn first(&self, query: Query) -> Result<Option<Doc>, ApiError> {
        Ok(self.run(query).await?.into_iter().next())
    }
}

/// Write signaling for live queries.
///
/// The receiver gets one message per committed write touching any of the
/// subscribed tables. Receivers that fall away are pruned on the next
/// notification.
pub trait StoreEvents: Send + Sync {
    fn invalidations(&self, tables: &[&str]) -> mpsc::UnboundedReceiver<()>;
}

/// A store that both serves queries and signals writes. The transport
/// client requires this combination.
pub trait ReactiveStore: DocumentStore + StoreEvents {}

impl<T> ReactiveStore for T where T: DocumentStore + StoreEvents {}
