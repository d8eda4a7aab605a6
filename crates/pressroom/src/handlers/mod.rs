//! Remote CRUD handler sets, one per entity.
//!
//! Handlers are the server-side surface: each method maps to one remote
//! operation against the document store, using the declared indexes for
//! filtered lookups. Reads never fail on absence; updates of missing ids
//! fail fast with `NotFound`.

mod categories;
mod games;
mod news;
mod post_replies;
mod posts;

pub use categories::CategoryHandlers;
pub use games::GameHandlers;
pub use news::NewsHandlers;
pub use post_replies::PostReplyHandlers;
pub use posts::PostHandlers;

use pressroom_api::ApiError;
use serde::de::DeserializeOwned;

use crate::store::Doc;

pub(crate) fn decode<T: DeserializeOwned>(doc: Doc) -> Result<T, ApiError> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| ApiError::internal(format!("malformed document: {e}")))
}

pub(crate) fn decode_many<T: DeserializeOwned>(docs: Vec<Doc>) -> Result<Vec<T>, ApiError> {
    docs.into_iter().map(decode).collect()
}

pub(crate) fn as_doc(value: serde_json::Value) -> Doc {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Doc::new(),
    }
}
