//! pressroom: a reactive data layer for a content-management admin panel.
//!
//! Categories, news articles with multi-locale translations, forum posts
//! and replies, and games live in a document store with declared secondary
//! indexes. Server-side logic is a set of CRUD handlers plus a translation
//! resolver; the client side is a transport client, per-entity repositories,
//! and live-query views that mirror the latest snapshot of each remote
//! query. An auth session manager feeds identity-provider tokens into the
//! transport.

pub mod auth;
pub mod client;
pub mod config;
pub mod handlers;
pub mod media;
pub mod repository;
pub mod store;
pub mod translations;
pub mod validation;
pub mod views;

pub use client::Client;
pub use store::{DocumentStore, MemoryStore, Order, Query, ReactiveStore};

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info"),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
