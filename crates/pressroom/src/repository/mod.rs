//! Per-entity repositories: the client-side API surface.
//!
//! A repository is a thin adapter over the transport client. Reads are
//! exposed as live queries (`watch_*`) so consuming views stay current;
//! mutations are plain async calls routed through [`crate::Client::mutate`]
//! for uniform failure logging. Repositories hold no state and add no
//! caching or retry of their own.

mod categories;
mod games;
mod news;
mod post_replies;
mod posts;
mod translations;

pub use categories::CategoryRepository;
pub use games::GameRepository;
pub use news::NewsRepository;
pub use post_replies::PostReplyRepository;
pub use posts::PostRepository;
pub use translations::TranslationRepository;
