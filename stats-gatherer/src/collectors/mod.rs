//! # Collectors Module
//!
//! The collection pipeline, leaves first:
//!
//! - **`paginate`**: follows a cursor until the API reports no further pages
//! - **`split_batches`**: chunks the configured ids to the bulk lookup limit
//! - **`resolve_users`**: one bulk lookup per batch
//! - **`fetch_streams`**: the live streams of a whole batch, paginated
//! - **`gather_user_stats`**: follower/following totals and videos of one user, aggregated into a record
//! - **`Gatherer`**: splits, fans out over batches and users, and collects every outcome
//!
//! Failures stay inside the unit that produced them: a failed batch skips its users, a failed user skips only itself.

pub mod batch;
pub mod collector;
pub mod orchestrator;
pub mod paginator;
pub mod streams;
pub mod user_stats;
pub mod users;

#[cfg(test)]
pub(crate) mod stub;

// Re-export the main types for easy access
pub use batch::split_batches;
pub use collector::Collector;
pub use orchestrator::{
    collect_outcomes,
    Connect,
    GatherSettings,
    Gatherer,
    SharedApi,
};
pub use paginator::paginate;
pub use streams::fetch_streams;
pub use user_stats::gather_user_stats;
pub use users::resolve_users;
