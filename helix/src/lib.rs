//! # Helix client
//!
//! Minimal client for the parts of the Twitch Helix REST API the stats gatherer reads:
//!
//! - **`users`**: bulk lookup of user profiles by id
//! - **`streams`**: live streams filtered by user ids (paginated)
//! - **`users/follows`**: follower and following totals
//! - **`videos`**: a user's video archive (paginated)
//!
//! [`HelixClient`] is the authenticated session. It is created once with [`HelixClient::connect`] and then shared
//! read-only by every concurrent request. Consumers depend on the [`HelixApi`] trait so that the session can be
//! replaced by a stub in tests.

#[macro_use]
extern crate tracing;

mod api;
mod auth;
mod client;
mod error;
mod types;

pub use api::{
    FollowQuery,
    HelixApi,
};
pub use auth::{
    AccessToken,
    TokenKind,
};
pub use client::{
    HelixClient,
    HelixSettings,
};
pub use error::{
    HelixError,
    HelixResult,
};
pub use types::{
    DataResponse,
    FollowTotal,
    HelixStream,
    HelixUser,
    HelixVideo,
    Page,
    Pagination,
};

/// Maximum value of the `first` query parameter, also the bulk lookup limit of `users`.
pub const PAGE_LIMIT: usize = 100;
