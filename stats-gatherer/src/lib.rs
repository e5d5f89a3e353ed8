//! # Twitch Stats Gatherer
//!
//! Collects per-user statistics from the Twitch Helix API and turns them into one metric record per user and run.
//!
//! ## Architecture
//!
//! - **`collectors`**: the concurrent collection pipeline
//!   - **`Gatherer`**: owns the session and drives a run over all configured users
//!   - batches of up to 100 ids are resolved and gathered concurrently, users within a batch as well
//! - **`metrics`**: the emitted `MetricRecord`, the per-run `GatherReport` and the `Accumulator` sink trait
//! - **`error`**: `GatherError` and the scope (global, batch, user) each failure is confined to
//!
//! A run never fails because of a single batch or user. Every unit of work yields an outcome, the outcomes are
//! partitioned into records and errors, and both are handed to the accumulator. Only a failure to open the API
//! session fails the run itself.
//!
//! ## Fields
//!
//! | field                   | meaning                                          |
//! |-------------------------|--------------------------------------------------|
//! | `followers`             | users following the user                         |
//! | `following`             | users the user follows                           |
//! | `streams`               | live streams owned by the user                   |
//! | `streams_total_viewers` | summed viewer count of those streams             |
//! | `videos`                | videos of the user                               |
//! | `videos_total_viewers`  | summed view count of those videos                |

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod error;
pub mod metrics;

pub use collectors::*;
pub use error::*;
pub use metrics::*;
