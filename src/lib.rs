#[macro_use]
extern crate tracing;

mod app;
mod logging;
pub mod sinks;

pub use app::App;
pub use logging::{
    init_errors,
    init_logging,
};
pub use twitch_stats_config::Args;
