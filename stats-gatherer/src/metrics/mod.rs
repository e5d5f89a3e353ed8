pub mod accumulator;
pub mod record;
pub mod report;

// Re-export the main types for easy access
pub use accumulator::*;
pub use record::*;
pub use report::*;
