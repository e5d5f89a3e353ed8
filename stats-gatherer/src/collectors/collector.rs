use crate::{
    error::GatherError,
    metrics::{
        Accumulator,
        GatherSummary,
    },
};
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for sources that are gathered on a schedule
pub trait Collector: Send {
    /// Run one collection, handing every record and error to `acc`.
    ///
    /// Only a failure that prevents any collection is returned, everything else goes to the accumulator.
    fn gather<'a>(
        &'a mut self,
        acc: &'a dyn Accumulator,
    ) -> Pin<Box<dyn Future<Output = Result<GatherSummary, GatherError>> + Send + 'a>>;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
