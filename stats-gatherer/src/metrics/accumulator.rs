use crate::{
    error::GatherError,
    metrics::MetricRecord,
};
use std::sync::{
    Mutex,
    PoisonError,
};

/// Receives the results of a collection run. Records and errors arrive in no particular order.
pub trait Accumulator: Send + Sync {
    fn add_record(&self, record: MetricRecord);

    fn add_error(&self, error: GatherError);

    /// Called once after every record and error of a run was handed over.
    fn flush(&self) {}
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    records: Mutex<Vec<MetricRecord>>,
    errors: Mutex<Vec<GatherError>>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drains the collected errors.
    pub fn take_errors(&self) -> Vec<GatherError> {
        std::mem::take(&mut *self.errors.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_record(&self, record: MetricRecord) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(record);
    }

    fn add_error(&self, error: GatherError) {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).push(error);
    }
}
