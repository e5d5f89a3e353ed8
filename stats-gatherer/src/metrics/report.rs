use crate::{
    error::{
        ErrorScope,
        GatherError,
    },
    metrics::{
        Accumulator,
        MetricRecord,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;

/// Result of one unit of work: a record for a user, or the failure of a user or batch.
pub type Outcome = Result<MetricRecord, GatherError>;

/// Everything one collection run produced, split into records and errors.
#[derive(Debug)]
pub struct GatherReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub batches: usize,
    pub records: Vec<MetricRecord>,
    pub errors: Vec<GatherError>,
}

impl GatherReport {
    pub fn from_outcomes(started_at: DateTime<Utc>, batches: usize, outcomes: Vec<Outcome>) -> Self {
        let (records, errors): (Vec<_>, Vec<_>) = outcomes.into_iter().partition(Result::is_ok);
        Self {
            started_at,
            finished_at: Utc::now(),
            batches,
            records: records.into_iter().filter_map(Result::ok).collect(),
            errors: errors.into_iter().filter_map(Result::err).collect(),
        }
    }

    pub fn summary(&self) -> GatherSummary {
        let count = |scope| self.errors.iter().filter(|e| e.scope() == scope).count();
        GatherSummary {
            started_at: self.started_at,
            duration_ms: (self.finished_at - self.started_at).num_milliseconds().max(0),
            batches: self.batches,
            records: self.records.len(),
            batch_errors: count(ErrorScope::Batch),
            user_errors: count(ErrorScope::User),
        }
    }

    /// Hands every record and error to the accumulator and flushes it.
    pub fn deliver(self, acc: &dyn Accumulator) -> GatherSummary {
        let summary = self.summary();
        for record in self.records {
            acc.add_record(record);
        }
        for error in self.errors {
            acc.add_error(error);
        }
        acc.flush();
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GatherSummary {
    pub started_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub batches: usize,
    pub records: usize,
    pub batch_errors: usize,
    pub user_errors: usize,
}

impl GatherSummary {
    pub fn errors(&self) -> usize {
        self.batch_errors + self.user_errors
    }
}
