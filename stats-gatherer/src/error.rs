use strum::Display;
use twitch_stats_helix::HelixError;

/// Granularity at which a failure stops work without touching its siblings.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorScope {
    /// The whole run, nothing was collected.
    Global,
    /// Every user of one batch was skipped.
    Batch,
    /// A single user was skipped.
    User,
}

/// Step of a batch that failed.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum BatchStage {
    Users,
    Streams,
}

/// Sub-fetch of a user that failed.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum UserStage {
    Followers,
    Following,
    Videos,
}

#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    #[error("page {page} failed: {source}")]
    Page {
        page: usize,
        #[source]
        source: HelixError,
    },

    #[error("cursor still set after {limit} pages")]
    PageLimit { limit: usize },
}

/// A failed call, with or without pagination around it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Helix(#[from] HelixError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error("failed to open helix session: {0}")]
    Auth(#[source] HelixError),

    #[error("batch of {} users (first id {}) failed to fetch {stage}: {source}", ids.len(), ids.first().copied().unwrap_or_default())]
    Batch {
        ids: Vec<u64>,
        stage: BatchStage,
        #[source]
        source: FetchError,
    },

    #[error("user {login} ({id}) failed to fetch {stage}: {source}")]
    User {
        id: String,
        login: String,
        stage: UserStage,
        #[source]
        source: FetchError,
    },
}

impl GatherError {
    pub(crate) fn batch(ids: &[u64], stage: BatchStage, source: impl Into<FetchError>) -> Self {
        GatherError::Batch {
            ids: ids.to_vec(),
            stage,
            source: source.into(),
        }
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            GatherError::Auth(_) => ErrorScope::Global,
            GatherError::Batch { .. } => ErrorScope::Batch,
            GatherError::User { .. } => ErrorScope::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failed_unit() {
        let err = GatherError::batch(
            &[12, 13],
            BatchStage::Streams,
            PaginationError::PageLimit { limit: 3 },
        );
        assert_eq!(err.scope(), ErrorScope::Batch);
        assert_eq!(
            err.to_string(),
            "batch of 2 users (first id 12) failed to fetch streams: cursor still set after 3 pages"
        );

        let err = GatherError::User {
            id: "7".to_string(),
            login: "seven".to_string(),
            stage: UserStage::Followers,
            source: HelixError::Status {
                status: 503,
                message: None,
            }
            .into(),
        };
        assert_eq!(err.scope(), ErrorScope::User);
        assert_eq!(
            err.to_string(),
            "user seven (7) failed to fetch followers: helix responded with 503: no details"
        );
    }
}
