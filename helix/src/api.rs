use crate::{
    HelixResult,
    HelixStream,
    HelixUser,
    HelixVideo,
    Page,
};
use futures::future::BoxFuture;

/// Which side of the follow relation to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowQuery<'a> {
    /// Users following the given user.
    Followers(&'a str),
    /// Users the given user follows.
    Following(&'a str),
}

impl<'a> FollowQuery<'a> {
    pub(crate) fn query_param(&self) -> (&'static str, &'a str) {
        match self {
            FollowQuery::Followers(id) => ("to_id", *id),
            FollowQuery::Following(id) => ("from_id", *id),
        }
    }
}

/// The calls the gatherer issues against an authenticated session.
///
/// Every method is an independent request, implementations must be safe to call concurrently through a shared
/// reference.
pub trait HelixApi: Send + Sync {
    /// Bulk lookup, at most [`crate::PAGE_LIMIT`] ids. Not paginated.
    fn get_users<'a>(&'a self, ids: &'a [u64]) -> BoxFuture<'a, HelixResult<Vec<HelixUser>>>;

    /// One page of live streams owned by any of `user_ids`.
    fn get_streams<'a>(
        &'a self,
        user_ids: &'a [String],
        after: Option<&'a str>,
    ) -> BoxFuture<'a, HelixResult<Page<HelixStream>>>;

    /// Total of a follow relation.
    fn get_follow_total<'a>(&'a self, query: FollowQuery<'a>) -> BoxFuture<'a, HelixResult<u64>>;

    /// One page of the videos of `user_id`.
    fn get_videos<'a>(&'a self, user_id: &'a str, after: Option<&'a str>)
        -> BoxFuture<'a, HelixResult<Page<HelixVideo>>>;
}
