//! In-memory [`HelixApi`] used by the collector tests.

use futures::future::{
    BoxFuture,
    FutureExt as _,
};
use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::atomic::{
        AtomicUsize,
        Ordering,
    },
};
use twitch_stats_helix::{
    FollowQuery,
    HelixApi,
    HelixError,
    HelixResult,
    HelixStream,
    HelixUser,
    HelixVideo,
    Page,
};

pub(crate) fn user(id: u64) -> HelixUser {
    HelixUser {
        id: id.to_string(),
        login: format!("user{id}"),
        display_name: format!("User{id}"),
    }
}

fn unavailable() -> HelixError {
    HelixError::Status {
        status: 503,
        message: Some("stubbed failure".to_string()),
    }
}

/// Resolves every id to [`user`], reports 5 followers and 3 followings, no streams and no videos unless configured
/// otherwise.
pub(crate) struct StubApi {
    page_size: usize,
    streams: Vec<HelixStream>,
    videos: HashMap<String, Vec<HelixVideo>>,
    follows: HashMap<String, (u64, u64)>,
    unknown_users: HashSet<u64>,
    failing_lookups: HashSet<u64>,
    failing_followers: HashSet<String>,
    endless_videos: HashSet<String>,
    user_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    video_calls: AtomicUsize,
}

impl StubApi {
    pub(crate) fn new() -> Self {
        Self {
            page_size: 100,
            streams: Vec::new(),
            videos: HashMap::new(),
            follows: HashMap::new(),
            unknown_users: HashSet::new(),
            failing_lookups: HashSet::new(),
            failing_followers: HashSet::new(),
            endless_videos: HashSet::new(),
            user_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            video_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn with_stream(mut self, user_id: u64, viewer_count: u64) -> Self {
        self.streams.push(HelixStream {
            user_id: user_id.to_string(),
            viewer_count,
        });
        self
    }

    pub(crate) fn with_videos(mut self, user_id: u64, videos: impl IntoIterator<Item = HelixVideo>) -> Self {
        self.videos.entry(user_id.to_string()).or_default().extend(videos);
        self
    }

    pub(crate) fn with_follows(mut self, user_id: u64, followers: u64, following: u64) -> Self {
        self.follows.insert(user_id.to_string(), (followers, following));
        self
    }

    /// The id is silently missing from bulk lookups.
    pub(crate) fn with_unknown_user(mut self, id: u64) -> Self {
        self.unknown_users.insert(id);
        self
    }

    /// Any bulk lookup containing the id fails.
    pub(crate) fn failing_lookup(mut self, id: u64) -> Self {
        self.failing_lookups.insert(id);
        self
    }

    pub(crate) fn failing_followers(mut self, id: u64) -> Self {
        self.failing_followers.insert(id.to_string());
        self
    }

    /// Video pages of the user always carry a cursor.
    pub(crate) fn with_endless_videos(mut self, id: u64) -> Self {
        self.endless_videos.insert(id.to_string());
        self
    }

    pub(crate) fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    /// Cursors are the offset of the next page.
    fn page<T: Clone>(&self, items: &[T], after: Option<&str>) -> Page<T> {
        let offset = after.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (offset + self.page_size).min(items.len());
        let data = items.get(offset..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then(|| end.to_string());
        Page::new(data, next.as_deref())
    }
}

impl HelixApi for StubApi {
    fn get_users<'a>(&'a self, ids: &'a [u64]) -> BoxFuture<'a, HelixResult<Vec<HelixUser>>> {
        async move {
            self.user_calls.fetch_add(1, Ordering::SeqCst);
            if ids.iter().any(|id| self.failing_lookups.contains(id)) {
                return Err(unavailable());
            }
            Ok(ids
                .iter()
                .filter(|id| !self.unknown_users.contains(*id))
                .map(|id| user(*id))
                .collect())
        }
        .boxed()
    }

    fn get_streams<'a>(
        &'a self,
        user_ids: &'a [String],
        after: Option<&'a str>,
    ) -> BoxFuture<'a, HelixResult<Page<HelixStream>>> {
        async move {
            self.stream_calls.fetch_add(1, Ordering::SeqCst);
            let live = self
                .streams
                .iter()
                .filter(|stream| user_ids.contains(&stream.user_id))
                .cloned()
                .collect::<Vec<_>>();
            Ok(self.page(&live, after))
        }
        .boxed()
    }

    fn get_follow_total<'a>(&'a self, query: FollowQuery<'a>) -> BoxFuture<'a, HelixResult<u64>> {
        async move {
            let (id, followers) = match query {
                FollowQuery::Followers(id) => (id, true),
                FollowQuery::Following(id) => (id, false),
            };
            if followers && self.failing_followers.contains(id) {
                return Err(unavailable());
            }
            let (to, from) = self.follows.get(id).copied().unwrap_or((5, 3));
            Ok(if followers { to } else { from })
        }
        .boxed()
    }

    fn get_videos<'a>(
        &'a self,
        user_id: &'a str,
        after: Option<&'a str>,
    ) -> BoxFuture<'a, HelixResult<Page<HelixVideo>>> {
        async move {
            self.video_calls.fetch_add(1, Ordering::SeqCst);
            if self.endless_videos.contains(user_id) {
                return Ok(Page::new(vec![HelixVideo { view_count: 1 }], Some("more")));
            }
            let videos = self.videos.get(user_id).map(Vec::as_slice).unwrap_or_default();
            Ok(self.page(videos, after))
        }
        .boxed()
    }
}
