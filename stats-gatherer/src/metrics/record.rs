use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;
use std::collections::BTreeMap;
use twitch_stats_helix::{
    HelixStream,
    HelixUser,
    HelixVideo,
};

/// Measurement name of every emitted record.
pub const MEASUREMENT: &str = "twitch_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTags {
    pub display_name: String,
    pub id: String,
    pub login: String,
}

impl From<&HelixUser> for UserTags {
    fn from(user: &HelixUser) -> Self {
        Self {
            display_name: user.display_name.clone(),
            id: user.id.clone(),
            login: user.login.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserFields {
    pub followers: u64,
    pub following: u64,
    pub streams: u64,
    pub streams_total_viewers: u64,
    pub videos: u64,
    pub videos_total_viewers: u64,
}

/// One user's statistics at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRecord {
    pub name: &'static str,
    pub tags: UserTags,
    pub fields: UserFields,
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    pub fn new(tags: UserTags, fields: UserFields, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: MEASUREMENT,
            tags,
            fields,
            timestamp,
        }
    }

    pub fn tag_map(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("display_name", self.tags.display_name.as_str()),
            ("id", self.tags.id.as_str()),
            ("login", self.tags.login.as_str()),
        ])
    }

    pub fn field_map(&self) -> BTreeMap<&'static str, u64> {
        let f = &self.fields;
        BTreeMap::from([
            ("followers", f.followers),
            ("following", f.following),
            ("streams", f.streams),
            ("streams_total_viewers", f.streams_total_viewers),
            ("videos", f.videos),
            ("videos_total_viewers", f.videos_total_viewers),
        ])
    }
}

/// Live streams of a single user and their summed viewers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTotals {
    pub streams: u64,
    pub viewers: u64,
}

impl StreamTotals {
    /// Only streams owned by `user_id` are counted, the batch-wide list holds every user's streams.
    pub fn for_user(user_id: &str, streams: &[HelixStream]) -> Self {
        streams
            .iter()
            .filter(|stream| stream.user_id == user_id)
            .fold(Self::default(), |acc, stream| Self {
                streams: acc.streams + 1,
                viewers: acc.viewers + stream.viewer_count,
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoTotals {
    pub videos: u64,
    pub views: u64,
}

impl From<&[HelixVideo]> for VideoTotals {
    fn from(videos: &[HelixVideo]) -> Self {
        Self {
            videos: videos.len() as u64,
            views: videos.iter().map(|video| video.view_count).sum(),
        }
    }
}
