use crate::{
    collectors::paginate,
    error::{
        FetchError,
        GatherError,
        UserStage,
    },
    metrics::{
        MetricRecord,
        Outcome,
        StreamTotals,
        UserFields,
        VideoTotals,
    },
};
use chrono::Utc;
use twitch_stats_helix::{
    FollowQuery,
    HelixApi,
    HelixStream,
    HelixUser,
};

/// Builds the record of one user: follower and following totals plus the full video list, fetched concurrently,
/// combined with the user's share of the batch's live streams.
///
/// Any failing sub-fetch fails this user only. All fields share the timestamp taken before the first request.
#[instrument(level = "debug", skip_all, fields(user_id = %user.id, login = %user.login))]
pub async fn gather_user_stats(
    api: &dyn HelixApi,
    user: &HelixUser,
    streams: &[HelixStream],
    max_pages: Option<usize>,
) -> Outcome {
    let now = Utc::now();
    let id = user.id.as_str();

    let followers = async {
        api.get_follow_total(FollowQuery::Followers(id))
            .await
            .map_err(|e| (UserStage::Followers, FetchError::from(e)))
    };
    let following = async {
        api.get_follow_total(FollowQuery::Following(id))
            .await
            .map_err(|e| (UserStage::Following, FetchError::from(e)))
    };
    let videos = async {
        paginate(max_pages, move |cursor| async move {
            api.get_videos(id, cursor.as_deref()).await
        })
        .await
        .map_err(|e| (UserStage::Videos, FetchError::from(e)))
    };

    let (followers, following, videos) = match futures::try_join!(followers, following, videos) {
        Ok(results) => results,
        Err((stage, source)) => {
            debug!(%stage, error = %source, "user aggregation failed");
            return Err(GatherError::User {
                id: user.id.clone(),
                login: user.login.clone(),
                stage,
                source,
            });
        }
    };

    let streams = StreamTotals::for_user(id, streams);
    let videos = VideoTotals::from(videos.as_slice());

    let fields = UserFields {
        followers,
        following,
        streams: streams.streams,
        streams_total_viewers: streams.viewers,
        videos: videos.videos,
        videos_total_viewers: videos.views,
    };
    trace!(?fields, "aggregated user");

    Ok(MetricRecord::new(user.into(), fields, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::stub::{
        user,
        StubApi,
    };
    use pretty_assertions::assert_eq;
    use twitch_stats_helix::HelixVideo;

    fn stream(user_id: &str, viewer_count: u64) -> HelixStream {
        HelixStream {
            user_id: user_id.to_string(),
            viewer_count,
        }
    }

    #[tokio::test]
    async fn counts_only_own_streams() {
        let api = StubApi::new();
        let streams = [stream("1", 10), stream("1", 20), stream("2", 999)];

        let record = gather_user_stats(&api, &user(1), &streams, None).await.unwrap();
        assert_eq!(record.fields.streams, 2);
        assert_eq!(record.fields.streams_total_viewers, 30);
        assert_eq!(record.tags.id, "1");
        assert_eq!(record.tags.login, "user1");
        assert_eq!(record.tags.display_name, "User1");
    }

    #[tokio::test]
    async fn sums_video_views_across_pages() {
        let api = StubApi::new()
            .with_videos(1, [5, 7, 3].map(|view_count| HelixVideo { view_count }))
            .with_page_size(2);

        let record = gather_user_stats(&api, &user(1), &[], None).await.unwrap();
        assert_eq!(record.fields.videos, 3);
        assert_eq!(record.fields.videos_total_viewers, 15);
        assert_eq!(api.video_calls(), 2);
    }

    #[tokio::test]
    async fn follow_totals_are_directional() {
        let api = StubApi::new().with_follows(1, 120, 4);

        let record = gather_user_stats(&api, &user(1), &[], None).await.unwrap();
        assert_eq!(record.fields.followers, 120);
        assert_eq!(record.fields.following, 4);
    }

    #[tokio::test]
    async fn failing_sub_fetch_fails_the_user() {
        let api = StubApi::new().failing_followers(1);

        let err = gather_user_stats(&api, &user(1), &[], None).await.unwrap_err();
        assert!(
            matches!(
                err,
                GatherError::User {
                    ref id,
                    stage: UserStage::Followers,
                    ..
                } if id == "1"
            ),
            "{err}"
        );
    }

    #[tokio::test]
    async fn endless_video_cursor_fails_the_user() {
        let api = StubApi::new().with_endless_videos(1);

        let err = gather_user_stats(&api, &user(1), &[], Some(3)).await.unwrap_err();
        assert!(matches!(err, GatherError::User { stage: UserStage::Videos, .. }), "{err}");
    }
}
