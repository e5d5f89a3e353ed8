use crate::{
    collectors::paginate,
    error::PaginationError,
};
use twitch_stats_helix::{
    HelixApi,
    HelixStream,
    HelixUser,
};

/// All live streams owned by any of `users`, fetched once per batch.
#[instrument(level = "debug", skip_all, fields(users = users.len()))]
pub async fn fetch_streams(
    api: &dyn HelixApi,
    users: &[HelixUser],
    max_pages: Option<usize>,
) -> Result<Vec<HelixStream>, PaginationError> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let ids = users.iter().map(|user| user.id.clone()).collect::<Vec<_>>();
    let ids = ids.as_slice();
    let streams = paginate(max_pages, move |cursor| async move {
        api.get_streams(ids, cursor.as_deref()).await
    })
    .await?;

    debug!(live = streams.len(), "fetched live streams");
    Ok(streams)
}
