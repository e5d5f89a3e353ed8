use twitch_stats_helix::{
    HelixApi,
    HelixResult,
    HelixUser,
};

/// Resolves one batch of ids with a single bulk lookup. Ids unknown to the platform are simply absent from the
/// result.
#[instrument(level = "debug", skip_all, fields(batch_size = ids.len()))]
pub async fn resolve_users(api: &dyn HelixApi, ids: &[u64]) -> HelixResult<Vec<HelixUser>> {
    let users = api.get_users(ids).await?;
    if users.len() < ids.len() {
        debug!(requested = ids.len(), resolved = users.len(), "some ids did not resolve");
    }
    Ok(users)
}
