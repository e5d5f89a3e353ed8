use crate::error::PaginationError;
use std::future::Future;
use twitch_stats_helix::{
    HelixResult,
    Page,
};

/// Calls `fetch` with the cursor of the previous page, starting without one, until a page comes back without a
/// cursor. Items are returned in page order.
///
/// The first failing page aborts the whole fetch. With `max_pages` set, a cursor that is still present after that
/// many pages is an error instead of another request.
pub async fn paginate<T, F, Fut>(max_pages: Option<usize>, mut fetch: F) -> Result<Vec<T>, PaginationError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = HelixResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        if let Some(limit) = max_pages.filter(|limit| pages >= *limit) {
            warn!(limit, items = items.len(), "pagination ceiling reached");
            return Err(PaginationError::PageLimit { limit });
        }

        let page = fetch(cursor.take())
            .await
            .map_err(|source| PaginationError::Page { page: pages, source })?;
        pages += 1;

        let (data, next) = page.into_parts();
        trace!(page = pages, items = data.len(), has_next = next.is_some(), "fetched page");
        items.extend(data);

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}
