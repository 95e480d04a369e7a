//! Page-numbered listing.

use std::future::Future;

/// Records per page requested from list endpoints.
pub const PAGE_SIZE: usize = 100;

/// Fetch pages 1, 2, ... while the previous page came back full, and
/// concatenate them in page order.
///
/// Pages are fetched one after another: whether to ask for the next one
/// depends on the size of the last. The first error aborts the walk.
pub async fn collect_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch_page(page).await?;
        let full = batch.len() >= PAGE_SIZE;
        all.extend(batch);
        if !full {
            return Ok(all);
        }
        page += 1;
    }
}
