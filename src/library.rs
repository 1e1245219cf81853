use crate::api::LibraryClient;
use crate::error::Result;
use crate::models::LikedTrack;
use tracing::{debug, info};

/// Drain the complete liked-songs library and return it ordered by
/// `added_at` descending (most recently liked first; ties keep the order
/// the remote returned them in).
///
/// Page 0 is fetched first to learn the reported total. Every subsequent
/// fetch starts at the number of entries already accumulated, so ranges
/// are never skipped or re-fetched. The reported total is a best-effort
/// snapshot: the user may like or unlike tracks mid-drain, producing a
/// short final page or an extra page. Draining stops as soon as a page
/// comes back empty or the stated total is reached, whichever first.
///
/// Any page failing aborts the whole read; no partial set is returned.
pub async fn fetch_liked_set<C: LibraryClient + ?Sized>(
    client: &C,
    page_size: usize,
) -> Result<Vec<LikedTrack>> {
    let first = client.fetch_liked_page(page_size, 0).await?;
    let total = first.total;
    let mut entries = first.items;

    while entries.len() < total {
        let page = client.fetch_liked_page(page_size, entries.len()).await?;
        if page.items.is_empty() {
            debug!(
                "liked library drained early: {} of reported {}",
                entries.len(),
                total
            );
            break;
        }
        entries.extend(page.items);
    }

    // Stable sort keeps arrival order for equal timestamps.
    entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    info!("fetched {} liked tracks (reported total {})", entries.len(), total);
    Ok(entries)
}
