use crate::api::{LibraryClient, PlaylistMutator};
use crate::config::Config;
use crate::error::Result;
use crate::library;
use crate::models::{SyncDelta, SyncReport};
use std::collections::HashSet;
use tracing::info;

/// Compute the reconciliation between the liked set and the playlist's
/// current contents. Additions preserve the liked set's order (newest
/// first); removals are everything in the playlist that is no longer
/// liked. Duplicate ids on either side collapse under set membership.
pub fn compute_delta(liked_ids: &[String], existing_ids: &[String]) -> SyncDelta {
    let liked_set: HashSet<&str> = liked_ids.iter().map(String::as_str).collect();
    let existing_set: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let additions: Vec<String> = liked_ids
        .iter()
        .filter(|id| !existing_set.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let removals: Vec<String> = existing_ids
        .iter()
        .filter(|id| !liked_set.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    SyncDelta {
        additions,
        removals,
    }
}

/// Find the first playlist whose name matches exactly, in listing order.
async fn resolve_playlist<S: LibraryClient + ?Sized>(
    svc: &S,
    user_id: &str,
    name: &str,
) -> Result<Option<String>> {
    let playlists = svc.list_playlists(user_id).await?;
    Ok(playlists
        .into_iter()
        .find(|(_, n)| n == name)
        .map(|(id, _)| id))
}

/// Drain a playlist's track listing, following `next` cursors until
/// exhausted. Order is irrelevant for diffing but preserved anyway.
async fn drain_playlist_tracks<S: LibraryClient + ?Sized>(
    svc: &S,
    playlist_id: &str,
) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = svc
            .list_playlist_tracks_page(playlist_id, cursor.as_deref())
            .await?;
        ids.extend(page.track_ids);
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(ids)
}

/// One full synchronization pass: drain the liked library, reconcile the
/// target playlist against it, and apply the delta in batches.
///
/// Additions are applied from the tail of the (newest-first) additions
/// sequence toward the head, each batch inserted at position 0. Every
/// head-insertion pushes earlier batches down, so applying the oldest
/// batch first leaves the newest-liked entries closest to the head once
/// all batches are in. Positions of untouched pre-existing entries are
/// never rewritten.
///
/// A failing batch aborts the rest of the run; batches already applied
/// stay applied and the next successful run corrects the difference.
pub async fn sync_liked_playlist<S>(svc: &S, cfg: &Config) -> Result<SyncReport>
where
    S: LibraryClient + PlaylistMutator + ?Sized,
{
    let user_id = svc.current_user_id().await?;
    let liked = library::fetch_liked_set(svc, cfg.liked_page_size).await?;
    let liked_ids: Vec<String> = liked.into_iter().map(|t| t.id).collect();

    let (playlist_id, existing_ids) =
        match resolve_playlist(svc, &user_id, &cfg.playlist_name).await? {
            Some(id) => {
                let existing = drain_playlist_tracks(svc, &id).await?;
                (id, existing)
            }
            None => {
                info!("playlist {:?} not found; creating it", cfg.playlist_name);
                let id = svc
                    .create_playlist(&user_id, &cfg.playlist_name, cfg.playlist_public)
                    .await?;
                (id, Vec::new())
            }
        };

    let delta = compute_delta(&liked_ids, &existing_ids);
    info!(
        "sync delta for playlist {}: {} to add, {} to remove",
        playlist_id,
        delta.additions.len(),
        delta.removals.len()
    );

    // Tail-first batches, each inserted at the playlist head.
    for chunk in delta.additions.chunks(cfg.max_batch_size).rev() {
        svc.add_tracks(&playlist_id, chunk, 0).await?;
        info!("added batch of {} tracks to {}", chunk.len(), playlist_id);
    }

    for chunk in delta.removals.chunks(cfg.max_batch_size) {
        svc.remove_tracks(&user_id, &playlist_id, chunk).await?;
        info!(
            "removed batch of {} tracks from {}",
            chunk.len(),
            playlist_id
        );
    }

    Ok(SyncReport {
        added: delta.additions.len(),
        removed: delta.removals.len(),
        playlist_id,
    })
}
