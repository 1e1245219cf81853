use chrono::{Duration, TimeZone, Utc};
use liked_songs_playlist_sync::api::mock::MockService;
use liked_songs_playlist_sync::config::Config;
use liked_songs_playlist_sync::error::SyncError;
use liked_songs_playlist_sync::models::LikedTrack;
use liked_songs_playlist_sync::sync::sync_liked_playlist;
use std::collections::HashSet;

/// Build liked tracks whose timestamps descend with index: index 0 is the
/// most recently liked.
fn liked_desc(ids: &[&str]) -> Vec<LikedTrack> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ids.iter()
        .enumerate()
        .map(|(i, id)| LikedTrack {
            id: id.to_string(),
            added_at: base - Duration::seconds(i as i64),
        })
        .collect()
}

fn cfg() -> Config {
    Config::default()
}

#[tokio::test]
async fn creates_playlist_when_absent() {
    let svc = MockService::new("user1");
    svc.set_liked(liked_desc(&["t1", "t2", "t3"]));

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 3);
    assert_eq!(report.removed, 0);

    let playlists = svc.playlists();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].name, "Liked Songs Playlist");
    assert!(playlists[0].public);
    assert_eq!(playlists[0].id, report.playlist_id);
    assert_eq!(playlists[0].tracks, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let svc = MockService::new("user1");
    svc.set_liked(liked_desc(&["a", "b", "c"]));

    let first = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(first.added, 3);
    let calls_after_first = svc.add_calls().len();

    let second = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(svc.add_calls().len(), calls_after_first);
    assert!(svc.remove_calls().is_empty());
}

#[tokio::test]
async fn new_additions_land_newest_first_at_head() {
    let svc = MockService::new("user1");
    // p1/p2 are already in the playlist and still liked (older than the
    // three new likes); t1 > t2 > t3 by like time.
    svc.set_liked(liked_desc(&["t1", "t2", "t3", "p1", "p2"]));
    let pid = svc.add_playlist("Liked Songs Playlist", vec!["p1".into(), "p2".into()]);

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 3);
    assert_eq!(report.removed, 0);
    assert_eq!(
        svc.playlist_tracks(&pid),
        vec!["t1", "t2", "t3", "p1", "p2"]
    );
}

#[tokio::test]
async fn additions_are_batched_and_disjoint() {
    let svc = MockService::new("user1");
    let ids: Vec<String> = (0..250).map(|i| format!("track{:03}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    svc.set_liked(liked_desc(&id_refs));
    let pid = svc.add_playlist("Liked Songs Playlist", Vec::new());

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 250);

    let calls = svc.add_calls();
    assert_eq!(calls.len(), 3);
    let mut sizes: Vec<usize> = calls.iter().map(|c| c.track_ids.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![50, 100, 100]);
    assert!(calls.iter().all(|c| c.position == 0));

    let submitted: Vec<&String> = calls.iter().flat_map(|c| c.track_ids.iter()).collect();
    let distinct: HashSet<&String> = submitted.iter().cloned().collect();
    assert_eq!(submitted.len(), 250);
    assert_eq!(distinct.len(), 250);

    // Head-insertion of tail-first batches reassembles the liked order.
    assert_eq!(svc.playlist_tracks(&pid), ids);
}

#[tokio::test]
async fn empty_liked_set_empties_the_playlist() {
    let svc = MockService::new("user1");
    let pid = svc.add_playlist(
        "Liked Songs Playlist",
        vec!["x".into(), "y".into(), "z".into()],
    );

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 3);
    assert!(svc.add_calls().is_empty());
    assert!(svc.playlist_tracks(&pid).is_empty());
}

#[tokio::test]
async fn reconciles_mixed_additions_and_removals() {
    let svc = MockService::new("user1");
    svc.set_liked(liked_desc(&["new1", "keep"]));
    let pid = svc.add_playlist("Liked Songs Playlist", vec!["old1".into(), "keep".into()]);

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.removed, 1);

    let final_set: HashSet<String> = svc.playlist_tracks(&pid).into_iter().collect();
    let liked_set: HashSet<String> = ["new1", "keep"].iter().map(|s| s.to_string()).collect();
    assert_eq!(final_set, liked_set);
}

#[tokio::test]
async fn first_playlist_matching_by_name_wins() {
    let svc = MockService::new("user1");
    svc.set_liked(liked_desc(&["a"]));
    let first = svc.add_playlist("Liked Songs Playlist", Vec::new());
    let second = svc.add_playlist("Liked Songs Playlist", Vec::new());

    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.playlist_id, first);
    assert_eq!(svc.playlist_tracks(&first), vec!["a"]);
    assert!(svc.playlist_tracks(&second).is_empty());
}

#[tokio::test]
async fn failed_add_batch_aborts_without_rollback() {
    let svc = MockService::new("user1");
    let ids: Vec<String> = (0..250).map(|i| format!("track{:03}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    svc.set_liked(liked_desc(&id_refs));
    let pid = svc.add_playlist("Liked Songs Playlist", Vec::new());
    svc.fail_add_on_call(2);

    let err = sync_liked_playlist(&svc, &cfg()).await.unwrap_err();
    assert!(matches!(err, SyncError::RemoteApi(_)));

    // Second batch failed, third was never attempted.
    assert_eq!(svc.add_calls().len(), 2);

    // The first applied batch (the tail chunk, oldest 50 of the new
    // entries) stays in place: partial state is corrected by the next run.
    assert_eq!(svc.playlist_tracks(&pid), ids[200..].to_vec());
}

#[tokio::test]
async fn recovery_run_completes_after_partial_failure() {
    let svc = MockService::new("user1");
    let ids: Vec<String> = (0..250).map(|i| format!("track{:03}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    svc.set_liked(liked_desc(&id_refs));
    let pid = svc.add_playlist("Liked Songs Playlist", Vec::new());
    svc.fail_add_on_call(2);

    assert!(sync_liked_playlist(&svc, &cfg()).await.is_err());

    // Next run sees the 200 still-missing tracks and completes the set.
    let report = sync_liked_playlist(&svc, &cfg()).await.unwrap();
    assert_eq!(report.added, 200);
    assert_eq!(report.removed, 0);

    let final_set: HashSet<String> = svc.playlist_tracks(&pid).into_iter().collect();
    let liked_set: HashSet<String> = ids.iter().cloned().collect();
    assert_eq!(final_set, liked_set);
}
