use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the user's liked-songs library: an opaque track id plus
/// the instant the track was liked. `added_at` is used only for ordering,
/// never for identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedTrack {
    pub id: String,
    pub added_at: DateTime<Utc>,
}

/// One page of the liked-songs library. `total` is the count the remote
/// reported for the whole collection at the time of this fetch; it may
/// shift while the library is being drained.
#[derive(Debug, Clone)]
pub struct LikedPage {
    pub items: Vec<LikedTrack>,
    pub total: usize,
}

/// One page of a playlist's track listing. `next` is an opaque cursor;
/// `None` means the listing is exhausted.
#[derive(Debug, Clone)]
pub struct TrackPage {
    pub track_ids: Vec<String>,
    pub next: Option<String>,
}

/// Computed reconciliation between the liked set and the playlist.
/// `additions` preserves the liked set's newest-first order; `removals`
/// is order-insensitive. Derived fresh each run, never persisted.
#[derive(Debug, Clone, Default)]
pub struct SyncDelta {
    pub additions: Vec<String>,
    pub removals: Vec<String>,
}

/// Structured outcome of a successful sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
    pub playlist_id: String,
}
