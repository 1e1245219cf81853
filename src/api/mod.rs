pub mod spotify;
pub mod mock;

use crate::error::Result;
use crate::models::{LikedPage, TrackPage};

/// Read-only, paginated access to the user's library and playlists.
/// Implementations: spotify::SpotifyClient and mock::MockService.
#[async_trait::async_trait]
pub trait LibraryClient: Send + Sync {
    /// Id of the user the bearer token belongs to.
    async fn current_user_id(&self) -> Result<String>;

    /// Fetch one page of liked tracks. `offset` must equal the number of
    /// entries the caller has already accumulated.
    async fn fetch_liked_page(&self, limit: usize, offset: usize) -> Result<LikedPage>;

    /// All playlists owned by the user as (id, name), in listing order.
    /// Pagination is drained internally.
    async fn list_playlists(&self, user_id: &str) -> Result<Vec<(String, String)>>;

    /// Fetch one page of a playlist's track ids. Pass `None` for the first
    /// page, then the returned `next` cursor until it is `None`.
    async fn list_playlist_tracks_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<TrackPage>;
}

/// Mutation of one remote playlist (batching done by caller).
#[async_trait::async_trait]
pub trait PlaylistMutator: Send + Sync {
    /// Create a playlist and return its remote id.
    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String>;

    /// Insert track ids (<= the remote's per-call limit) at `position`.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String], position: usize)
        -> Result<()>;

    /// Remove all occurrences of the given track ids (<= the per-call limit)
    /// anywhere in the playlist.
    async fn remove_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()>;
}
