use super::{LibraryClient, PlaylistMutator};
use crate::error::{Result, SyncError};
use crate::models::{LikedPage, LikedTrack, TrackPage};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Recorded `add_tracks` call.
#[derive(Debug, Clone)]
pub struct AddCall {
    pub playlist_id: String,
    pub track_ids: Vec<String>,
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct MockPlaylist {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub tracks: Vec<String>,
}

#[derive(Default)]
struct State {
    user_id: String,
    liked: Vec<LikedTrack>,
    playlists: Vec<MockPlaylist>,
    playlist_seq: usize,
    track_page_size: usize,
    fail_add_on_call: Option<usize>,
    liked_fetches: usize,
    add_calls: Vec<AddCall>,
    remove_calls: Vec<Vec<String>>,
}

/// Deterministic in-memory service used in tests: serves the liked library
/// and playlists out of local state, applies mutations to it, and records
/// every mutation call so tests can assert on batch shapes and ordering.
pub struct MockService {
    state: Mutex<State>,
}

impl MockService {
    pub fn new(user_id: &str) -> Self {
        Self {
            state: Mutex::new(State {
                user_id: user_id.to_string(),
                track_page_size: 100,
                ..Default::default()
            }),
        }
    }

    pub fn set_liked(&self, liked: Vec<LikedTrack>) {
        self.state.lock().unwrap().liked = liked;
    }

    /// Page size used when serving playlist track listings.
    pub fn set_track_page_size(&self, size: usize) {
        self.state.lock().unwrap().track_page_size = size;
    }

    /// Make the n-th `add_tracks` call (1-based, counted across the whole
    /// mock lifetime) fail with a RemoteApi error. The failing call applies
    /// nothing.
    pub fn fail_add_on_call(&self, n: usize) {
        self.state.lock().unwrap().fail_add_on_call = Some(n);
    }

    /// Seed a playlist and return its id.
    pub fn add_playlist(&self, name: &str, tracks: Vec<String>) -> String {
        let mut st = self.state.lock().unwrap();
        st.playlist_seq += 1;
        let id = format!("mock-playlist-{}", st.playlist_seq);
        st.playlists.push(MockPlaylist {
            id: id.clone(),
            name: name.to_string(),
            public: true,
            tracks,
        });
        id
    }

    pub fn liked_fetch_count(&self) -> usize {
        self.state.lock().unwrap().liked_fetches
    }

    pub fn add_calls(&self) -> Vec<AddCall> {
        self.state.lock().unwrap().add_calls.clone()
    }

    pub fn remove_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().remove_calls.clone()
    }

    pub fn playlists(&self) -> Vec<MockPlaylist> {
        self.state.lock().unwrap().playlists.clone()
    }

    /// Current track ids of the playlist with the given id.
    pub fn playlist_tracks(&self, playlist_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.tracks.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LibraryClient for MockService {
    async fn current_user_id(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().user_id.clone())
    }

    async fn fetch_liked_page(&self, limit: usize, offset: usize) -> Result<LikedPage> {
        let mut st = self.state.lock().unwrap();
        st.liked_fetches += 1;
        let total = st.liked.len();
        let end = std::cmp::min(offset + limit, total);
        let items = if offset < total {
            st.liked[offset..end].to_vec()
        } else {
            Vec::new()
        };
        Ok(LikedPage { items, total })
    }

    async fn list_playlists(&self, _user_id: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect())
    }

    async fn list_playlist_tracks_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<TrackPage> {
        let st = self.state.lock().unwrap();
        let pl = st
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| SyncError::RemoteApi(format!("no such playlist: {}", playlist_id)))?;
        let offset: usize = cursor.map(|c| c.parse().unwrap_or(0)).unwrap_or(0);
        let end = std::cmp::min(offset + st.track_page_size, pl.tracks.len());
        let track_ids = if offset < pl.tracks.len() {
            pl.tracks[offset..end].to_vec()
        } else {
            Vec::new()
        };
        let next = if end < pl.tracks.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(TrackPage { track_ids, next })
    }
}

#[async_trait]
impl PlaylistMutator for MockService {
    async fn create_playlist(&self, _user_id: &str, name: &str, public: bool) -> Result<String> {
        info!("MockService: create_playlist {}", name);
        let mut st = self.state.lock().unwrap();
        st.playlist_seq += 1;
        let id = format!("mock-playlist-{}", st.playlist_seq);
        st.playlists.push(MockPlaylist {
            id: id.clone(),
            name: name.to_string(),
            public,
            tracks: Vec::new(),
        });
        Ok(id)
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        position: usize,
    ) -> Result<()> {
        info!(
            "MockService: add_tracks {} -> {} tracks at {}",
            playlist_id,
            track_ids.len(),
            position
        );
        let mut st = self.state.lock().unwrap();
        st.add_calls.push(AddCall {
            playlist_id: playlist_id.to_string(),
            track_ids: track_ids.to_vec(),
            position,
        });
        if let Some(n) = st.fail_add_on_call {
            if st.add_calls.len() == n {
                return Err(SyncError::RemoteApi(format!(
                    "add tracks failed: injected error on call {}",
                    n
                )));
            }
        }
        let pl = st
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| SyncError::RemoteApi(format!("no such playlist: {}", playlist_id)))?;
        let at = std::cmp::min(position, pl.tracks.len());
        pl.tracks.splice(at..at, track_ids.iter().cloned());
        Ok(())
    }

    async fn remove_tracks(
        &self,
        _user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        info!(
            "MockService: remove_tracks {} -> {} tracks",
            playlist_id,
            track_ids.len()
        );
        let mut st = self.state.lock().unwrap();
        st.remove_calls.push(track_ids.to_vec());
        let pl = st
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| SyncError::RemoteApi(format!("no such playlist: {}", playlist_id)))?;
        pl.tracks.retain(|t| !track_ids.contains(t));
        Ok(())
    }
}
