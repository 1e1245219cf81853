use super::{LibraryClient, PlaylistMutator};
use crate::error::{Result, SyncError};
use crate::models::{LikedPage, LikedTrack, TrackPage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::json;
use std::env;
use tracing::debug;

/// Spotify client backed by the Spotify Web API.
/// The bearer token is handed in by the credential provider; token
/// acquisition and refresh live outside this crate.
/// The API base may be overridden by the SPOTIFY_API_BASE env var or the
/// `with_api_base` constructor (useful for tests).
pub struct SpotifyClient {
    client: Client,
    bearer: String,
    api_base: String,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_api_base(access_token, Self::default_api_base())
    }

    pub fn with_api_base(access_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            bearer: format!("Bearer {}", access_token.into()),
            api_base: api_base.into(),
        }
    }

    fn default_api_base() -> String {
        // include v1 path by default
        env::var("SPOTIFY_API_BASE").unwrap_or_else(|_| "https://api.spotify.com/v1".into())
    }

    fn track_uri(id: &str) -> String {
        format!("spotify:track:{}", id)
    }

    fn encode_user(user_id: &str) -> String {
        url::form_urlencoded::byte_serialize(user_id.as_bytes()).collect::<String>()
    }

    /// Map a non-success response to the error taxonomy: 401/403 are auth
    /// failures, everything else carries the remote's message.
    async fn api_error(resp: reqwest::Response, what: &str) -> SyncError {
        let status = resp.status();
        let txt = resp.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            SyncError::Auth(format!("{} failed: {} => {}", what, status, txt))
        } else {
            SyncError::RemoteApi(format!("{} failed: {} => {}", what, status, txt))
        }
    }

    async fn get_json(&self, url: &str, what: &str) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.bearer)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, what).await);
        }
        resp.json()
            .await
            .map_err(|e| SyncError::RemoteApi(format!("{}: invalid response body: {}", what, e)))
    }
}

#[async_trait]
impl LibraryClient for SpotifyClient {
    async fn current_user_id(&self) -> Result<String> {
        let j = self.get_json(&format!("{}/me", self.api_base), "fetch /me").await?;
        j["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SyncError::RemoteApi("fetch /me: no id in response".into()))
    }

    async fn fetch_liked_page(&self, limit: usize, offset: usize) -> Result<LikedPage> {
        let url = format!(
            "{}/me/tracks?limit={}&offset={}",
            self.api_base, limit, offset
        );
        let j = self.get_json(&url, "fetch liked tracks").await?;

        let total = j["total"].as_u64().unwrap_or(0) as usize;
        let mut items = Vec::new();
        if let Some(arr) = j["items"].as_array() {
            for it in arr {
                let id = match it["track"]["id"].as_str() {
                    Some(s) => s.to_string(),
                    // local files and removed tracks come back without an id
                    None => continue,
                };
                let added_at = it["added_at"]
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|t| t.with_timezone(&Utc))
                    .ok_or_else(|| {
                        SyncError::RemoteApi(format!(
                            "fetch liked tracks: malformed added_at for track {}",
                            id
                        ))
                    })?;
                items.push(LikedTrack { id, added_at });
            }
        }
        debug!(
            "fetched liked page: offset={} items={} total={}",
            offset,
            items.len(),
            total
        );
        Ok(LikedPage { items, total })
    }

    async fn list_playlists(&self, user_id: &str) -> Result<Vec<(String, String)>> {
        let mut playlists = Vec::new();
        let mut next_url = Some(format!(
            "{}/users/{}/playlists?limit=50",
            self.api_base,
            Self::encode_user(user_id)
        ));
        while let Some(url) = next_url {
            let j = self.get_json(&url, "list playlists").await?;
            if let Some(items) = j["items"].as_array() {
                for pl in items {
                    let id = pl["id"].as_str().unwrap_or("").to_string();
                    let name = pl["name"].as_str().unwrap_or("").to_string();
                    playlists.push((id, name));
                }
            }
            next_url = j["next"].as_str().map(|s| s.to_string());
        }
        Ok(playlists)
    }

    async fn list_playlist_tracks_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<TrackPage> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{}/playlists/{}/tracks?fields=items(track(id)),next&limit=100",
                self.api_base, playlist_id
            ),
        };
        let j = self.get_json(&url, "list playlist tracks").await?;

        let mut track_ids = Vec::new();
        if let Some(items) = j["items"].as_array() {
            for it in items {
                if let Some(id) = it["track"]["id"].as_str() {
                    track_ids.push(id.to_string());
                }
            }
        }
        let next = j["next"].as_str().map(|s| s.to_string());
        Ok(TrackPage { track_ids, next })
    }
}

#[async_trait]
impl PlaylistMutator for SpotifyClient {
    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String> {
        let url = format!(
            "{}/users/{}/playlists",
            self.api_base,
            Self::encode_user(user_id)
        );
        let body = json!({ "name": name, "public": public });
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.bearer)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, "create playlist").await);
        }
        let j: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SyncError::RemoteApi(format!("create playlist: invalid body: {}", e)))?;
        j["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SyncError::RemoteApi("create playlist: no id in response".into()))
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        position: usize,
    ) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_base, playlist_id);
        let uris: Vec<String> = track_ids.iter().map(|id| Self::track_uri(id)).collect();
        let body = json!({ "uris": uris, "position": position });
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.bearer)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, "add tracks").await);
        }
        Ok(())
    }

    async fn remove_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        // User-scoped endpoint removes every occurrence of each uri.
        let url = format!(
            "{}/users/{}/playlists/{}/tracks",
            self.api_base,
            Self::encode_user(user_id),
            playlist_id
        );
        let tracks: Vec<serde_json::Value> = track_ids
            .iter()
            .map(|id| json!({ "uri": Self::track_uri(id) }))
            .collect();
        let body = json!({ "tracks": tracks });
        let resp = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, &self.bearer)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, "remove tracks").await);
        }
        Ok(())
    }
}
