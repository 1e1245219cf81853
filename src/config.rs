use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Name of the playlist kept in sync with the liked library. Lookup
    /// is by exact name; the first match in listing order wins.
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,

    /// Visibility used when the playlist has to be created.
    #[serde(default = "default_playlist_public")]
    pub playlist_public: bool,

    /// Page size for draining the liked library.
    #[serde(default = "default_liked_page_size")]
    pub liked_page_size: usize,

    /// Per-call item limit of the remote mutation API.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_playlist_name() -> String { "Liked Songs Playlist".into() }
fn default_playlist_public() -> bool { true }
fn default_liked_page_size() -> usize { 50 }
fn default_max_batch_size() -> usize { 100 }
fn default_log_dir() -> PathBuf { "/var/log/liked-songs-sync".into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            playlist_name: default_playlist_name(),
            playlist_public: default_playlist_public(),
            liked_page_size: default_liked_page_size(),
            max_batch_size: default_max_batch_size(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }
}
