//! Core library for liked-songs-playlist-sync
pub mod config;
pub mod models;
pub mod error;
pub mod api;
pub mod credentials;
pub mod library;
pub mod sync;
