//! Torrent client abstraction.
//!
//! This module provides a `TorrentClient` trait covering the few calls the
//! sync needs: log in, list torrents by category or tag, set share limits.

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::*;
