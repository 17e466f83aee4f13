//! Hitster catalog library - original release year resolution for playlists.

pub mod catalog;
pub mod error;
pub mod files;
pub mod models;
pub mod musicbrainz;
pub mod normalize;
pub mod progress;
pub mod rate_limit;
pub mod resolver;
pub mod safety;
