// Records read from the source library (Kodi). Only the fields the
// reconciliation needs are kept; everything else in the JSON-RPC payload is
// dropped at the client boundary.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A watched movie from the source library, keyed by its IMDb id
/// (`tt` + 7 digits).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRecord {
    pub external_id: String,
    pub title: String,
    pub watch_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<NaiveDateTime>,
}

/// A TV show from the source library.
///
/// `show_id` is the source library's internal id and only meaningful within
/// one run. `tvdb_id` is absent when the scraper never resolved the show
/// against TheTVDB; episodes of such shows cannot be synced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowRecord {
    pub show_id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<String>,
}

/// An episode from the source library, watched or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub show_id: u64,
    pub season: i64,
    pub episode: i64,
    pub watch_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<NaiveDateTime>,
}
