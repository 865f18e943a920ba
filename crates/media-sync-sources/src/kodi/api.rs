// Kodi JSON-RPC wire types.
//
// Requests are JSON-RPC 2.0 envelopes POSTed to `<base>/jsonrpc`. A response
// carries either `result` or `error`; a response with neither is treated as
// an empty result.

use chrono::NaiveDateTime;
use media_sync_models::{EpisodeRecord, MovieRecord, ShowRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::SourceError;

const LAST_PLAYED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
    pub id: &'static str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoviesResult {
    #[serde(default)]
    pub movies: Vec<KodiMovie>,
}

#[derive(Debug, Deserialize)]
pub struct KodiMovie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub playcount: u32,
    #[serde(default)]
    pub imdbnumber: String,
    #[serde(default)]
    pub uniqueid: HashMap<String, String>,
    #[serde(default)]
    pub lastplayed: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TvShowsResult {
    #[serde(default)]
    pub tvshows: Vec<KodiTvShow>,
}

#[derive(Debug, Deserialize)]
pub struct KodiTvShow {
    pub tvshowid: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uniqueid: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpisodesResult {
    #[serde(default)]
    pub episodes: Vec<KodiEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct KodiEpisode {
    pub tvshowid: u64,
    pub season: i64,
    pub episode: i64,
    #[serde(default)]
    pub playcount: u32,
    #[serde(default)]
    pub lastplayed: String,
}

pub fn movies_request() -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        method: "VideoLibrary.GetMovies",
        params: json!({
            "properties": ["title", "playcount", "imdbnumber", "uniqueid", "lastplayed"],
            "filter": {"field": "playcount", "operator": "greaterthan", "value": "0"},
        }),
        id: "libMovies",
    }
}

pub fn tv_shows_request() -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        method: "VideoLibrary.GetTVShows",
        params: json!({ "properties": ["title", "uniqueid"] }),
        id: "libTVShows",
    }
}

pub fn episodes_request() -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        method: "VideoLibrary.GetEpisodes",
        params: json!({
            "properties": ["season", "episode", "playcount", "tvshowid", "lastplayed"],
        }),
        id: "libEpisodes",
    }
}

/// Decode a JSON-RPC response body, surfacing an `error` member as
/// `SourceError::KodiApi`.
pub fn parse_response<T>(body: &str) -> Result<T, SourceError>
where
    T: DeserializeOwned + Default,
{
    let response: RpcResponse<T> =
        serde_json::from_str(body).map_err(|e| SourceError::decode("Kodi", e))?;
    if let Some(error) = response.error {
        return Err(SourceError::KodiApi {
            code: error.code,
            message: error.message,
        });
    }
    Ok(response.result.unwrap_or_default())
}

fn is_imdb_id(value: &str) -> bool {
    value.len() == 9
        && (value.starts_with("tt") || value.starts_with("nm"))
        && value[2..].chars().all(|c| c.is_ascii_digit())
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_last_played(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LAST_PLAYED_FORMAT).ok()
}

impl KodiMovie {
    /// `imdbnumber` when it has the IMDb shape; newer scrapers may store a
    /// TMDB id there, in which case `uniqueid.imdb` is used instead.
    pub fn imdb_id(&self) -> Option<String> {
        let imdbnumber = self.imdbnumber.trim();
        if is_imdb_id(imdbnumber) {
            return Some(imdbnumber.to_string());
        }
        non_empty(self.uniqueid.get("imdb"))
    }

    pub fn into_record(self) -> Option<MovieRecord> {
        let Some(external_id) = self.imdb_id() else {
            debug!("Kodi: movie '{}' has no IMDb id, skipping", self.title);
            return None;
        };
        Some(MovieRecord {
            external_id,
            watch_count: self.playcount,
            last_played: parse_last_played(&self.lastplayed),
            title: self.title,
        })
    }
}

impl KodiTvShow {
    /// TheTVDB id from `uniqueid.tvdb`, or `uniqueid.unknown` where older
    /// scrapers put it.
    pub fn tvdb_id(&self) -> Option<String> {
        non_empty(self.uniqueid.get("tvdb")).or_else(|| non_empty(self.uniqueid.get("unknown")))
    }

    pub fn into_record(self) -> ShowRecord {
        ShowRecord {
            show_id: self.tvshowid,
            tvdb_id: self.tvdb_id(),
            title: self.title,
        }
    }
}

impl KodiEpisode {
    pub fn into_record(self) -> EpisodeRecord {
        EpisodeRecord {
            show_id: self.tvshowid,
            season: self.season,
            episode: self.episode,
            watch_count: self.playcount,
            last_played: parse_last_played(&self.lastplayed),
        }
    }
}
