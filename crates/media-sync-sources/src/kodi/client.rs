use async_trait::async_trait;
use media_sync_models::{EpisodeRecord, MovieRecord, ShowRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::kodi::api::{self, EpisodesResult, KodiEpisode, KodiMovie, KodiTvShow, MoviesResult, RpcRequest, TvShowsResult};
use crate::traits::SourceLibrary;
use crate::SourceError;

/// Kodi JSON-RPC client. Every query is a single POST; nothing is cached.
pub struct KodiClient {
    client: Client,
    endpoint: String,
}

impl KodiClient {
    /// `endpoint` is the full JSON-RPC URL, e.g. `http://192.168.0.190:8080/jsonrpc`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn call<T>(&self, request: &RpcRequest) -> Result<T, SourceError>
    where
        T: DeserializeOwned + Default,
    {
        debug!("Kodi API: {} ({})", request.method, self.endpoint);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Http {
                service: "Kodi",
                status: status.as_u16(),
                message: body,
            });
        }
        trace!("Kodi API: {} response: {}", request.method, body);

        api::parse_response(&body)
    }
}

#[async_trait]
impl SourceLibrary for KodiClient {
    fn source_name(&self) -> &str {
        "Kodi"
    }

    async fn watched_movies(&self) -> Result<Vec<MovieRecord>, SourceError> {
        let result: MoviesResult = self.call(&api::movies_request()).await?;
        let total = result.movies.len();
        let movies: Vec<MovieRecord> = result
            .movies
            .into_iter()
            .filter_map(KodiMovie::into_record)
            .collect();
        debug!("Kodi: {} watched movies, {} with an IMDb id", total, movies.len());
        Ok(movies)
    }

    async fn shows(&self) -> Result<Vec<ShowRecord>, SourceError> {
        let result: TvShowsResult = self.call(&api::tv_shows_request()).await?;
        let shows: Vec<ShowRecord> = result.tvshows.into_iter().map(KodiTvShow::into_record).collect();
        debug!("Kodi: {} TV shows", shows.len());
        Ok(shows)
    }

    async fn episodes(&self) -> Result<Vec<EpisodeRecord>, SourceError> {
        let result: EpisodesResult = self.call(&api::episodes_request()).await?;
        let episodes: Vec<EpisodeRecord> = result.episodes.into_iter().map(KodiEpisode::into_record).collect();
        debug!("Kodi: {} episodes", episodes.len());
        Ok(episodes)
    }
}
