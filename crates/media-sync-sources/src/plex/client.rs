use async_trait::async_trait;
use media_sync_models::{DestinationItem, MediaType, UnwatchedPage};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::plex::api::{PlexHttpClient, Resource};
use crate::plex::auth::{self, PlexAccount};
use crate::traits::DestinationLibrary;
use crate::SourceError;

/// Titles of the library sections holding movies and TV shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTitles {
    pub movies: String,
    pub shows: String,
}

impl SectionTitles {
    pub fn new(movies: impl Into<String>, shows: impl Into<String>) -> Self {
        Self {
            movies: movies.into(),
            shows: shows.into(),
        }
    }

    fn for_media_type(&self, media_type: MediaType) -> &str {
        match media_type {
            MediaType::Movie => &self.movies,
            MediaType::Episode => &self.shows,
        }
    }
}

/// A connection to one named Plex Media Server.
pub struct PlexClient {
    server_name: String,
    http: PlexHttpClient,
    sections: SectionTitles,
    // Section title -> key, resolved on first use
    section_keys: RwLock<HashMap<MediaType, String>>,
}

impl PlexClient {
    /// Sign in to plex.tv and connect to the server called `server_name`.
    ///
    /// Fails with `SourceError::Auth` on bad credentials and
    /// `SourceError::ServerNotFound` when the account has no server of that
    /// name or none of its connections answer.
    pub async fn connect(
        username: &str,
        password: &str,
        server_name: &str,
        sections: SectionTitles,
    ) -> Result<Self, SourceError> {
        Self::connect_at(auth::PLEX_TV_BASE_URL, username, password, server_name, sections).await
    }

    /// Same as [`PlexClient::connect`] against a plex.tv-compatible API at `account_url`.
    pub async fn connect_at(
        account_url: &str,
        username: &str,
        password: &str,
        server_name: &str,
        sections: SectionTitles,
    ) -> Result<Self, SourceError> {
        let client = auth::build_http_client()?;
        let account = PlexAccount::sign_in_at(client, account_url, username, password).await?;
        let resources = account.resources().await?;

        let resource = find_server(&resources, server_name)
            .ok_or_else(|| SourceError::ServerNotFound(server_name.to_string()))?;
        let token = resource
            .access_token
            .clone()
            .unwrap_or_else(|| account.token().to_string());

        for connection in resource.ordered_connections() {
            let http = PlexHttpClient::new(account.http_client().clone(), &connection.uri, &token);
            match http.identity().await {
                Ok(()) => {
                    info!("Connected to Plex server '{}' at {}", resource.name, http.base_url());
                    return Ok(Self::with_http_client(&resource.name, http, sections));
                }
                Err(e) => {
                    debug!("Plex: connection {} for '{}' failed: {}", connection.uri, resource.name, e);
                }
            }
        }

        warn!("Plex: no connection to '{}' answered", server_name);
        Err(SourceError::ServerNotFound(server_name.to_string()))
    }

    /// Build a client around an already established server connection.
    pub fn with_http_client(server_name: &str, http: PlexHttpClient, sections: SectionTitles) -> Self {
        Self {
            server_name: server_name.to_string(),
            http,
            sections,
            section_keys: RwLock::new(HashMap::new()),
        }
    }

    async fn section_key(&self, media_type: MediaType) -> Result<String, SourceError> {
        if let Some(key) = self.section_keys.read().await.get(&media_type) {
            return Ok(key.clone());
        }

        let title = self.sections.for_media_type(media_type);
        let sections = self.http.sections().await?;
        let section = sections
            .into_iter()
            .find(|s| s.title == title)
            .ok_or_else(|| SourceError::SectionNotFound(title.to_string()))?;
        debug!("Plex: section '{}' has key {} (type {})", section.title, section.key, section.kind);

        self.section_keys.write().await.insert(media_type, section.key.clone());
        Ok(section.key)
    }
}

fn find_server<'a>(resources: &'a [Resource], name: &str) -> Option<&'a Resource> {
    resources.iter().find(|r| r.is_server() && r.name == name)
}

#[async_trait]
impl DestinationLibrary for PlexClient {
    fn destination_name(&self) -> &str {
        &self.server_name
    }

    async fn unwatched_page(
        &self,
        media_type: MediaType,
        offset: usize,
        limit: usize,
    ) -> Result<UnwatchedPage, SourceError> {
        let section_key = self.section_key(media_type).await?;
        self.http.unwatched(&section_key, media_type, offset, limit).await
    }

    async fn mark_watched(&self, item: &DestinationItem) -> Result<(), SourceError> {
        self.http.scrobble(&item.rating_key).await
    }
}
