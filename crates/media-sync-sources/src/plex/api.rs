use media_sync_models::{DestinationItem, EpisodeInfo, MediaType, UnwatchedPage};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::SourceError;

/// Identifier the local library uses for scrobble/unscrobble.
const LIBRARY_IDENTIFIER: &str = "com.plexapp.plugins.library";

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub provides: String,
    #[serde(rename = "clientIdentifier", default)]
    pub client_identifier: String,
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub uri: String,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub relay: bool,
}

impl Resource {
    pub fn is_server(&self) -> bool {
        self.provides.split(',').any(|p| p.trim() == "server")
    }

    /// Connections in the order they should be tried: local, remote, relay.
    pub fn ordered_connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<&Connection> = self.connections.iter().collect();
        connections.sort_by_key(|c| (c.relay, !c.local));
        connections
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directory: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "totalSize")]
    total_size: Option<usize>,
    #[serde(rename = "Metadata", default)]
    metadata: Vec<Metadata>,
}

#[derive(Debug, Deserialize)]
struct GuidEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(rename = "ratingKey")]
    rating_key: String,
    #[serde(default)]
    title: String,
    guid: Option<String>,
    #[serde(rename = "Guid", default)]
    guids: Vec<GuidEntry>,
    #[serde(rename = "viewCount", default)]
    view_count: u32,
    #[serde(rename = "grandparentTitle")]
    grandparent_title: Option<String>,
    #[serde(rename = "parentIndex")]
    parent_index: Option<i64>,
    index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorsBody {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// The first message of a plex.tv `{"errors": [...]}` body, if it is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorsBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .map(|e| e.message)
}

pub fn parse_resources(body: &str) -> Result<Vec<Resource>, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::decode("plex.tv", e))
}

fn parse_container<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| SourceError::decode("Plex", e))?;
    Ok(envelope.media_container)
}

pub fn parse_sections(body: &str) -> Result<Vec<Section>, SourceError> {
    Ok(parse_container::<SectionsContainer>(body)?.directory)
}

/// Parse a `library/sections/<key>/all` page into destination items.
pub fn parse_unwatched_page(body: &str, media_type: MediaType) -> Result<UnwatchedPage, SourceError> {
    let container: MetadataContainer = parse_container(body)?;
    let items = container
        .metadata
        .into_iter()
        .map(|m| m.into_item(media_type))
        .collect();
    Ok(UnwatchedPage {
        items,
        total: container.total_size,
    })
}

impl Metadata {
    fn into_item(self, media_type: MediaType) -> DestinationItem {
        let guids = self
            .guid
            .into_iter()
            .chain(self.guids.into_iter().map(|g| g.id))
            .collect();
        // An episode without both numbers cannot be matched, so it carries no EpisodeInfo.
        let episode = match (media_type, self.parent_index, self.index) {
            (MediaType::Episode, Some(season), Some(episode)) => Some(EpisodeInfo {
                show_title: self.grandparent_title.unwrap_or_default(),
                season,
                episode,
            }),
            _ => None,
        };
        DestinationItem {
            rating_key: self.rating_key,
            title: self.title,
            media_type,
            guids,
            view_count: self.view_count,
            episode,
        }
    }
}

/// Plex search type number for a library listing.
fn plex_type(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "1",
        MediaType::Episode => "4",
    }
}

/// HTTP access to one Plex Media Server connection.
pub struct PlexHttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PlexHttpClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        trace!("Plex API: GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("X-Plex-Token", &self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(SourceError::Http {
                service: "Plex",
                status: status.as_u16(),
                message: body,
            })
        }
    }

    /// Cheap reachability check used when choosing a server connection.
    pub async fn identity(&self) -> Result<(), SourceError> {
        self.get("/identity", &[]).await.map(|_| ())
    }

    pub async fn sections(&self) -> Result<Vec<Section>, SourceError> {
        let body = self.get("/library/sections", &[]).await?;
        parse_sections(&body)
    }

    pub async fn unwatched(
        &self,
        section_key: &str,
        media_type: MediaType,
        offset: usize,
        limit: usize,
    ) -> Result<UnwatchedPage, SourceError> {
        let path = format!("/library/sections/{}/all", section_key);
        let query = [
            ("type", plex_type(media_type).to_string()),
            ("unwatched", "1".to_string()),
            ("includeGuids", "1".to_string()),
            ("X-Plex-Container-Start", offset.to_string()),
            ("X-Plex-Container-Size", limit.to_string()),
        ];
        let body = self.get(&path, &query).await?;
        let page = parse_unwatched_page(&body, media_type)?;
        debug!(
            "Plex API: section {} offset {} returned {} unwatched {} (total {:?})",
            section_key,
            offset,
            page.items.len(),
            media_type.plural(),
            page.total
        );
        Ok(page)
    }

    pub async fn scrobble(&self, rating_key: &str) -> Result<(), SourceError> {
        let query = [
            ("key", rating_key.to_string()),
            ("identifier", LIBRARY_IDENTIFIER.to_string()),
        ];
        self.get("/:/scrobble", &query).await.map(|_| ())
    }
}
