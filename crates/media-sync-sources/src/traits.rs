use async_trait::async_trait;
use media_sync_models::{DestinationItem, EpisodeRecord, MediaType, MovieRecord, ShowRecord, UnwatchedPage};
use crate::SourceError;

/// Read-only access to the library whose playback history is authoritative.
#[async_trait]
pub trait SourceLibrary: Send + Sync {
    fn source_name(&self) -> &str;

    /// Movies with a play count above zero.
    async fn watched_movies(&self) -> Result<Vec<MovieRecord>, SourceError>;

    /// Every TV show, with its TheTVDB id when known.
    async fn shows(&self) -> Result<Vec<ShowRecord>, SourceError>;

    /// Every episode, watched or not.
    async fn episodes(&self) -> Result<Vec<EpisodeRecord>, SourceError>;
}

/// The library whose watched flags get updated.
#[async_trait]
pub trait DestinationLibrary: Send + Sync {
    fn destination_name(&self) -> &str;

    /// One page of currently unwatched items of `media_type`, starting at
    /// `offset` within the server's unwatched result set.
    async fn unwatched_page(
        &self,
        media_type: MediaType,
        offset: usize,
        limit: usize,
    ) -> Result<UnwatchedPage, SourceError>;

    async fn mark_watched(&self, item: &DestinationItem) -> Result<(), SourceError>;
}
