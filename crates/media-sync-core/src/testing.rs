// In-memory libraries for exercising reconciliation without a network.

use async_trait::async_trait;
use media_sync_models::{
    DestinationItem, EpisodeInfo, EpisodeRecord, MediaType, MovieRecord, ShowRecord, UnwatchedPage,
};
use media_sync_sources::{DestinationLibrary, SourceError, SourceLibrary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn movie_item(rating_key: &str, title: &str, guid: &str) -> DestinationItem {
    DestinationItem {
        rating_key: rating_key.to_string(),
        title: title.to_string(),
        media_type: MediaType::Movie,
        guids: vec![guid.to_string()],
        view_count: 0,
        episode: None,
    }
}

pub fn episode_item(rating_key: &str, show: &str, guid: &str, season: i64, episode: i64) -> DestinationItem {
    DestinationItem {
        rating_key: rating_key.to_string(),
        title: format!("Episode {}", episode),
        media_type: MediaType::Episode,
        guids: vec![guid.to_string()],
        view_count: 0,
        episode: Some(EpisodeInfo {
            show_title: show.to_string(),
            season,
            episode,
        }),
    }
}

pub fn movie_record(imdb_id: &str, watch_count: u32) -> MovieRecord {
    MovieRecord {
        external_id: imdb_id.to_string(),
        title: imdb_id.to_string(),
        watch_count,
        last_played: None,
    }
}

pub fn show_record(show_id: u64, tvdb_id: Option<&str>) -> ShowRecord {
    ShowRecord {
        show_id,
        title: format!("Show {}", show_id),
        tvdb_id: tvdb_id.map(str::to_string),
    }
}

pub fn episode_record(show_id: u64, season: i64, episode: i64, watch_count: u32) -> EpisodeRecord {
    EpisodeRecord {
        show_id,
        season,
        episode,
        watch_count,
        last_played: None,
    }
}

/// Source library backed by vectors. Counts queries so tests can assert
/// nothing was read.
#[derive(Default)]
pub struct FakeKodi {
    pub movies: Vec<MovieRecord>,
    pub shows: Vec<ShowRecord>,
    pub episodes: Vec<EpisodeRecord>,
    pub fail_episodes: bool,
    pub queries: AtomicUsize,
}

impl FakeKodi {
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceLibrary for FakeKodi {
    fn source_name(&self) -> &str {
        "fake-kodi"
    }

    async fn watched_movies(&self) -> Result<Vec<MovieRecord>, SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.movies.iter().filter(|m| m.watch_count > 0).cloned().collect())
    }

    async fn shows(&self) -> Result<Vec<ShowRecord>, SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.shows.clone())
    }

    async fn episodes(&self) -> Result<Vec<EpisodeRecord>, SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_episodes {
            return Err(SourceError::KodiApi {
                code: -32602,
                message: "Invalid params.".to_string(),
            });
        }
        Ok(self.episodes.clone())
    }
}

/// Destination library that behaves like a Plex section listing with
/// `unwatched=1`: watched items drop out of later pages.
#[derive(Default)]
pub struct FakePlex {
    pub items: Mutex<Vec<DestinationItem>>,
    pub marked: Mutex<Vec<String>>,
    pub page_requests: Mutex<Vec<(MediaType, usize)>>,
    pub fail_mark: bool,
}

impl FakePlex {
    pub fn with_items(items: Vec<DestinationItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn marked(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<(MediaType, usize)> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DestinationLibrary for FakePlex {
    fn destination_name(&self) -> &str {
        "fake-plex"
    }

    async fn unwatched_page(
        &self,
        media_type: MediaType,
        offset: usize,
        limit: usize,
    ) -> Result<UnwatchedPage, SourceError> {
        self.page_requests.lock().unwrap().push((media_type, offset));
        let items = self.items.lock().unwrap();
        let unwatched: Vec<&DestinationItem> = items
            .iter()
            .filter(|i| i.media_type == media_type && !i.is_watched())
            .collect();
        let total = unwatched.len();
        Ok(UnwatchedPage {
            items: unwatched.into_iter().skip(offset).take(limit).cloned().collect(),
            total: Some(total),
        })
    }

    async fn mark_watched(&self, item: &DestinationItem) -> Result<(), SourceError> {
        if self.fail_mark {
            return Err(SourceError::Http {
                service: "Plex",
                status: 500,
                message: "scrobble failed".to_string(),
            });
        }
        let mut items = self.items.lock().unwrap();
        if let Some(stored) = items.iter_mut().find(|i| i.rating_key == item.rating_key) {
            stored.view_count += 1;
        }
        self.marked.lock().unwrap().push(item.rating_key.clone());
        Ok(())
    }
}
