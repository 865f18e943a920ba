// Lookup structures built from the source library, keyed by external ids.

use media_sync_models::{EpisodeRecord, MovieRecord, ShowRecord};
use std::collections::HashMap;
use tracing::{debug, trace};

/// IMDb id -> watch count.
#[derive(Debug, Default, Clone)]
pub struct MovieIndex {
    by_imdb_id: HashMap<String, u32>,
}

impl MovieIndex {
    /// Later records win when two movies share an IMDb id.
    pub fn build(movies: &[MovieRecord]) -> Self {
        let mut by_imdb_id = HashMap::with_capacity(movies.len());
        for movie in movies {
            if let Some(previous) = by_imdb_id.insert(movie.external_id.clone(), movie.watch_count) {
                debug!(
                    "Duplicate IMDb id {} in source library ({} replaces watch count {})",
                    movie.external_id, movie.title, previous
                );
            }
            trace!("Indexed movie {} ({}) last played {:?}", movie.title, movie.external_id, movie.last_played);
        }
        Self { by_imdb_id }
    }

    pub fn watch_count(&self, imdb_id: &str) -> Option<u32> {
        self.by_imdb_id.get(imdb_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_imdb_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_imdb_id.is_empty()
    }
}

/// TheTVDB show id -> season -> episode -> watch count.
#[derive(Debug, Default, Clone)]
pub struct EpisodeIndex {
    shows: HashMap<String, HashMap<i64, HashMap<i64, u32>>>,
    episode_count: usize,
}

impl EpisodeIndex {
    /// Shows are indexed by internal id first, then each episode is placed
    /// under its show's TheTVDB id. Episodes whose show has no TheTVDB id
    /// (or is missing entirely) are dropped.
    pub fn build(shows: &[ShowRecord], episodes: &[EpisodeRecord]) -> Self {
        let tvdb_by_show: HashMap<u64, &str> = shows
            .iter()
            .filter_map(|show| show.tvdb_id.as_deref().map(|tvdb| (show.show_id, tvdb)))
            .collect();

        let mut index: HashMap<String, HashMap<i64, HashMap<i64, u32>>> = HashMap::new();
        let mut episode_count = 0;
        let mut dropped = 0;

        for episode in episodes {
            let Some(tvdb_id) = tvdb_by_show.get(&episode.show_id) else {
                dropped += 1;
                continue;
            };
            let previous = index
                .entry(tvdb_id.to_string())
                .or_default()
                .entry(episode.season)
                .or_default()
                .insert(episode.episode, episode.watch_count);
            if previous.is_none() {
                episode_count += 1;
            }
        }

        if dropped > 0 {
            debug!("Skipped {} episodes whose show has no TheTVDB id", dropped);
        }

        Self {
            shows: index,
            episode_count,
        }
    }

    pub fn watch_count(&self, tvdb_id: &str, season: i64, episode: i64) -> Option<u32> {
        self.shows.get(tvdb_id)?.get(&season)?.get(&episode).copied()
    }

    pub fn show_count(&self) -> usize {
        self.shows.len()
    }

    pub fn len(&self) -> usize {
        self.episode_count
    }

    pub fn is_empty(&self) -> bool {
        self.episode_count == 0
    }
}
