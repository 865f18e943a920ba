// Reconciliation of one library category: walk the destination's unwatched
// items, resolve each to an external id and mark it watched when the source
// library has played it.

use media_sync_models::{DestinationItem, MediaType};
use media_sync_sources::{DestinationLibrary, SourceError};
use std::fmt;
use tracing::{debug, info};

use crate::guid;
use crate::index::{EpisodeIndex, MovieIndex};
use crate::pager::UnwatchedPager;

/// Outcome for a single destination item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No identifier in a scheme we can match on.
    Unsupported,
    /// The external id is not in the source library.
    NotInSource,
    /// Present in the source library but never played there.
    NotPlayed,
    /// Already watched on the destination.
    AlreadyWatched,
    MarkWatched,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Decision::Unsupported => "no IMDb/TheTVDB identifier",
            Decision::NotInSource => "not in source library",
            Decision::NotPlayed => "not played in source library",
            Decision::AlreadyWatched => "already watched",
            Decision::MarkWatched => "mark watched",
        };
        f.write_str(reason)
    }
}

fn decide(watch_count: Option<u32>, item: &DestinationItem) -> Decision {
    match watch_count {
        None => Decision::NotInSource,
        Some(0) => Decision::NotPlayed,
        Some(_) if item.is_watched() => Decision::AlreadyWatched,
        Some(_) => Decision::MarkWatched,
    }
}

pub fn decide_movie(item: &DestinationItem, index: &MovieIndex) -> Decision {
    match guid::imdb_id(&item.guids) {
        Some(imdb_id) => decide(index.watch_count(&imdb_id), item),
        None => Decision::Unsupported,
    }
}

/// Episodes match only when show id, season and episode number all agree.
pub fn decide_episode(item: &DestinationItem, index: &EpisodeIndex) -> Decision {
    let (Some(tvdb_id), Some(info)) = (guid::tvdb_show_id(&item.guids), item.episode.as_ref()) else {
        return Decision::Unsupported;
    };
    decide(index.watch_count(&tvdb_id, info.season, info.episode), item)
}

/// Tally of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub media_type: MediaType,
    pub dry_run: bool,
    pub examined: usize,
    pub unsupported: usize,
    pub not_in_source: usize,
    pub not_played: usize,
    pub already_watched: usize,
    pub marked: usize,
}

impl ReconcileReport {
    pub fn new(media_type: MediaType, dry_run: bool) -> Self {
        Self {
            media_type,
            dry_run,
            examined: 0,
            unsupported: 0,
            not_in_source: 0,
            not_played: 0,
            already_watched: 0,
            marked: 0,
        }
    }

    fn record(&mut self, decision: Decision) {
        self.examined += 1;
        match decision {
            Decision::Unsupported => self.unsupported += 1,
            Decision::NotInSource => self.not_in_source += 1,
            Decision::NotPlayed => self.not_played += 1,
            Decision::AlreadyWatched => self.already_watched += 1,
            Decision::MarkWatched => self.marked += 1,
        }
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "would mark" } else { "marked" };
        write!(
            f,
            "{} unwatched {} checked, {} {} watched ({} unsupported, {} not in Kodi, {} unplayed in Kodi)",
            self.examined,
            self.media_type.plural(),
            verb,
            self.marked,
            self.unsupported,
            self.not_in_source,
            self.not_played
        )
    }
}

/// Log line for an item about to be marked, e.g. `Marking movie Heat as watched`.
fn marking_message(item: &DestinationItem, dry_run: bool) -> String {
    let verb = if dry_run { "Would mark" } else { "Marking" };
    format!("{} {} {} as watched", verb, item.media_type, item.display_name())
}

/// Applies decisions against a destination library.
pub struct Reconciler<'a, D: ?Sized> {
    destination: &'a D,
    page_size: usize,
    dry_run: bool,
}

impl<'a, D> Reconciler<'a, D>
where
    D: DestinationLibrary + ?Sized,
{
    pub fn new(destination: &'a D, page_size: usize, dry_run: bool) -> Self {
        Self {
            destination,
            page_size,
            dry_run,
        }
    }

    pub async fn movies(&self, index: &MovieIndex) -> Result<ReconcileReport, SourceError> {
        self.run(MediaType::Movie, |item| decide_movie(item, index)).await
    }

    pub async fn episodes(&self, index: &EpisodeIndex) -> Result<ReconcileReport, SourceError> {
        self.run(MediaType::Episode, |item| decide_episode(item, index)).await
    }

    async fn run<F>(&self, media_type: MediaType, decide: F) -> Result<ReconcileReport, SourceError>
    where
        F: Fn(&DestinationItem) -> Decision,
    {
        let mut pager = UnwatchedPager::new(self.destination, media_type, self.page_size);
        let mut report = ReconcileReport::new(media_type, self.dry_run);

        while let Some(item) = pager.next().await? {
            let decision = decide(&item);
            report.record(decision);

            if decision != Decision::MarkWatched {
                debug!("Skipping {} {}: {}", media_type, item.display_name(), decision);
                continue;
            }

            info!("{}", marking_message(&item, self.dry_run));
            if self.dry_run {
                continue;
            }

            self.destination.mark_watched(&item).await?;
            pager.note_marked();
        }

        Ok(report)
    }
}
