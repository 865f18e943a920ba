use media_sync_config::SyncConfig;
use media_sync_sources::{DestinationLibrary, SourceError, SourceLibrary};
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tracing::{info, instrument};

use crate::index::{EpisodeIndex, MovieIndex};
use crate::reconcile::{ReconcileReport, Reconciler};

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Connecting,
    TvShows,
    Movies,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Connecting => write!(f, "connecting"),
            SyncPhase::TvShows => write!(f, "processing TVShows"),
            SyncPhase::Movies => write!(f, "processing Movies"),
        }
    }
}

/// A failed phase. Mutations applied by earlier phases (or earlier in the
/// failed phase) are not rolled back.
#[derive(Debug, Error)]
#[error("Error {phase}: {source}")]
pub struct SyncError {
    pub phase: SyncPhase,
    #[source]
    pub source: SourceError,
}

impl SyncError {
    fn new(phase: SyncPhase, source: SourceError) -> Self {
        Self { phase, source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: usize,
    pub dry_run: bool,
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            page_size: config.page_size,
            dry_run: config.dry_run,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub episodes: ReconcileReport,
    pub movies: ReconcileReport,
}

impl SyncSummary {
    pub fn total_marked(&self) -> usize {
        self.episodes.marked + self.movies.marked
    }
}

/// Runs the TV pass and then the movie pass against connected libraries.
pub struct SyncOrchestrator<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    destination: &'a D,
    options: SyncOptions,
}

impl<'a, S, D> SyncOrchestrator<'a, S, D>
where
    S: SourceLibrary + ?Sized,
    D: DestinationLibrary + ?Sized,
{
    pub fn new(source: &'a S, destination: &'a D, options: SyncOptions) -> Self {
        Self {
            source,
            destination,
            options,
        }
    }

    fn reconciler(&self) -> Reconciler<'a, D> {
        Reconciler::new(self.destination, self.options.page_size, self.options.dry_run)
    }

    #[instrument(skip(self))]
    pub async fn run_tv_pass(&self) -> Result<ReconcileReport, SourceError> {
        info!("Getting {} Episodes List", self.source.source_name());
        let shows = self.source.shows().await?;
        let episodes = self.source.episodes().await?;
        let index = EpisodeIndex::build(&shows, &episodes);
        info!(
            "Indexed {} episodes across {} shows with a TheTVDB id",
            index.len(),
            index.show_count()
        );

        info!(
            "Sorting through unwatched episodes on {} to detect watched from {}",
            self.destination.destination_name(),
            self.source.source_name()
        );
        self.reconciler().episodes(&index).await
    }

    #[instrument(skip(self))]
    pub async fn run_movie_pass(&self) -> Result<ReconcileReport, SourceError> {
        info!("Getting {} Movie List", self.source.source_name());
        let movies = self.source.watched_movies().await?;
        let index = MovieIndex::build(&movies);
        info!("Indexed {} watched movies", index.len());

        info!(
            "Sorting through unwatched movies on {} to detect watched from {}",
            self.destination.destination_name(),
            self.source.source_name()
        );
        self.reconciler().movies(&index).await
    }

    /// TV first, then movies. The first failing pass ends the run.
    pub async fn run(&self) -> Result<SyncSummary, SyncError> {
        let episodes = self
            .run_tv_pass()
            .await
            .map_err(|e| SyncError::new(SyncPhase::TvShows, e))?;
        info!("{}", episodes);

        let movies = self
            .run_movie_pass()
            .await
            .map_err(|e| SyncError::new(SyncPhase::Movies, e))?;
        info!("{}", movies);

        Ok(SyncSummary { episodes, movies })
    }
}

/// Connect to the destination, then run both passes.
///
/// The source library is not queried at all if connecting fails.
pub async fn connect_and_sync<S, D, F, Fut>(
    source: &S,
    connect: F,
    options: SyncOptions,
) -> Result<SyncSummary, SyncError>
where
    S: SourceLibrary + ?Sized,
    D: DestinationLibrary,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, SourceError>>,
{
    let destination = connect()
        .await
        .map_err(|e| SyncError::new(SyncPhase::Connecting, e))?;

    SyncOrchestrator::new(source, &destination, options).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        episode_item, episode_record, movie_item, movie_record, show_record, FakeKodi, FakePlex,
    };

    const OPTIONS: SyncOptions = SyncOptions {
        page_size: 100,
        dry_run: false,
    };

    fn kodi() -> FakeKodi {
        FakeKodi {
            movies: vec![movie_record("tt1234567", 1)],
            shows: vec![show_record(7, Some("73739"))],
            episodes: vec![episode_record(7, 2, 5, 1), episode_record(7, 2, 6, 0)],
            ..Default::default()
        }
    }

    fn plex() -> FakePlex {
        FakePlex::with_items(vec![
            movie_item("m1", "Heat", "com.plexapp.agents.imdb://tt1234567?lang=en"),
            episode_item("e1", "Lost", "com.plexapp.agents.thetvdb://73739/2/5?lang=en", 2, 5),
            episode_item("e2", "Lost", "com.plexapp.agents.thetvdb://73739/2/6?lang=en", 2, 6),
        ])
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(SyncPhase::Connecting.to_string(), "connecting");
        assert_eq!(SyncPhase::TvShows.to_string(), "processing TVShows");
        assert_eq!(SyncPhase::Movies.to_string(), "processing Movies");
    }

    #[tokio::test]
    async fn test_full_run_marks_tv_then_movies() {
        let kodi = kodi();
        let plex = plex();

        let summary = SyncOrchestrator::new(&kodi, &plex, OPTIONS).run().await.unwrap();

        assert_eq!(summary.episodes.marked, 1);
        assert_eq!(summary.movies.marked, 1);
        assert_eq!(summary.total_marked(), 2);
        assert_eq!(plex.marked(), vec!["e1", "m1"]);

        let phases: Vec<_> = plex.page_requests().iter().map(|(t, _)| *t).collect();
        assert_eq!(phases.first(), Some(&media_sync_models::MediaType::Episode));
        assert_eq!(phases.last(), Some(&media_sync_models::MediaType::Movie));
    }

    #[tokio::test]
    async fn test_second_run_performs_no_mutations() {
        let kodi = kodi();
        let plex = plex();
        let orchestrator = SyncOrchestrator::new(&kodi, &plex, OPTIONS);

        orchestrator.run().await.unwrap();
        let second = orchestrator.run().await.unwrap();

        assert_eq!(second.total_marked(), 0);
        assert_eq!(plex.marked().len(), 2);
    }

    #[tokio::test]
    async fn test_tv_failure_stops_before_movies() {
        let kodi = FakeKodi {
            fail_episodes: true,
            ..kodi()
        };
        let plex = plex();

        let err = SyncOrchestrator::new(&kodi, &plex, OPTIONS).run().await.unwrap_err();

        assert_eq!(err.phase, SyncPhase::TvShows);
        assert!(err.to_string().starts_with("Error processing TVShows"));
        assert!(plex.marked().is_empty());
        assert!(plex.page_requests().is_empty());
    }

    #[tokio::test]
    async fn test_connect_failure_queries_nothing() {
        let kodi = kodi();

        let err = connect_and_sync(
            &kodi,
            || async { Err::<FakePlex, _>(SourceError::Auth("User could not be authenticated".to_string())) },
            OPTIONS,
        )
        .await
        .unwrap_err();

        assert_eq!(err.phase, SyncPhase::Connecting);
        assert!(matches!(err.source, SourceError::Auth(_)));
        assert_eq!(kodi.query_count(), 0);
    }

    #[tokio::test]
    async fn test_connect_and_sync_runs_both_passes() {
        let kodi = kodi();

        let summary = connect_and_sync(&kodi, || async { Ok(plex()) }, OPTIONS)
            .await
            .unwrap();

        assert_eq!(summary.total_marked(), 2);
        assert_eq!(kodi.query_count(), 3);
    }
}
