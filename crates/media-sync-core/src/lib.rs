pub mod guid;
pub mod index;
pub mod pager;
pub mod reconcile;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use index::{EpisodeIndex, MovieIndex};
pub use pager::UnwatchedPager;
pub use reconcile::{decide_episode, decide_movie, Decision, ReconcileReport, Reconciler};
pub use sync::{connect_and_sync, SyncError, SyncOptions, SyncOrchestrator, SyncPhase, SyncSummary};
