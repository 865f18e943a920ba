use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use media_sync_config::SyncConfig;
use media_sync_core::{connect_and_sync, SyncOptions, SyncSummary};
use media_sync_sources::{KodiClient, PlexClient, SectionTitles};
use std::process::ExitCode;
use tracing::{debug, error};

pub async fn run_sync(config: &SyncConfig, output: &Output) -> Result<ExitCode> {
    debug!("Sync command started: {:?}", config);

    if config.dry_run {
        output.info("Dry run: nothing will be marked watched on Plex");
    }

    let kodi = KodiClient::new(config.kodi.jsonrpc_url()).wrap_err("Failed to create Kodi client")?;
    let plex = &config.plex;
    let sections = SectionTitles::new(&plex.movies_section, &plex.shows_section);

    let result = connect_and_sync(
        &kodi,
        || PlexClient::connect(&plex.username, &plex.password, &plex.server_name, sections),
        SyncOptions::from(config),
    )
    .await;

    match result {
        Ok(summary) => {
            output.success(summary_line(&summary));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(phase = %e.phase, "{}", e);
            output.error(format!("Sync aborted while {}", e.phase));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn summary_line(summary: &SyncSummary) -> String {
    let verb = if summary.movies.dry_run { "would be marked" } else { "marked" };
    format!(
        "Sync complete: {} episodes and {} movies {} watched",
        summary.episodes.marked, summary.movies.marked, verb
    )
}
