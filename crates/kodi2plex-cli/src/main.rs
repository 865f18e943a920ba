use clap::{ArgAction, Parser};
use color_eyre::eyre::Context;
use media_sync_config::{
    ConfigError, KodiConfig, PlexConfig, SyncConfig, DEFAULT_MOVIES_SECTION, DEFAULT_SHOWS_SECTION,
};
use std::process::ExitCode;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "kodi2plex")]
#[command(about = "Mark movies and episodes watched on Plex when Kodi has already played them")]
#[command(version)]
struct Cli {
    /// Kodi API URL, e.g. http://192.168.0.190:8080
    kodi_api_url: String,

    /// Plex account username
    plex_username: String,

    /// Plex account password
    plex_password: String,

    /// Plex server name, e.g. media
    plex_server_name: String,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Report what would be marked watched without changing anything on Plex
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Title of the Plex library section holding movies
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MOVIES_SECTION)]
    movies_section: String,

    /// Title of the Plex library section holding TV shows
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SHOWS_SECTION)]
    shows_section: String,
}

impl Cli {
    fn into_config(self) -> Result<SyncConfig, ConfigError> {
        let kodi = KodiConfig::new(self.kodi_api_url)?;
        let plex = PlexConfig::new(self.plex_username, self.plex_password, self.plex_server_name)?
            .with_sections(self.movies_section, self.shows_section)?;
        Ok(SyncConfig::new(kodi, plex).with_dry_run(self.dry_run))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.quiet);
    let config = cli.into_config().wrap_err("Invalid arguments")?;

    commands::sync::run_sync(&config, &output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from([
            "kodi2plex",
            "http://192.168.0.190:8080/",
            "alice",
            "secret",
            "media",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.kodi.jsonrpc_url(), "http://192.168.0.190:8080/jsonrpc");
        assert_eq!(config.plex.username, "alice");
        assert_eq!(config.plex.server_name, "media");
        assert_eq!(config.plex.movies_section, "Movies");
        assert_eq!(config.plex.shows_section, "TV Shows");
        assert!(!config.dry_run);
    }

    #[test]
    fn test_optional_flags() {
        let cli = Cli::try_parse_from([
            "kodi2plex",
            "-v",
            "--dry-run",
            "--shows-section",
            "Series",
            "http://kodi:8080",
            "alice",
            "secret",
            "media",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let config = cli.into_config().unwrap();
        assert!(config.dry_run);
        assert_eq!(config.plex.shows_section, "Series");
    }

    #[test]
    fn test_all_four_positionals_required() {
        assert!(Cli::try_parse_from(["kodi2plex", "http://kodi:8080", "alice", "secret"]).is_err());
    }

    #[test]
    fn test_invalid_kodi_url_rejected() {
        let cli = Cli::try_parse_from(["kodi2plex", "kodi:8080", "alice", "secret", "media"]).unwrap();
        assert!(matches!(cli.into_config(), Err(ConfigError::InvalidKodiUrl(_))));
    }
}
