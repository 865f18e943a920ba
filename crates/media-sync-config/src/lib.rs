pub mod config;

pub use config::{
    ConfigError, KodiConfig, PlexConfig, SyncConfig, DEFAULT_MOVIES_SECTION, DEFAULT_PAGE_SIZE,
    DEFAULT_SHOWS_SECTION,
};
