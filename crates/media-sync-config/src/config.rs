use std::fmt;
use thiserror::Error;

pub const DEFAULT_MOVIES_SECTION: &str = "Movies";
pub const DEFAULT_SHOWS_SECTION: &str = "TV Shows";
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Kodi API URL must start with http:// or https://, got '{0}'")]
    InvalidKodiUrl(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Everything one sync run needs, validated up front.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub kodi: KodiConfig,
    pub plex: PlexConfig,
    pub dry_run: bool,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KodiConfig {
    pub api_url: String,
}

#[derive(Clone)]
pub struct PlexConfig {
    pub username: String,
    pub password: String,
    pub server_name: String,
    pub movies_section: String,
    pub shows_section: String,
}

impl KodiConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        let api_url = api_url.into().trim().to_string();
        let lower = api_url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ConfigError::InvalidKodiUrl(api_url));
        }
        Ok(Self { api_url })
    }

    /// The JSON-RPC endpoint: the base URL with trailing slashes removed and
    /// `/jsonrpc` appended.
    pub fn jsonrpc_url(&self) -> String {
        format!("{}/jsonrpc", self.api_url.trim_end_matches('/'))
    }
}

impl PlexConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        server_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            username: username.into(),
            password: password.into(),
            server_name: server_name.into(),
            movies_section: DEFAULT_MOVIES_SECTION.to_string(),
            shows_section: DEFAULT_SHOWS_SECTION.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_sections(
        mut self,
        movies_section: impl Into<String>,
        shows_section: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.movies_section = movies_section.into();
        self.shows_section = shows_section.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("Plex username", &self.username),
            ("Plex password", &self.password),
            ("Plex server name", &self.server_name),
            ("Movies section", &self.movies_section),
            ("TV Shows section", &self.shows_section),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        Ok(())
    }
}

// Keep the password out of debug logs.
impl fmt::Debug for PlexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexConfig")
            .field("username", &self.username)
            .field("password", &"********")
            .field("server_name", &self.server_name)
            .field("movies_section", &self.movies_section)
            .field("shows_section", &self.shows_section)
            .finish()
    }
}

impl SyncConfig {
    pub fn new(kodi: KodiConfig, plex: PlexConfig) -> Self {
        Self {
            kodi,
            plex,
            dry_run: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonrpc_url_strips_trailing_slashes() {
        let kodi = KodiConfig::new("http://192.168.0.190:8080//").unwrap();
        assert_eq!(kodi.jsonrpc_url(), "http://192.168.0.190:8080/jsonrpc");
    }

    #[test]
    fn test_jsonrpc_url_without_trailing_slash() {
        let kodi = KodiConfig::new("https://kodi.local").unwrap();
        assert_eq!(kodi.jsonrpc_url(), "https://kodi.local/jsonrpc");
    }

    #[test]
    fn test_kodi_url_requires_http_scheme() {
        let err = KodiConfig::new("192.168.0.190:8080").unwrap_err();
        assert_eq!(err, ConfigError::InvalidKodiUrl("192.168.0.190:8080".to_string()));
    }

    #[test]
    fn test_plex_config_defaults_sections() {
        let plex = PlexConfig::new("user", "secret", "media").unwrap();
        assert_eq!(plex.movies_section, "Movies");
        assert_eq!(plex.shows_section, "TV Shows");
    }

    #[test]
    fn test_plex_config_rejects_empty_fields() {
        assert_eq!(
            PlexConfig::new("user", "", "media").unwrap_err(),
            ConfigError::Empty("Plex password")
        );
        let plex = PlexConfig::new("user", "secret", "media").unwrap();
        assert_eq!(
            plex.with_sections("Films", " ").unwrap_err(),
            ConfigError::Empty("TV Shows section")
        );
    }

    #[test]
    #[test]
    fn test_debug_masks_password() {
        let plex = PlexConfig::new("user", "hunter2", "media").unwrap();
        let debug = format!("{:?}", plex);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("********"));
    }

    #[test]
    fn test_sync_config_defaults() {
        let config = SyncConfig::new(
            KodiConfig::new("http://kodi:8080").unwrap(),
            PlexConfig::new("user", "secret", "media").unwrap(),
        );
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(!config.dry_run);
        assert!(config.with_dry_run(true).dry_run);
    }
}
