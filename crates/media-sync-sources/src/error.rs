use thiserror::Error;

/// Failures talking to either library.
///
/// The sync driver does not treat these differently: any of them aborts the
/// phase it happened in. The variants exist so log lines say what went wrong.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {message}")]
    Http {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Kodi API error {code}: {message}")]
    KodiApi { code: i64, message: String },

    #[error("Plex authentication failed: {0}")]
    Auth(String),

    #[error("Plex server '{0}' not found or not reachable")]
    ServerNotFound(String),

    #[error("Plex library section '{0}' not found")]
    SectionNotFound(String),
}

impl SourceError {
    pub(crate) fn decode(service: &'static str, source: serde_json::Error) -> Self {
        SourceError::Decode { service, source }
    }
}
