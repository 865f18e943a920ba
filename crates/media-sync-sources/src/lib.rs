pub mod error;
pub mod kodi;
pub mod plex;
pub mod traits;

pub use error::SourceError;
pub use kodi::KodiClient;
pub use plex::{PlexClient, SectionTitles};
pub use traits::{DestinationLibrary, SourceLibrary};
