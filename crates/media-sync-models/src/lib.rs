pub mod destination;
pub mod library;
pub mod media;

pub use destination::{DestinationItem, EpisodeInfo, UnwatchedPage};
pub use library::{EpisodeRecord, MovieRecord, ShowRecord};
pub use media::MediaType;
