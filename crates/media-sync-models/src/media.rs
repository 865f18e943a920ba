use serde::{Deserialize, Serialize};
use std::fmt;

/// The two library categories that are reconciled, one pass each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Episode,
}

impl MediaType {
    pub fn plural(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Episode => "episodes",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Episode => write!(f, "episode"),
        }
    }
}
