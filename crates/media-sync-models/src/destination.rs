use serde::{Deserialize, Serialize};
use crate::MediaType;

/// Season/episode placement of a destination episode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub show_title: String,
    pub season: i64,
    pub episode: i64,
}

/// An item in the destination library (Plex).
///
/// `guids` holds every identifier string the server reported for the item,
/// primary guid first (e.g. `com.plexapp.agents.imdb://tt0111161?lang=en`,
/// `com.plexapp.agents.thetvdb://80379/2/5?lang=en`, `imdb://tt0111161`).
/// Any of them may embed an external id hint, or none may.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestinationItem {
    pub rating_key: String,
    pub title: String,
    pub media_type: MediaType,
    pub guids: Vec<String>,
    pub view_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeInfo>,
}

impl DestinationItem {
    pub fn is_watched(&self) -> bool {
        self.view_count > 0
    }

    /// Human readable name used in log lines: the title for movies,
    /// `Show S2E5` for episodes.
    pub fn display_name(&self) -> String {
        match &self.episode {
            Some(info) => format!("{} S{}E{}", info.show_title, info.season, info.episode),
            None => self.title.clone(),
        }
    }
}

/// One page of unwatched items. `total` is the server's reported size of the
/// whole result set when it provides one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwatchedPage {
    pub items: Vec<DestinationItem>,
    pub total: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(show: &str, season: i64, number: i64) -> DestinationItem {
        DestinationItem {
            rating_key: "42".to_string(),
            title: "Pilot".to_string(),
            media_type: MediaType::Episode,
            guids: vec![],
            view_count: 0,
            episode: Some(EpisodeInfo {
                show_title: show.to_string(),
                season,
                episode: number,
            }),
        }
    }

    #[test]
    fn test_display_name_episode() {
        assert_eq!(episode("Lost", 2, 5).display_name(), "Lost S2E5");
    }

    #[test]
    fn test_display_name_movie() {
        let movie = DestinationItem {
            rating_key: "7".to_string(),
            title: "Heat".to_string(),
            media_type: MediaType::Movie,
            guids: vec![],
            view_count: 1,
            episode: None,
        };
        assert_eq!(movie.display_name(), "Heat");
        assert!(movie.is_watched());
    }
}
