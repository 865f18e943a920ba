// External id extraction from destination identifier strings.
//
// Identifiers look like `com.plexapp.agents.imdb://tt0113277?lang=en`,
// `imdb://tt0113277` or `com.plexapp.agents.thetvdb://73739/2/5?lang=en`.
// Anything else (plex://, local://, tmdb://, ...) carries no usable id.

use regex::Regex;
use std::sync::LazyLock;

static RE_IMDB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:nm|tt)\d{7})").unwrap()
});

static RE_THETVDB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"thetvdb://(\d+)/").unwrap()
});

fn first_capture<'a, I>(re: &Regex, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    candidates
        .into_iter()
        .find_map(|candidate| re.captures(candidate))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The first IMDb-style id (`tt`/`nm` + 7 digits) found in the candidates,
/// checked in order.
pub fn imdb_id<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    first_capture(&RE_IMDB, candidates)
}

/// The show id of the first `thetvdb://<digits>/` found in the candidates.
pub fn tvdb_show_id<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    first_capture(&RE_THETVDB, candidates)
}
