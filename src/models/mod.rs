use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod filter;
pub mod preferences;

pub use filter::{FilterSpec, GenreFilter, SortKey};
pub use preferences::{IdList, RecentSearches, Theme, ViewMode};

/// Sentinel OMDb uses for any field it has no value for
pub const NOT_AVAILABLE: &str = "N/A";

/// Fallback values applied to a record whose detail lookup yielded nothing
pub mod fallback {
    pub const GENRE: &str = "Unknown";
    pub const RATING: &str = "N/A";
    pub const PLOT: &str = "No plot available.";
    pub const DIRECTOR: &str = "Unknown";
    pub const ACTORS: &str = "Unknown";
    pub const RUNTIME: &str = "N/A";
    pub const LANGUAGE: &str = "Unknown";
    pub const RELEASED: &str = "Unknown";
}

/// IMDb identifier, unique across a session (e.g., "tt1375666")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImdbId(pub String);

impl ImdbId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ImdbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// One entry of an OMDb `?s=` search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: ImdbId,
    #[serde(rename = "Title")]
    pub title: String,
    /// Usually a 4-digit year, sometimes a range such as "2019–2021"
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Poster URL or "N/A"
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Raw OMDb `?s=` response
///
/// A missing `Search` field means "no results" (OMDb answers `Response: "False"` with an
/// `Error` such as "Movie not found!").
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<MovieSummary>>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// Raw OMDb `?i=` response; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub rating: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
}

impl MovieDetail {
    /// OMDb flags successful lookups with `Response: "True"`
    pub fn is_success(&self) -> bool {
        self.response.as_deref() == Some("True")
    }
}

// ============================================================================
// Unified record
// ============================================================================

/// A search summary merged with its detail lookup, fallbacks applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: ImdbId,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub kind: Option<String>,
    pub genre: String,
    pub rating: String,
    pub plot: String,
    pub director: String,
    pub actors: String,
    pub runtime: String,
    pub language: String,
    pub released: String,
}

/// Empty strings count as missing
fn or_fallback(value: Option<&String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => fallback.to_string(),
    }
}

impl MovieRecord {
    /// Merges a summary with an optional detail payload
    pub fn merge(summary: MovieSummary, detail: Option<&MovieDetail>) -> Self {
        Self {
            genre: or_fallback(detail.and_then(|d| d.genre.as_ref()), fallback::GENRE),
            rating: or_fallback(detail.and_then(|d| d.rating.as_ref()), fallback::RATING),
            plot: or_fallback(detail.and_then(|d| d.plot.as_ref()), fallback::PLOT),
            director: or_fallback(detail.and_then(|d| d.director.as_ref()), fallback::DIRECTOR),
            actors: or_fallback(detail.and_then(|d| d.actors.as_ref()), fallback::ACTORS),
            runtime: or_fallback(detail.and_then(|d| d.runtime.as_ref()), fallback::RUNTIME),
            language: or_fallback(detail.and_then(|d| d.language.as_ref()), fallback::LANGUAGE),
            released: or_fallback(detail.and_then(|d| d.released.as_ref()), fallback::RELEASED),
            id: summary.id,
            title: summary.title,
            year: summary.year,
            poster: summary.poster,
            kind: summary.kind,
        }
    }

    /// Builds a record carrying only fallback detail values
    pub fn from_summary(summary: MovieSummary) -> Self {
        Self::merge(summary, None)
    }

    /// Genres split on commas and trimmed
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre.split(',').map(str::trim)
    }

    /// Poster URL, or `None` for the "N/A" sentinel
    pub fn poster_url(&self) -> Option<&str> {
        if self.poster.is_empty() || self.poster == NOT_AVAILABLE {
            None
        } else {
            Some(&self.poster)
        }
    }
}
