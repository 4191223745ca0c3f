//! Catalog models and response envelopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{ImageSize, RatingClass, format_date, format_rating, get_image_url, rating_class};

// --- Movie ---

/// A movie (or TV show on the trending endpoint) as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// Stable external identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path (relative) or absolute URL.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path (relative) or absolute URL.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (ISO `YYYY-MM-DD`, or a placeholder such as `N/A`).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u64,
    /// Genres, in display order.
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    /// Runtime in minutes.
    #[serde(default, deserialize_with = "runtime_minutes")]
    pub runtime: Option<u32>,
    /// Production companies, in display order.
    #[serde(default)]
    pub production_companies: Option<Vec<ProductionCompany>>,
}

impl Movie {
    /// Poster URL for the given size (placeholder if missing).
    #[must_use]
    pub fn poster_url(&self, size: ImageSize) -> String {
        get_image_url(self.poster_path.as_deref(), size)
    }

    /// Backdrop URL for the given size (placeholder if missing).
    #[must_use]
    pub fn backdrop_url(&self, size: ImageSize) -> String {
        get_image_url(self.backdrop_path.as_deref(), size)
    }

    /// Release year, or empty if the date is missing or unparsable.
    #[must_use]
    pub fn year(&self) -> String {
        self.release_date.as_deref().map_or_else(String::new, format_date)
    }

    /// Vote average with one decimal.
    #[must_use]
    pub fn rating(&self) -> String {
        format_rating(self.vote_average)
    }

    /// Rating bucket.
    #[must_use]
    pub fn rating_class(&self) -> RatingClass {
        rating_class(self.vote_average)
    }

    /// Comma-separated genre names.
    #[must_use]
    pub fn genre_names(&self) -> String {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Genre entry.
///
/// The details endpoint emits `{id, name}`; the recommendation endpoint
/// emits bare names, which decode with `id: None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "GenreShape")]
pub struct Genre {
    /// Genre ID.
    pub id: Option<u64>,
    /// Genre name.
    pub name: String,
}

/// Accepted wire shapes for a genre.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenreShape {
    Full { id: u64, name: String },
    Name(String),
}

impl From<GenreShape> for Genre {
    fn from(shape: GenreShape) -> Self {
        match shape {
            GenreShape::Full { id, name } => Self { id: Some(id), name },
            GenreShape::Name(name) => Self { id: None, name },
        }
    }
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Decodes `runtime`: minutes, `null`, or a placeholder string like `"N/A"`.
fn runtime_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RuntimeShape {
        Minutes(u32),
        Placeholder(String),
    }

    Ok(match Option::<RuntimeShape>::deserialize(deserializer)? {
        Some(RuntimeShape::Minutes(minutes)) => Some(minutes),
        Some(RuntimeShape::Placeholder(_)) | None => None,
    })
}

/// Decodes a list field where `null` means empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Envelopes ---

/// List envelope used by `popular` and `search`.
///
/// Precedence: `results`, then `movies`, then empty. A present but
/// malformed field is a decode error rather than a fallback.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MovieListEnvelope {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(default)]
    movies: Option<Vec<Movie>>,
}

impl MovieListEnvelope {
    /// Picks the list according to envelope precedence.
    pub(crate) fn into_movies(self) -> Vec<Movie> {
        self.results.or(self.movies).unwrap_or_default()
    }
}

/// Envelope used by `recommend`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecommendationEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(crate) results: Vec<Movie>,
}

/// Error payload sent by the service with 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub(crate) error: String,
}

// --- Operation results ---

/// Result of a text search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    /// Matching movies in service order.
    pub movies: Vec<Movie>,
    /// The query as submitted.
    pub query: String,
}

impl SearchResult {
    /// The result for a blank query.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            movies: Vec::new(),
            query: String::new(),
        }
    }
}

/// Response from the `trending` endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TrendingResult {
    /// Trending movies (day, then week).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movies: Vec<Movie>,
    /// Trending TV shows (day, then week).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tv_shows: Vec<Movie>,
}

/// Response from the homepage bundle (`/`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Homepage {
    /// Titles known to the recommender (valid `movie_name` inputs).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movie_titles: Vec<String>,
    /// Mood keys accepted by the recommender.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub moods: Vec<String>,
    /// Popular movies preview.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub popular_movies: Vec<Movie>,
}

// --- Recommendation request ---

/// Mood accepted by the recommender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Comedy, romance, adventure.
    Happy,
    /// Drama, romance.
    Sad,
    /// Action, thriller.
    Excited,
    /// Animation, family, fantasy.
    Relaxed,
}

impl Mood {
    /// All moods in display order.
    pub const ALL: [Self; 4] = [Self::Happy, Self::Sad, Self::Excited, Self::Relaxed];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Relaxed => "relaxed",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Excited => "Excited",
            Self::Relaxed => "Relaxed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood '{0}' (expected one of: happy, sad, excited, relaxed)")]
pub struct ParseMoodError(String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMoodError(String::from(s)))
    }
}

/// Body of `POST /recommend`. Exactly one payload shape per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RecommendationRequest {
    /// Movies similar to a named movie.
    Movie {
        /// Free-text movie name.
        movie_name: String,
    },
    /// Movies matching a mood.
    Mood {
        /// Selected mood.
        mood: Mood,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_details_fixture() {
        // Arrange
        let body = include_str!("../../../fixtures/cinescope/movie_details_603.json");

        // Act
        let movie: Movie = serde_json::from_str(body).unwrap();

        // Assert
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.runtime, Some(136));
        let genres = movie.genres.as_ref().unwrap();
        assert_eq!(genres[0], Genre { id: Some(28), name: String::from("Action") });
        let companies = movie.production_companies.as_ref().unwrap();
        assert_eq!(companies[0].name, "Village Roadshow Pictures");
        assert_eq!(movie.year(), "1999");
        assert_eq!(movie.rating(), "8.2");
    }

    #[test]
    fn test_minimal_movie_uses_defaults() {
        // Arrange
        let body = json!({"id": 1, "title": "Sparse", "vote_average": 6.0});

        // Act
        let movie: Movie = serde_json::from_value(body).unwrap();

        // Assert
        assert_eq!(movie.vote_count, 0);
        assert!(movie.overview.is_none());
        assert!(movie.genres.is_none());
        assert_eq!(movie.poster_url(ImageSize::W500), "/placeholder.svg");
        assert_eq!(movie.year(), "");
    }

    #[test]
    fn test_runtime_placeholder_decodes_to_none() {
        // Arrange
        let body = json!({"id": 2, "title": "Unknown", "vote_average": 5.5, "runtime": "N/A"});

        // Act
        let movie: Movie = serde_json::from_value(body).unwrap();

        // Assert
        assert!(movie.runtime.is_none());
    }

    #[test]
    fn test_bare_genre_names_are_accepted() {
        // Arrange
        let body = json!({
            "id": 3,
            "title": "Mood Pick",
            "vote_average": 7.1,
            "genres": ["Comedy", "Romance"]
        });

        // Act
        let movie: Movie = serde_json::from_value(body).unwrap();

        // Assert
        let genres = movie.genres.as_ref().unwrap();
        assert_eq!(genres.len(), 2);
        assert!(genres[0].id.is_none());
        assert_eq!(movie.genre_names(), "Comedy, Romance");
    }

    #[test]
    fn test_malformed_genre_is_rejected() {
        // Arrange
        let body = json!({"id": 4, "title": "Broken", "vote_average": 1.0, "genres": [42]});

        // Act
        let result = serde_json::from_value::<Movie>(body);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_prefers_results_over_movies() {
        // Arrange
        let body = json!({
            "results": [],
            "movies": [{"id": 9, "title": "Ignored", "vote_average": 1.0}]
        });

        // Act
        let envelope: MovieListEnvelope = serde_json::from_value(body).unwrap();

        // Assert
        assert!(envelope.into_movies().is_empty());
    }

    #[test]
    fn test_envelope_falls_back_to_movies_when_results_null() {
        // Arrange
        let body = json!({
            "results": null,
            "movies": [{"id": 9, "title": "Used", "vote_average": 1.0}]
        });

        // Act
        let envelope: MovieListEnvelope = serde_json::from_value(body).unwrap();

        // Assert
        let movies = envelope.into_movies();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Used");
    }

    #[test]
    fn test_envelope_without_known_fields_is_empty() {
        // Arrange
        let body = json!({"page": 1, "total_pages": 0});

        // Act
        let envelope: MovieListEnvelope = serde_json::from_value(body).unwrap();

        // Assert
        assert!(envelope.into_movies().is_empty());
    }

    #[test]
    fn test_envelope_with_malformed_results_fails() {
        // Arrange
        let body = json!({"results": "oops"});

        // Act
        let result = serde_json::from_value::<MovieListEnvelope>(body);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_trending_missing_tv_shows_defaults_to_empty() {
        // Arrange
        let body = json!({"movies": [{"id": 5, "title": "Hot", "vote_average": 7.9}]});

        // Act
        let trending: TrendingResult = serde_json::from_value(body).unwrap();

        // Assert
        assert_eq!(trending.movies.len(), 1);
        assert!(trending.tv_shows.is_empty());
    }

    #[test]
    fn test_movie_mode_request_shape() {
        // Arrange
        let request = RecommendationRequest::Movie {
            movie_name: String::from("Avatar"),
        };

        // Act
        let value = serde_json::to_value(&request).unwrap();

        // Assert
        assert_eq!(value, json!({"mode": "movie", "movie_name": "Avatar"}));
    }

    #[test]
    fn test_mood_mode_request_shape() {
        // Arrange
        let request = RecommendationRequest::Mood { mood: Mood::Relaxed };

        // Act
        let value = serde_json::to_value(&request).unwrap();

        // Assert
        assert_eq!(value, json!({"mode": "mood", "mood": "relaxed"}));
    }

    #[test]
    fn test_mood_from_str() {
        // Arrange & Act & Assert
        assert_eq!("happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!(" Excited ".parse::<Mood>().unwrap(), Mood::Excited);
        assert!("angry".parse::<Mood>().is_err());
    }
}
