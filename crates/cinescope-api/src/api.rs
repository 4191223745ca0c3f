//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::Result;
use crate::types::{Homepage, Movie, RecommendationRequest, SearchResult, TrendingResult};

/// Movie catalog operations.
///
/// Abstracts the HTTP client so controllers can run against test doubles.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches the homepage bundle (recommender titles, moods, popular preview).
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    async fn get_homepage(&self) -> Result<Homepage>;

    /// Fetches popular movies. An empty list is a valid result.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    async fn get_popular_movies(&self) -> Result<Vec<Movie>>;

    /// Searches movies by title.
    ///
    /// A blank query returns [`SearchResult::empty`] without a request.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    async fn search_movies(&self, query: &str) -> Result<SearchResult>;

    /// Fetches full details of a single movie.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::NotFound`] on HTTP 404, otherwise the
    /// classified error of the last attempt.
    async fn get_movie_details(&self, id: u64) -> Result<Movie>;

    /// Fetches trending movies and TV shows.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    async fn get_trending(&self) -> Result<TrendingResult>;

    /// Requests recommendations by movie name or mood.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt. A 400 carries the
    /// server's message.
    async fn get_recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Movie>>;
}
