//! Movie catalog API client for cinescope.
//!
//! Wraps the movie service's REST endpoints with per-call timeouts,
//! exponential-backoff retries, and lenient response normalization.

/// `MovieApi` trait.
pub mod api;

/// `MovieClient` implementation.
pub mod client;

/// Client configuration and base URL resolution.
pub mod config;

/// Classified errors.
pub mod error;

/// Image URL, date, and rating helpers.
pub mod format;

/// Retry executor.
pub mod retry;

/// Catalog models and request types.
pub mod types;

pub use api::{LocalMovieApi, MovieApi};
pub use client::{MovieClient, MovieClientBuilder};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use format::{ImageSize, RatingClass};
pub use types::{
    Genre, Homepage, Mood, Movie, ProductionCompany, RecommendationRequest, SearchResult,
    TrendingResult,
};
