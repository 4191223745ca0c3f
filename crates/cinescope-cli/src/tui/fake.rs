//! In-memory `MovieApi` for controller tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use cinescope_api::{
    ApiError, Homepage, MovieApi, Movie, RecommendationRequest, Result, SearchResult,
    TrendingResult,
};

/// Scripted movie service.
///
/// Every call is recorded as `"<op>:<arg>"`, waits for its configured
/// delay (default zero), then answers from the script.
#[derive(Debug, Default)]
pub struct FakeApi {
    delays: HashMap<String, Duration>,
    failure: Option<fn() -> ApiError>,
    result_count: usize,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    /// Answers every list call with `count` movies.
    pub fn with_results(count: usize) -> Self {
        Self {
            result_count: count,
            ..Self::default()
        }
    }

    /// Delays calls recorded as `call` (e.g. `"search:matrix"`).
    pub fn delay(mut self, call: &str, delay: Duration) -> Self {
        self.delays.insert(String::from(call), delay);
        self
    }

    /// Fails every call with the error built by `failure`.
    pub fn failing(mut self, failure: fn() -> ApiError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<()> {
        let delay = self.delays.get(&call).copied().unwrap_or_default();
        self.calls.lock().unwrap().push(call);
        tokio::time::sleep(delay).await;
        self.failure.map_or(Ok(()), |f| Err(f()))
    }

    fn movies(&self, label: &str) -> Vec<Movie> {
        (0..self.result_count)
            .map(|i| movie(u64::try_from(i).unwrap().saturating_add(1), &format!("{label} {i}")))
            .collect()
    }
}

/// Minimal movie with the given ID and title.
pub fn movie(id: u64, title: &str) -> Movie {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "vote_average": 7.5,
        "release_date": "2020-05-01",
        "poster_path": "/poster.jpg"
    }))
    .unwrap()
}

impl MovieApi for FakeApi {
    async fn get_homepage(&self) -> Result<Homepage> {
        self.enter(String::from("homepage")).await?;
        Ok(Homepage {
            popular_movies: self.movies("popular"),
            ..Homepage::default()
        })
    }

    async fn get_popular_movies(&self) -> Result<Vec<Movie>> {
        self.enter(String::from("popular")).await?;
        Ok(self.movies("popular"))
    }

    async fn search_movies(&self, query: &str) -> Result<SearchResult> {
        self.enter(format!("search:{query}")).await?;
        Ok(SearchResult {
            movies: self.movies(query),
            query: String::from(query),
        })
    }

    async fn get_movie_details(&self, id: u64) -> Result<Movie> {
        self.enter(format!("movie:{id}")).await?;
        Ok(movie(id, &format!("movie {id}")))
    }

    async fn get_trending(&self) -> Result<TrendingResult> {
        self.enter(String::from("trending")).await?;
        Ok(TrendingResult {
            movies: self.movies("trending"),
            tv_shows: self.movies("show"),
        })
    }

    async fn get_recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Movie>> {
        let label = match request {
            RecommendationRequest::Movie { movie_name } => format!("movie={movie_name}"),
            RecommendationRequest::Mood { mood } => format!("mood={mood}"),
        };
        self.enter(format!("recommend:{label}")).await?;
        Ok(self.movies(&label))
    }
}
