//! `MovieClient` - HTTP client for the movie service.

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method, header};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::api::MovieApi;
use crate::config::{
    ApiConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, RECOMMEND_TIMEOUT, SEARCH_MAX_RETRIES,
    SEARCH_TIMEOUT, resolve_base_url, with_trailing_slash,
};
use crate::error::{ApiError, Result};
use crate::retry::{DEFAULT_BACKOFF_UNIT, RetryPolicy, with_retry};
use crate::types::{
    Homepage, Movie, MovieListEnvelope, RecommendationEnvelope, RecommendationRequest,
    SearchResult, ServiceErrorBody, TrendingResult,
};

/// Movie service client.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// Timeout for most endpoints.
    default_timeout: Duration,
    /// Timeout for `search`.
    search_timeout: Duration,
    /// Timeout for `recommend`.
    recommend_timeout: Duration,
    /// Retry policy for most endpoints.
    default_retry: RetryPolicy,
    /// Retry policy for `search`.
    search_retry: RetryPolicy,
}

/// Builder for `MovieClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    default_timeout: Duration,
    search_timeout: Duration,
    recommend_timeout: Duration,
    max_retries: u32,
    search_max_retries: u32,
    backoff_unit: Duration,
}

impl MovieClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            default_timeout: DEFAULT_TIMEOUT,
            search_timeout: SEARCH_TIMEOUT,
            recommend_timeout: RECOMMEND_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            search_max_retries: SEARCH_MAX_RETRIES,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// Without it, [`resolve_base_url`] picks the build-time value or the
    /// local default.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Applies timeouts and retry budgets from the `[api]` config section.
    ///
    /// `base_url` from the config is resolved by the caller.
    #[must_use]
    pub const fn config(mut self, config: &ApiConfig) -> Self {
        self.default_timeout = Duration::from_secs(config.timeout_secs);
        self.search_timeout = Duration::from_secs(config.search_timeout_secs);
        self.recommend_timeout = Duration::from_secs(config.recommend_timeout_secs);
        self.max_retries = config.max_retries;
        self.search_max_retries = config.search_max_retries;
        self
    }

    /// Sets the default request timeout (default: 15s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the search request timeout (default: 8s).
    #[must_use]
    pub const fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Sets the recommendation request timeout (default: 20s).
    #[must_use]
    pub const fn recommend_timeout(mut self, timeout: Duration) -> Self {
        self.recommend_timeout = timeout;
        self
    }

    /// Sets the default retry budget (default: 2).
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the search retry budget (default: 1).
    #[must_use]
    pub const fn search_max_retries(mut self, retries: u32) -> Self {
        self.search_max_retries = retries;
        self
    }

    /// Sets the backoff unit (default: 1s).
    #[must_use]
    pub const fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The resolved base URL is invalid.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> anyhow::Result<MovieClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => with_trailing_slash(url),
            None => resolve_base_url(None)?,
        };

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .timeout(self.default_timeout)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(MovieClient {
            http_client,
            base_url,
            default_timeout: self.default_timeout,
            search_timeout: self.search_timeout,
            recommend_timeout: self.recommend_timeout,
            default_retry: RetryPolicy::new(self.max_retries).with_backoff_unit(self.backoff_unit),
            search_retry: RetryPolicy::new(self.search_max_retries)
                .with_backoff_unit(self.backoff_unit),
        })
    }
}

/// One logical call: everything needed to repeat an attempt.
struct Call<'a> {
    method: Method,
    path: &'a str,
    query: &'a [(&'a str, &'a str)],
    body: Option<serde_json::Value>,
    timeout: Duration,
    policy: RetryPolicy,
}

impl<'a> Call<'a> {
    const fn get(path: &'a str, timeout: Duration, policy: RetryPolicy) -> Self {
        Self {
            method: Method::GET,
            path,
            query: &[],
            body: None,
            timeout,
            policy,
        }
    }
}

impl MovieClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> MovieClientBuilder {
        MovieClientBuilder::new()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs a call through the retry executor.
    #[instrument(skip_all, fields(path = call.path))]
    async fn execute<T: DeserializeOwned>(&self, call: Call<'_>) -> Result<T> {
        let url = self.base_url.join(call.path).map_err(|e| {
            ApiError::InvalidRequest(format!("failed to join URL path {}: {e}", call.path))
        })?;

        let call = &call;
        let url = &url;
        with_retry(&call.policy, call.path, move || self.attempt(call, url)).await
    }

    /// Sends a single attempt and classifies the outcome.
    async fn attempt<T: DeserializeOwned>(&self, call: &Call<'_>, url: &Url) -> Result<T> {
        let mut builder = self
            .http_client
            .request(call.method.clone(), url.clone())
            .timeout(call.timeout);
        if !call.query.is_empty() {
            builder = builder.query(call.query);
        }
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }
        let request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {e}", call.path)))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ApiError::from_transport(call.path, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(call.path, e))?;

        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                path: String::from(call.path),
            });
        }
        if status.is_client_error() {
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(ApiError::Client {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                path: String::from(call.path),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: String::from(call.path),
            source,
        })
    }
}

impl MovieApi for MovieClient {
    #[instrument(skip_all)]
    async fn get_homepage(&self) -> Result<Homepage> {
        self.execute(Call::get("", self.default_timeout, self.default_retry))
            .await
    }

    #[instrument(skip_all)]
    async fn get_popular_movies(&self) -> Result<Vec<Movie>> {
        let envelope: MovieListEnvelope = self
            .execute(Call::get("popular", self.default_timeout, self.default_retry))
            .await?;
        Ok(envelope.into_movies())
    }

    #[instrument(skip_all, fields(query = query))]
    async fn search_movies(&self, query: &str) -> Result<SearchResult> {
        if query.trim().is_empty() {
            return Ok(SearchResult::empty());
        }

        let params = [("q", query)];
        let call = Call {
            query: &params,
            ..Call::get("search", self.search_timeout, self.search_retry)
        };
        let envelope: MovieListEnvelope = self.execute(call).await?;
        Ok(SearchResult {
            movies: envelope.into_movies(),
            query: String::from(query),
        })
    }

    #[instrument(skip_all, fields(id = id))]
    async fn get_movie_details(&self, id: u64) -> Result<Movie> {
        let path = format!("movie/{id}");
        self.execute(Call::get(&path, self.default_timeout, self.default_retry))
            .await
            .map_err(|e| e.into_not_found(format!("movie {id}")))
    }

    #[instrument(skip_all)]
    async fn get_trending(&self) -> Result<TrendingResult> {
        self.execute(Call::get("trending", self.default_timeout, self.default_retry))
            .await
    }

    #[instrument(skip_all)]
    async fn get_recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Movie>> {
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::InvalidRequest(format!("recommend: {e}")))?;
        let call = Call {
            method: Method::POST,
            body: Some(body),
            ..Call::get("recommend", self.recommend_timeout, self.default_retry)
        };
        let envelope: RecommendationEnvelope = self.execute(call).await?;
        Ok(envelope.results)
    }
}
