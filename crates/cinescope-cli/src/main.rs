//! cinescope - movie discovery from the terminal.

/// Application configuration (TOML).
mod config;
/// Interactive movie browser.
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cinescope_api::config::resolve_base_url;
use cinescope_api::{
    ApiError, ImageSize, Mood, Movie, MovieApi, MovieClient, RecommendationRequest,
};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;
use crate::tui::run_browser;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Movie service base URL (overrides config).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the homepage bundle.
    Home,
    /// List popular movies.
    Popular(PopularArgs),
    /// List trending movies or TV shows.
    Trending(TrendingArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Show details for one movie.
    Movie(MovieArgs),
    /// Get recommendations by movie or mood.
    Recommend(RecommendArgs),
    /// Open the interactive browser.
    Browse,
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PopularArgs {
    /// Maximum number of movies to show.
    #[arg(long)]
    limit: Option<usize>,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Show TV shows instead of movies.
    #[arg(long)]
    tv: bool,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text.
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// Movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `recommend` subcommand.
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct RecommendArgs {
    /// Recommend movies similar to this title.
    #[arg(long)]
    movie: Option<String>,

    /// Recommend movies for a mood (happy, sad, excited, relaxed).
    #[arg(long)]
    mood: Option<Mood>,
}

/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_client(config: &AppConfig, api_url: Option<&str>) -> Result<MovieClient> {
    let base_url = resolve_base_url(config.base_url_override(api_url))?;
    tracing::debug!(base_url = %base_url, "Using movie service");

    MovieClient::builder()
        .config(&config.api)
        .base_url(base_url)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build movie client")
}

/// Maps an API failure to its user-facing text; the raw error is logged at debug.
fn user_error(context: &str, err: &ApiError) -> anyhow::Error {
    tracing::debug!(error = ?err, "{context}");
    anyhow::anyhow!("{context}: {}", err.user_message())
}

/// Logs a movie table.
fn log_movies(movies: &[Movie]) {
    tracing::info!("ID\tRating\tYear\tTitle\t\t\tGenres");
    for m in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t\t{}",
            m.id,
            m.rating(),
            if m.year().is_empty() { String::from("-") } else { m.year() },
            m.title,
            m.genre_names(),
        );
    }
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_home(client: &MovieClient) -> Result<()> {
    let home = client
        .get_homepage()
        .await
        .map_err(|e| user_error("homepage request failed", &e))?;

    tracing::info!("Recommender titles: {}", home.movie_titles.len());
    tracing::info!("Moods: {}", home.moods.join(", "));
    tracing::info!("Popular now:");
    log_movies(&home.popular_movies);

    Ok(())
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_popular(client: &MovieClient, args: &PopularArgs) -> Result<()> {
    let mut movies = client
        .get_popular_movies()
        .await
        .map_err(|e| user_error("popular movies request failed", &e))?;
    if let Some(limit) = args.limit {
        movies.truncate(limit);
    }

    tracing::info!("Popular movies: {}", movies.len());
    log_movies(&movies);

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_trending(client: &MovieClient, args: &TrendingArgs) -> Result<()> {
    let trending = client
        .get_trending()
        .await
        .map_err(|e| user_error("trending request failed", &e))?;

    let (label, items) = if args.tv {
        ("TV shows", &trending.tv_shows)
    } else {
        ("movies", &trending.movies)
    };
    tracing::info!("Trending {label}: {}", items.len());
    log_movies(items);

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_search(client: &MovieClient, args: &SearchArgs) -> Result<()> {
    let query = args.query.trim();
    let result = client
        .search_movies(query)
        .await
        .map_err(|e| user_error("search request failed", &e))?;

    if result.movies.is_empty() {
        tracing::info!(
            "No Results Found: we couldn't find any movies matching \"{query}\". Try different keywords or check your spelling."
        );
        return Ok(());
    }

    let noun = if result.movies.len() == 1 { "result" } else { "results" };
    tracing::info!("Found {} {noun} for \"{query}\"", result.movies.len());
    log_movies(&result.movies);

    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the movie does not exist or the API request fails.
#[instrument(skip_all)]
async fn run_movie(client: &MovieClient, args: &MovieArgs) -> Result<()> {
    let movie = client
        .get_movie_details(args.id)
        .await
        .map_err(|e| user_error(&format!("failed to load movie {}", args.id), &e))?;

    tracing::info!("{} ({})", movie.title, movie.id);
    tracing::info!("Rating:\t\t{} ({} votes)", movie.rating(), movie.vote_count);
    tracing::info!("Year:\t\t{}", movie.year());
    if let Some(runtime) = movie.runtime {
        tracing::info!("Runtime:\t{runtime} min");
    }
    tracing::info!("Genres:\t\t{}", movie.genre_names());
    tracing::info!(
        "Overview:\t{}",
        movie
            .overview
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or("No overview available for this movie.")
    );
    if let Some(companies) = movie.production_companies.as_deref()
        && !companies.is_empty()
    {
        let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
        tracing::info!("Production:\t{}", names.join(", "));
    }
    tracing::info!("Poster:\t\t{}", movie.poster_url(ImageSize::W500));
    tracing::info!("Backdrop:\t{}", movie.backdrop_url(ImageSize::Original));

    Ok(())
}

/// Runs the `recommend` subcommand.
///
/// # Errors
///
/// Returns an error if the input is blank or the API request fails.
#[instrument(skip_all)]
async fn run_recommend(client: &MovieClient, args: &RecommendArgs) -> Result<()> {
    let request = match (&args.movie, args.mood) {
        (Some(name), _) => {
            let name = name.trim();
            anyhow::ensure!(!name.is_empty(), "--movie must not be blank");
            RecommendationRequest::Movie {
                movie_name: String::from(name),
            }
        }
        (None, Some(mood)) => RecommendationRequest::Mood { mood },
        (None, None) => anyhow::bail!("either --movie or --mood is required"),
    };

    let movies = client
        .get_recommendations(&request)
        .await
        .map_err(|e| user_error("recommendation request failed", &e))?;

    tracing::info!("Found {} movie recommendations", movies.len());
    log_movies(&movies);

    Ok(())
}

/// Installs the global subscriber.
///
/// The browser owns the terminal, so its logs go to stderr and are off
/// unless `RUST_LOG` asks for them.
#[cfg(not(feature = "otel"))]
fn init_tracing(browse: bool) {
    let (default_filter, writer) = log_target(browse);
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(writer)
        .init();
}

/// Installs the global subscriber and, when `OTEL_EXPORTER_OTLP_ENDPOINT`
/// is set, OTLP span, log, and metric export.
///
/// Returns the meter provider so pending metrics can be flushed on exit.
#[cfg(feature = "otel")]
fn init_tracing(browse: bool) -> Option<opentelemetry_sdk::metrics::SdkMeterProvider> {
    let (default_filter, writer) = log_target(browse);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(writer);

    let otlp_enabled = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok();

    let otel_layer = otlp_enabled.then_some(()).and_then(|()| {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .build()
            .ok()?;

        let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_simple_exporter(exporter)
            .build();

        let tracer = opentelemetry::trace::TracerProvider::tracer(
            &tracer_provider,
            env!("CARGO_PKG_NAME"),
        );
        opentelemetry::global::set_tracer_provider(tracer_provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    });

    let log_layer = otlp_enabled.then_some(()).and_then(|()| {
        let exporter = opentelemetry_otlp::LogExporter::builder()
            .with_http()
            .build()
            .ok()?;

        let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_simple_exporter(exporter)
            .build();

        Some(opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge::new(
            &logger_provider,
        ))
    });

    let meter_provider = otlp_enabled.then_some(()).and_then(|()| {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .build()
            .ok()?;

        let meter_provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
            .with_periodic_exporter(exporter)
            .build();
        opentelemetry::global::set_meter_provider(meter_provider.clone());

        Some(meter_provider)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_layer)
        .init();

    meter_provider
}

/// Default filter and writer for the fmt layer.
fn log_target(browse: bool) -> (&'static str, BoxMakeWriter) {
    if browse {
        ("off", BoxMakeWriter::new(io::stderr))
    } else {
        ("info", BoxMakeWriter::new(io::stdout))
    }
}

/// Runs the selected subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client setup, or the command fails.
async fn run(cli: Cli) -> Result<()> {
    let config_path = AppConfig::path(cli.dir.as_deref())?;
    let config = AppConfig::load(&config_path)?;
    let client = build_client(&config, cli.api_url.as_deref())?;

    match cli.command {
        Commands::Home => run_home(&client).await,
        Commands::Popular(args) => run_popular(&client, &args).await,
        Commands::Trending(args) => run_trending(&client, &args).await,
        Commands::Search(args) => run_search(&client, &args).await,
        Commands::Movie(args) => run_movie(&client, &args).await,
        Commands::Recommend(args) => run_recommend(&client, &args).await,
        Commands::Browse => run_browser(Arc::new(client)).await,
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let browse = matches!(cli.command, Commands::Browse);

    #[cfg(not(feature = "otel"))]
    {
        init_tracing(browse);
        run(cli).await
    }

    #[cfg(feature = "otel")]
    {
        let meter_provider = init_tracing(browse);
        let result = run(cli).await;
        if let Some(provider) = meter_provider
            && let Err(e) = provider.shutdown()
        {
            tracing::debug!(error = %e, "Failed to flush metrics");
        }
        result
    }
}
