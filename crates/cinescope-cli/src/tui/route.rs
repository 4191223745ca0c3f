//! Views reachable in the browser.

use url::form_urlencoded;

/// A view and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Popular preview and trending preview.
    Home,
    /// Full popular list.
    Popular,
    /// Trending movies and TV shows.
    Trending,
    /// Full results for a submitted search.
    SearchResults {
        /// Trimmed query.
        query: String,
    },
    /// Single movie.
    MovieDetails {
        /// Movie ID.
        id: u64,
    },
    /// Recommendation form.
    Recommend,
}

impl Route {
    /// Location string shown in the header (`/search?q=...`, `/movie/603`).
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => String::from("/"),
            Self::Popular => String::from("/popular"),
            Self::Trending => String::from("/trending"),
            Self::SearchResults { query } => {
                let params = form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", query)
                    .finish();
                format!("/search?{params}")
            }
            Self::MovieDetails { id } => format!("/movie/{id}"),
            Self::Recommend => String::from("/recommend"),
        }
    }

    /// Header title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Popular => "Popular Movies",
            Self::Trending => "Trending",
            Self::SearchResults { .. } => "Search Results",
            Self::MovieDetails { .. } => "Movie Details",
            Self::Recommend => "Get Recommendations",
        }
    }
}
