//! Display helpers shared by the CLI tables and the TUI.

use chrono::{DateTime, Datelike, NaiveDate};

/// Base URL for poster and backdrop images.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Returned for missing or empty image paths.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Image size segment of the image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// `w300`
    W300,
    /// `w500`
    #[default]
    W500,
    /// `original`
    Original,
}

impl ImageSize {
    /// URL path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Builds an absolute image URL.
///
/// Absolute URLs (anything starting with `http`) pass through unchanged;
/// `None` or empty paths map to [`PLACEHOLDER_IMAGE`].
#[must_use]
pub fn get_image_url(path: Option<&str>, size: ImageSize) -> String {
    match path {
        None | Some("") => String::from(PLACEHOLDER_IMAGE),
        Some(p) if p.starts_with("http") => String::from(p),
        Some(p) => format!("{IMAGE_BASE_URL}/{}{p}", size.as_str()),
    }
}

/// Extracts the four-digit year from a date string.
///
/// Accepts `YYYY-MM-DD`, the partial forms `YYYY-MM` and `YYYY`, and
/// RFC 3339 timestamps. Returns an empty string for anything else
/// (including the service's `N/A` placeholder).
#[must_use]
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|e| parse_partial_date(date).ok_or(e))
        .map(|d| d.year())
        .or_else(|_| DateTime::parse_from_rfc3339(date).map(|d| d.year()))
        .map_or_else(|_| String::new(), |year| year.to_string())
}

/// Parses `YYYY-MM` or `YYYY` (four-digit year) as the first day of the period.
fn parse_partial_date(date: &str) -> Option<NaiveDate> {
    let year_digits = date.get(..4)?;
    if !year_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match date.get(4..)? {
        "" => NaiveDate::parse_from_str(&format!("{date}-01-01"), "%Y-%m-%d").ok(),
        rest if rest.starts_with('-') => {
            NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d").ok()
        }
        _ => None,
    }
}

/// Formats a vote average with one decimal place.
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Rating bucket used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingClass {
    /// 7.0 and above.
    High,
    /// 5.0 up to 7.0.
    Medium,
    /// Below 5.0.
    Low,
}

/// Buckets a vote average.
#[must_use]
pub fn rating_class(rating: f64) -> RatingClass {
    if rating >= 7.0 {
        RatingClass::High
    } else if rating >= 5.0 {
        RatingClass::Medium
    } else {
        RatingClass::Low
    }
}
