//! Recommendation form: movie name or mood, one request at a time.

use std::sync::Arc;
use std::time::Duration;

use cinescope_api::{ApiError, Mood, Movie, MovieApi, RecommendationRequest};
use tokio::sync::mpsc::UnboundedSender;

use super::notice::Notice;
use super::timer::ScheduledTask;

/// Pending time after which a "still processing" notice is shown.
pub const SLOW_NOTICE_AFTER: Duration = Duration::from_secs(10);

/// Which input the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendMode {
    /// Similar to a named movie.
    Movie,
    /// Matching a mood.
    Mood,
}

/// Events delivered to the form.
#[derive(Debug)]
pub enum RecommendMessage {
    /// Request `seq` finished.
    Completed {
        /// Request sequence number.
        seq: u64,
        /// Outcome.
        result: cinescope_api::Result<Vec<Movie>>,
    },
    /// Request `seq` has been pending for [`SLOW_NOTICE_AFTER`].
    SlowNotice {
        /// Request sequence number.
        seq: u64,
    },
}

/// Form state and the last recommendation list.
#[derive(Debug)]
pub struct RecommendationForm<A> {
    api: Arc<A>,
    tx: UnboundedSender<RecommendMessage>,
    /// Active input.
    pub mode: RecommendMode,
    /// Movie name input.
    pub movie_name: String,
    /// Selected mood.
    pub mood: Option<Mood>,
    results: Vec<Movie>,
    seq: u64,
    loading: bool,
    slow_notice: Option<ScheduledTask>,
}

impl<A> RecommendationForm<A>
where
    A: MovieApi + Send + Sync + 'static,
{
    /// Creates an empty form in movie mode.
    pub const fn new(api: Arc<A>, tx: UnboundedSender<RecommendMessage>) -> Self {
        Self {
            api,
            tx,
            mode: RecommendMode::Movie,
            movie_name: String::new(),
            mood: None,
            results: Vec::new(),
            seq: 0,
            loading: false,
            slow_notice: None,
        }
    }

    /// Last successful recommendations.
    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    /// Whether a request is outstanding.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switches between movie and mood input.
    pub const fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            RecommendMode::Movie => RecommendMode::Mood,
            RecommendMode::Mood => RecommendMode::Movie,
        };
    }

    /// Selects the next mood (wrapping), starting from the first.
    pub fn next_mood(&mut self) {
        let next = self
            .mood
            .and_then(|m| Mood::ALL.iter().position(|x| *x == m))
            .map_or(0, |i| {
                let n = i.saturating_add(1);
                if n < Mood::ALL.len() { n } else { 0 }
            });
        self.mood = Mood::ALL.get(next).copied();
    }

    /// Selects the previous mood (wrapping).
    pub fn prev_mood(&mut self) {
        let prev = self
            .mood
            .and_then(|m| Mood::ALL.iter().position(|x| *x == m))
            .and_then(|i| i.checked_sub(1))
            .unwrap_or(Mood::ALL.len().saturating_sub(1));
        self.mood = Mood::ALL.get(prev).copied();
    }

    /// Validates the active input and issues the request.
    ///
    /// Returns a validation notice when the required field is missing; no
    /// request is made in that case. Ignored while a request is pending.
    pub fn submit(&mut self) -> Option<Notice> {
        if self.loading {
            return None;
        }

        let request = match self.mode {
            RecommendMode::Movie => {
                let name = self.movie_name.trim();
                if name.is_empty() {
                    return Some(Notice::error("Movie Required", "Please enter a movie name"));
                }
                RecommendationRequest::Movie {
                    movie_name: String::from(name),
                }
            }
            RecommendMode::Mood => match self.mood {
                Some(mood) => RecommendationRequest::Mood { mood },
                None => return Some(Notice::error("Mood Required", "Please select a mood")),
            },
        };

        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;
        self.loading = true;

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::debug!(seq, ?request, "Requesting recommendations");
        tokio::spawn(async move {
            let result = api.get_recommendations(&request).await;
            let _ = tx.send(RecommendMessage::Completed { seq, result });
        });

        self.slow_notice = Some(ScheduledTask::after(
            SLOW_NOTICE_AFTER,
            &self.tx,
            RecommendMessage::SlowNotice { seq },
        ));
        None
    }

    /// Applies a message from a timer or request task.
    pub fn handle(&mut self, msg: RecommendMessage) -> Option<Notice> {
        match msg {
            RecommendMessage::Completed { seq, result } if seq == self.seq => {
                self.loading = false;
                self.slow_notice = None;
                match result {
                    Ok(movies) => {
                        let count = movies.len();
                        self.results = movies;
                        Some(Notice::success(
                            "Recommendations Ready!",
                            format!("Found {count} movie recommendations"),
                        ))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Recommendation request failed");
                        Some(Notice::error("Error", failure_message(&e)))
                    }
                }
            }
            RecommendMessage::SlowNotice { seq } if seq == self.seq && self.loading => {
                Some(Notice::info(
                    "Still Processing...",
                    "This is taking longer than usual. Please wait a moment.",
                ))
            }
            _ => None,
        }
    }
}

/// User-facing text for a failed recommendation request.
fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Timeout { .. }
        | ApiError::Server { .. }
        | ApiError::Client { status: 400, .. } => err.user_message(),
        _ => String::from("Failed to get recommendations. Please try again."),
    }
}
