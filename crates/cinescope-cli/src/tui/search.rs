//! Incremental search box with a results dropdown.
//!
//! Keystrokes restart a 300 ms debounce timer. When it fires with a query
//! of at least two characters a search request is issued, tagged with a
//! sequence number. Only the response for the latest issued sequence is
//! applied; earlier responses that arrive late are dropped.

use std::sync::Arc;
use std::time::Duration;

use cinescope_api::{Movie, MovieApi, SearchResult};
use tokio::sync::mpsc::UnboundedSender;

use super::notice::Notice;
use super::route::Route;
use super::timer::ScheduledTask;

/// Quiet period after the last keystroke before a request is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Pending time after which a "taking long" notice is shown.
pub const SLOW_NOTICE_AFTER: Duration = Duration::from_secs(8);

/// Shorter queries never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of movies in the dropdown.
pub const DROPDOWN_LIMIT: usize = 5;

/// Events delivered to the search controller.
#[derive(Debug)]
pub enum SearchMessage {
    /// Debounce timer for keystroke `generation` fired.
    DebounceElapsed {
        /// Keystroke generation the timer was armed for.
        generation: u64,
    },
    /// Search request `seq` finished.
    Completed {
        /// Request sequence number.
        seq: u64,
        /// Outcome.
        result: cinescope_api::Result<SearchResult>,
    },
    /// Request `seq` has been pending for [`SLOW_NOTICE_AFTER`].
    SlowNotice {
        /// Request sequence number.
        seq: u64,
    },
}

/// Search box state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchController<A> {
    api: Arc<A>,
    tx: UnboundedSender<SearchMessage>,
    query: String,
    results: Vec<Movie>,
    dropdown_open: bool,
    highlighted: usize,
    /// Bumped on every query edit; stale debounce timers carry an old value.
    generation: u64,
    /// Last sequence number handed out.
    issued_seq: u64,
    /// Sequence whose response may still be applied.
    awaiting: Option<u64>,
    debounce: Option<ScheduledTask>,
    slow_notice: Option<ScheduledTask>,
}

impl<A> SearchController<A>
where
    A: MovieApi + Send + Sync + 'static,
{
    /// Creates an idle controller.
    pub const fn new(api: Arc<A>, tx: UnboundedSender<SearchMessage>) -> Self {
        Self {
            api,
            tx,
            query: String::new(),
            results: Vec::new(),
            dropdown_open: false,
            highlighted: 0,
            generation: 0,
            issued_seq: 0,
            awaiting: None,
            debounce: None,
            slow_notice: None,
        }
    }

    /// Current input text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Dropdown movies (at most [`DROPDOWN_LIMIT`]).
    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    /// Highlighted dropdown row. Row `results().len()` is "View all results".
    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Whether the dropdown is shown.
    pub const fn dropdown_visible(&self) -> bool {
        self.dropdown_open && !self.results.is_empty()
    }

    /// Whether a request for the current query is outstanding.
    pub const fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Replaces the input text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.on_edit();
    }

    /// Appends a character.
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.on_edit();
    }

    /// Removes the last character.
    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.on_edit();
        }
    }

    fn on_edit(&mut self) {
        self.generation = self.generation.wrapping_add(1);

        if self.query.chars().count() < MIN_QUERY_CHARS {
            self.debounce = None;
            self.go_idle();
            return;
        }

        // Replacing the task aborts the previous timer.
        self.debounce = Some(ScheduledTask::after(
            DEBOUNCE,
            &self.tx,
            SearchMessage::DebounceElapsed {
                generation: self.generation,
            },
        ));
    }

    /// Clears results and forgets any in-flight request.
    fn go_idle(&mut self) {
        self.results.clear();
        self.dropdown_open = false;
        self.highlighted = 0;
        self.awaiting = None;
        self.slow_notice = None;
    }

    fn issue(&mut self) {
        self.issued_seq = self.issued_seq.wrapping_add(1);
        let seq = self.issued_seq;
        self.awaiting = Some(seq);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let query = self.query.clone();
        tracing::debug!(seq, query = %query, "Issuing search");
        tokio::spawn(async move {
            let result = api.search_movies(&query).await;
            let _ = tx.send(SearchMessage::Completed { seq, result });
        });

        self.slow_notice = Some(ScheduledTask::after(
            SLOW_NOTICE_AFTER,
            &self.tx,
            SearchMessage::SlowNotice { seq },
        ));
    }

    /// Applies a message from a timer or request task.
    ///
    /// Returns a notice to show, if any.
    pub fn handle(&mut self, msg: SearchMessage) -> Option<Notice> {
        match msg {
            SearchMessage::DebounceElapsed { generation } => {
                if generation == self.generation && self.query.chars().count() >= MIN_QUERY_CHARS
                {
                    self.debounce = None;
                    self.issue();
                }
                None
            }
            SearchMessage::Completed { seq, result } => {
                if self.awaiting != Some(seq) {
                    tracing::debug!(seq, "Discarding stale search response");
                    return None;
                }
                self.awaiting = None;
                self.slow_notice = None;
                self.highlighted = 0;

                match result {
                    Ok(found) => {
                        self.results = found.movies.into_iter().take(DROPDOWN_LIMIT).collect();
                        self.dropdown_open = true;
                        None
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Search failed");
                        self.results.clear();
                        self.dropdown_open = false;
                        let description = if e.is_timeout() {
                            "Search timed out. Please try again."
                        } else {
                            "Failed to search movies. Please try again."
                        };
                        Some(Notice::error("Search Error", description))
                    }
                }
            }
            SearchMessage::SlowNotice { seq } => (self.awaiting == Some(seq)).then(|| {
                Notice::info(
                    "Search Taking Long",
                    "Search is taking longer than usual. Please wait...",
                )
            }),
        }
    }

    /// Clears the input and closes the dropdown.
    ///
    /// Used for Escape and clicks outside the search box.
    pub fn dismiss(&mut self) {
        self.query.clear();
        self.generation = self.generation.wrapping_add(1);
        self.debounce = None;
        self.go_idle();
    }

    /// Moves the dropdown highlight up.
    pub const fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Moves the dropdown highlight down (the last row is "View all results").
    pub fn move_down(&mut self) {
        if self.highlighted < self.results.len() {
            self.highlighted = self.highlighted.saturating_add(1);
        }
    }

    /// Activates the highlighted dropdown row.
    ///
    /// A movie row opens its details; the trailing row submits the full
    /// search. Without a visible dropdown this is a plain submit.
    pub fn select_highlighted(&mut self) -> Option<Route> {
        if !self.dropdown_visible() {
            return self.submit();
        }
        match self.results.get(self.highlighted) {
            Some(movie) => {
                let route = Route::MovieDetails { id: movie.id };
                self.dismiss();
                Some(route)
            }
            None => self.submit(),
        }
    }

    /// Selects the dropdown movie at `index` (mouse click).
    pub fn select_at(&mut self, index: usize) -> Option<Route> {
        if !self.dropdown_visible() || index > self.results.len() {
            return None;
        }
        self.highlighted = index;
        self.select_highlighted()
    }

    /// Submits the full search. Whitespace-only input is ignored.
    pub fn submit(&mut self) -> Option<Route> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        let route = Route::SearchResults {
            query: String::from(query),
        };
        self.dismiss();
        Some(route)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use cinescope_api::ApiError;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::super::fake::FakeApi;
    use super::super::notice::NoticeLevel;
    use super::*;

    fn controller(
        api: FakeApi,
    ) -> (
        SearchController<FakeApi>,
        Arc<FakeApi>,
        UnboundedReceiver<SearchMessage>,
    ) {
        let api = Arc::new(api);
        let (tx, rx) = mpsc::unbounded_channel();
        (SearchController::new(Arc::clone(&api), tx), api, rx)
    }

    /// Delivers the next message and returns whatever notice it produced.
    async fn step(
        controller: &mut SearchController<FakeApi>,
        rx: &mut UnboundedReceiver<SearchMessage>,
    ) -> Option<Notice> {
        let msg = rx.recv().await.unwrap();
        controller.handle(msg)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_makes_no_request() {
        // Arrange
        let (mut search, api, mut rx) = controller(FakeApi::with_results(3));

        // Act
        search.push_char('m');
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Assert
        assert!(rx.try_recv().is_err());
        assert!(api.calls().is_empty());
        assert!(!search.dropdown_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropdown_shows_top_five() {
        // Arrange
        let (mut search, api, mut rx) = controller(FakeApi::with_results(8));

        // Act
        search.set_query("matrix");
        step(&mut search, &mut rx).await;
        assert!(search.is_loading());
        step(&mut search, &mut rx).await;

        // Assert
        assert_eq!(api.calls(), ["search:matrix"]);
        assert!(search.dropdown_visible());
        assert_eq!(search.results().len(), DROPDOWN_LIMIT);
        assert_eq!(search.results()[0].title, "matrix 0");
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_restart_debounce() {
        // Arrange
        let (mut search, api, mut rx) = controller(FakeApi::with_results(1));
        let start = tokio::time::Instant::now();

        // Act
        search.set_query("ma");
        tokio::time::sleep(Duration::from_millis(200)).await;
        search.push_char('t');
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(api.calls().is_empty());
        step(&mut search, &mut rx).await;

        // Assert: one request, 300 ms after the last keystroke
        assert!(start.elapsed() >= Duration::from_millis(500));
        step(&mut search, &mut rx).await;
        assert_eq!(api.calls(), ["search:mat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_for_older_query_is_discarded() {
        // Arrange
        let api = FakeApi::with_results(2)
            .delay("search:ma", Duration::from_secs(2))
            .delay("search:mat", Duration::from_millis(100));
        let (mut search, api, mut rx) = controller(api);

        // Act: "ma" is issued, then "mat" is issued while "ma" is in flight
        search.set_query("ma");
        step(&mut search, &mut rx).await;
        search.push_char('t');
        step(&mut search, &mut rx).await;
        step(&mut search, &mut rx).await;
        let after_mat = search.results()[0].title.clone();
        let notice = step(&mut search, &mut rx).await;

        // Assert
        assert_eq!(api.calls(), ["search:ma", "search:mat"]);
        assert_eq!(after_mat, "mat 0");
        assert!(notice.is_none());
        assert_eq!(search.results()[0].title, "mat 0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_search_shows_notice() {
        // Arrange
        let api = FakeApi::with_results(1).delay("search:dune", Duration::from_secs(9));
        let (mut search, _api, mut rx) = controller(api);

        // Act
        search.set_query("dune");
        step(&mut search, &mut rx).await;
        let slow = step(&mut search, &mut rx).await.unwrap();
        let done = step(&mut search, &mut rx).await;

        // Assert
        assert_eq!(slow.level, NoticeLevel::Info);
        assert_eq!(slow.title, "Search Taking Long");
        assert!(done.is_none());
        assert!(search.dropdown_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_search_cancels_slow_notice() {
        // Arrange
        let (mut search, _api, mut rx) = controller(FakeApi::with_results(1));

        // Act
        search.set_query("dune");
        step(&mut search, &mut rx).await;
        step(&mut search, &mut rx).await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        // Assert
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_and_generic_errors_differ() {
        // Arrange
        let (mut timed_out, _, mut rx1) = controller(FakeApi::default().failing(|| {
            ApiError::Timeout {
                path: String::from("search"),
            }
        }));
        let (mut failed, _, mut rx2) = controller(FakeApi::default().failing(|| {
            ApiError::Server {
                status: 500,
                path: String::from("search"),
            }
        }));

        // Act
        timed_out.set_query("alien");
        failed.set_query("alien");
        step(&mut timed_out, &mut rx1).await;
        step(&mut failed, &mut rx2).await;
        let n1 = step(&mut timed_out, &mut rx1).await.unwrap();
        let n2 = step(&mut failed, &mut rx2).await.unwrap();

        // Assert
        assert_eq!(n1.title, "Search Error");
        assert_eq!(n1.description, "Search timed out. Please try again.");
        assert_eq!(n2.description, "Failed to search movies. Please try again.");
        assert!(!timed_out.dropdown_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortening_query_discards_in_flight_response() {
        // Arrange
        let api = FakeApi::with_results(3).delay("search:ma", Duration::from_secs(1));
        let (mut search, _api, mut rx) = controller(api);

        // Act
        search.set_query("ma");
        step(&mut search, &mut rx).await;
        search.pop_char();
        step(&mut search, &mut rx).await;

        // Assert
        assert_eq!(search.query(), "m");
        assert!(!search.dropdown_visible());
        assert!(search.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_result_navigates_and_clears() {
        // Arrange
        let (mut search, _api, mut rx) = controller(FakeApi::with_results(3));
        search.set_query("heat");
        step(&mut search, &mut rx).await;
        step(&mut search, &mut rx).await;

        // Act
        search.move_down();
        let route = search.select_highlighted();

        // Assert
        assert_eq!(route, Some(Route::MovieDetails { id: 2 }));
        assert_eq!(search.query(), "");
        assert!(!search.dropdown_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_all_row_submits_full_search() {
        // Arrange
        let (mut search, _api, mut rx) = controller(FakeApi::with_results(2));
        search.set_query(" heat ");
        step(&mut search, &mut rx).await;
        step(&mut search, &mut rx).await;

        // Act
        for _ in 0..5 {
            search.move_down();
        }
        let route = search.select_highlighted();

        // Assert
        assert_eq!(
            route,
            Some(Route::SearchResults {
                query: String::from("heat")
            })
        );
        assert_eq!(search.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_submit_is_ignored() {
        // Arrange
        let (mut search, _api, _rx) = controller(FakeApi::default());
        search.set_query("   ");

        // Act
        let route = search.submit();

        // Assert
        assert!(route.is_none());
        assert_eq!(search.query(), "   ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_drops_pending_response() {
        // Arrange
        let api = FakeApi::with_results(2).delay("search:up", Duration::from_millis(500));
        let (mut search, _api, mut rx) = controller(api);
        search.set_query("up");
        step(&mut search, &mut rx).await;

        // Act
        search.dismiss();
        step(&mut search, &mut rx).await;

        // Assert
        assert!(search.results().is_empty());
        assert!(!search.dropdown_visible());
        assert!(!search.is_loading());
    }
}
