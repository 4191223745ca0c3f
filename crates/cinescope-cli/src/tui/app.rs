//! Browser state: current view, navigation history, focus, and notices.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cinescope_api::format::ImageSize;
use cinescope_api::{ApiError, Movie, MovieApi, TrendingResult};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use super::notice::Notice;
use super::recommend::{RecommendMessage, RecommendMode, RecommendationForm};
use super::route::Route;
use super::search::{SearchController, SearchMessage};

/// Movies shown in the home view's popular section.
pub const HOME_POPULAR_LIMIT: usize = 12;

/// Movies shown in the home view's trending section.
pub const HOME_TRENDING_LIMIT: usize = 6;

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Maximum number of notices shown at once.
const MAX_NOTICES: usize = 3;

/// Loaded content of the current view.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Nothing loaded (in flight, failed, or a view without remote data).
    Empty,
    /// Popular and trending previews.
    Home {
        /// Popular movies (top [`HOME_POPULAR_LIMIT`]).
        popular: Vec<Movie>,
        /// Trending movies (top [`HOME_TRENDING_LIMIT`]).
        trending: Vec<Movie>,
    },
    /// A flat movie list (popular, search results).
    Movies(Vec<Movie>),
    /// Trending movies and TV shows.
    Trending(TrendingResult),
    /// A single movie.
    Details(Box<Movie>),
    /// The requested movie does not exist.
    NotFound,
}

/// Trending view tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingTab {
    /// Movies.
    #[default]
    Movies,
    /// TV shows.
    TvShows,
}

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// View navigation shortcuts.
    Content,
    /// Search box.
    Search,
    /// Recommendation form inputs.
    Form,
}

/// Result of a view load.
#[derive(Debug)]
pub struct ViewMessage {
    seq: u64,
    outcome: cinescope_api::Result<Content>,
}

/// Receiving ends for task messages, drained by the event loop.
#[derive(Debug)]
pub struct Inbox {
    /// Search debounce, completion, and slow-notice messages.
    pub search: UnboundedReceiver<SearchMessage>,
    /// Recommendation completion and slow-notice messages.
    pub recommend: UnboundedReceiver<RecommendMessage>,
    /// View load results.
    pub view: UnboundedReceiver<ViewMessage>,
}

/// Screen regions from the last draw, used for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hitboxes {
    /// Search input box.
    pub search: Rect,
    /// Dropdown (including borders) when visible.
    pub dropdown: Option<Rect>,
}

/// A notice and when it was raised.
#[derive(Debug)]
struct ActiveNotice {
    notice: Notice,
    raised_at: Instant,
}

/// Browser application state.
#[derive(Debug)]
pub struct App<A> {
    api: Arc<A>,
    view_tx: UnboundedSender<ViewMessage>,
    route: Route,
    history: Vec<Route>,
    content: Content,
    view_seq: u64,
    loading: bool,
    focus: Focus,
    /// Selection in the current list.
    pub table_state: TableState,
    trending_tab: TrendingTab,
    /// Search box controller.
    pub search: SearchController<A>,
    /// Recommendation form controller.
    pub recommend: RecommendationForm<A>,
    notices: VecDeque<ActiveNotice>,
    /// Regions from the last draw.
    pub hitboxes: Hitboxes,
}

impl<A> App<A>
where
    A: MovieApi + Send + Sync + 'static,
{
    /// Creates the app on the home route (not yet loaded).
    pub fn new(api: Arc<A>) -> (Self, Inbox) {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let (recommend_tx, recommend_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = mpsc::unbounded_channel();

        let app = Self {
            search: SearchController::new(Arc::clone(&api), search_tx),
            recommend: RecommendationForm::new(Arc::clone(&api), recommend_tx),
            api,
            view_tx,
            route: Route::Home,
            history: Vec::new(),
            content: Content::Empty,
            view_seq: 0,
            loading: false,
            focus: Focus::Content,
            table_state: TableState::default(),
            trending_tab: TrendingTab::default(),
            notices: VecDeque::new(),
            hitboxes: Hitboxes::default(),
        };
        let inbox = Inbox {
            search: search_rx,
            recommend: recommend_rx,
            view: view_rx,
        };
        (app, inbox)
    }

    // --- Accessors ---

    /// Current route.
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Loaded content.
    pub const fn content(&self) -> &Content {
        &self.content
    }

    /// Whether the current view is loading.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Keyboard focus.
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Trending tab.
    pub const fn trending_tab(&self) -> TrendingTab {
        self.trending_tab
    }

    /// Visible notices, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().map(|n| &n.notice)
    }

    /// Movies in the selectable list of the current view.
    pub fn list(&self) -> &[Movie] {
        match (&self.content, self.route == Route::Recommend) {
            (_, true) => self.recommend.results(),
            (Content::Home { popular, .. }, _) => popular,
            (Content::Movies(movies), _) => movies,
            (Content::Trending(t), _) => match self.trending_tab {
                TrendingTab::Movies => &t.movies,
                TrendingTab::TvShows => &t.tv_shows,
            },
            _ => &[],
        }
    }

    /// Selected movie in the list, or the movie on the details view.
    pub fn current_movie(&self) -> Option<&Movie> {
        if let Content::Details(movie) = &self.content {
            return Some(movie);
        }
        self.table_state.selected().and_then(|i| self.list().get(i))
    }

    // --- Navigation ---

    /// Shows `route`, loading its data.
    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            let previous = std::mem::replace(&mut self.route, route);
            self.history.push(previous);
        }
        self.enter_current();
    }

    /// Returns to the previous route. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.route = previous;
        self.enter_current();
        true
    }

    fn enter_current(&mut self) {
        self.table_state = TableState::default();
        self.trending_tab = TrendingTab::default();
        self.content = Content::Empty;
        self.view_seq = self.view_seq.wrapping_add(1);

        if self.route == Route::Recommend {
            self.loading = false;
            self.focus = Focus::Form;
            self.select_first();
            return;
        }
        self.focus = Focus::Content;
        self.loading = true;

        let seq = self.view_seq;
        let api = Arc::clone(&self.api);
        let tx = self.view_tx.clone();
        let route = self.route.clone();
        tracing::debug!(seq, path = %route.path(), "Loading view");
        tokio::spawn(async move {
            let outcome = load_content(api.as_ref(), &route).await;
            let _ = tx.send(ViewMessage { seq, outcome });
        });
    }

    /// Applies a finished view load. Results for superseded loads are dropped.
    pub fn on_view(&mut self, msg: ViewMessage) {
        if msg.seq != self.view_seq {
            tracing::debug!(seq = msg.seq, "Discarding stale view load");
            return;
        }
        self.loading = false;
        match msg.outcome {
            Ok(content) => {
                self.content = content;
                self.select_first();
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %self.route.path(), "View load failed");
                let notice = load_failure_notice(&self.route, &e);
                self.push_notice(notice);
            }
        }
    }

    /// Applies a search controller message.
    pub fn on_search(&mut self, msg: SearchMessage) {
        if let Some(notice) = self.search.handle(msg) {
            self.push_notice(notice);
        }
    }

    /// Applies a recommendation form message.
    pub fn on_recommend(&mut self, msg: RecommendMessage) {
        let before = self.recommend.results().len();
        if let Some(notice) = self.recommend.handle(msg) {
            self.push_notice(notice);
        }
        if self.route == Route::Recommend && self.recommend.results().len() != before {
            self.select_first();
        }
    }

    // --- Notices ---

    /// Shows a notice, dropping the oldest beyond the display limit.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(ActiveNotice {
            notice,
            raised_at: Instant::now(),
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    /// Removes notices older than [`NOTICE_TTL`].
    pub fn expire_notices(&mut self) {
        self.notices.retain(|n| n.raised_at.elapsed() < NOTICE_TTL);
    }

    // --- Input ---

    /// Handles a key press. Returns `true` to exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.focus {
            Focus::Search => {
                self.handle_search_key(key.code);
                false
            }
            Focus::Form => {
                self.handle_form_key(key.code);
                false
            }
            Focus::Content => self.handle_content_key(key.code),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.search.dismiss();
                self.focus = Focus::Content;
            }
            KeyCode::Enter => {
                if let Some(route) = self.search.select_highlighted() {
                    self.navigate(route);
                }
            }
            KeyCode::Up => self.search.move_up(),
            KeyCode::Down => self.search.move_down(),
            KeyCode::Backspace => self.search.pop_char(),
            KeyCode::Char(c) => self.search.push_char(c),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.focus = Focus::Content,
            KeyCode::Tab => self.recommend.toggle_mode(),
            KeyCode::Enter => {
                if let Some(notice) = self.recommend.submit() {
                    self.push_notice(notice);
                }
            }
            KeyCode::Left if self.recommend.mode == RecommendMode::Mood => {
                self.recommend.prev_mood();
            }
            KeyCode::Right if self.recommend.mode == RecommendMode::Mood => {
                self.recommend.next_mood();
            }
            KeyCode::Backspace if self.recommend.mode == RecommendMode::Movie => {
                self.recommend.movie_name.pop();
            }
            KeyCode::Char(c) if self.recommend.mode == RecommendMode::Movie => {
                self.recommend.movie_name.push(c);
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/' | 's') => self.focus = Focus::Search,
            KeyCode::Char('h') => self.navigate(Route::Home),
            KeyCode::Char('p') => self.navigate(Route::Popular),
            KeyCode::Char('t') => self.navigate(Route::Trending),
            KeyCode::Char('r') => self.navigate(Route::Recommend),
            KeyCode::Char('i') if self.route == Route::Recommend => self.focus = Focus::Form,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.back();
            }
            KeyCode::Tab => self.toggle_trending_tab(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('o') => self.open_poster(),
            _ => {}
        }
        false
    }

    /// Handles a mouse event against the last drawn layout.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(event.column, event.row);

        if let Some(dropdown) = self.hitboxes.dropdown
            && dropdown.contains(pos)
        {
            // Rows start below the top border; border clicks select nothing.
            if pos.y > dropdown.y {
                let row = usize::from(pos.y.saturating_sub(dropdown.y.saturating_add(1)));
                if let Some(route) = self.search.select_at(row) {
                    self.navigate(route);
                }
            }
            return;
        }

        if self.hitboxes.search.contains(pos) {
            self.focus = Focus::Search;
        } else if self.focus == Focus::Search || self.search.dropdown_visible() {
            self.search.dismiss();
            self.focus = Focus::Content;
        }
    }

    // --- List helpers ---

    fn select_first(&mut self) {
        let first = (!self.list().is_empty()).then_some(0);
        self.table_state.select(first);
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.list().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            current.saturating_add(1).min(len.saturating_sub(1))
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn toggle_trending_tab(&mut self) {
        if self.route != Route::Trending {
            return;
        }
        self.trending_tab = match self.trending_tab {
            TrendingTab::Movies => TrendingTab::TvShows,
            TrendingTab::TvShows => TrendingTab::Movies,
        };
        self.select_first();
    }

    fn open_selected(&mut self) {
        // TV shows have no details endpoint.
        if self.route == Route::Trending && self.trending_tab == TrendingTab::TvShows {
            return;
        }
        if matches!(self.content, Content::Details(_)) {
            return;
        }
        if let Some(id) = self.current_movie().map(|m| m.id) {
            self.navigate(Route::MovieDetails { id });
        }
    }

    fn open_poster(&self) {
        let Some(movie) = self.current_movie() else {
            return;
        };
        if movie.poster_path.is_none() {
            return;
        }
        let url = movie.poster_url(ImageSize::Original);
        if let Err(e) = open::that(&url) {
            tracing::debug!(error = %e, url = %url, "Failed to open poster");
        }
    }
}

/// Fetches the data for `route`.
async fn load_content<A>(api: &A, route: &Route) -> cinescope_api::Result<Content>
where
    A: MovieApi + Sync,
{
    match route {
        Route::Home => {
            let (popular, trending) =
                tokio::try_join!(api.get_popular_movies(), api.get_trending())?;
            Ok(Content::Home {
                popular: popular.into_iter().take(HOME_POPULAR_LIMIT).collect(),
                trending: trending
                    .movies
                    .into_iter()
                    .take(HOME_TRENDING_LIMIT)
                    .collect(),
            })
        }
        Route::Popular => Ok(Content::Movies(api.get_popular_movies().await?)),
        Route::Trending => Ok(Content::Trending(api.get_trending().await?)),
        Route::SearchResults { query } => {
            Ok(Content::Movies(api.search_movies(query).await?.movies))
        }
        Route::MovieDetails { id } => match api.get_movie_details(*id).await {
            Ok(movie) => Ok(Content::Details(Box::new(movie))),
            Err(ApiError::NotFound { .. }) => Ok(Content::NotFound),
            Err(e) => Err(e),
        },
        Route::Recommend => Ok(Content::Empty),
    }
}

/// Notice for a failed view load.
fn load_failure_notice(route: &Route, err: &ApiError) -> Notice {
    if err.is_timeout() {
        return Notice::error("Loading Error", err.user_message());
    }
    match route {
        Route::Home => Notice::error(
            "Loading Error",
            "Failed to load movies. Please check if the backend is running.",
        ),
        Route::Popular => Notice::error(
            "Loading Error",
            "Failed to load popular movies. Please try again.",
        ),
        Route::Trending => Notice::error(
            "Loading Error",
            "Failed to load trending content. Please try again.",
        ),
        Route::SearchResults { .. } => Notice::error(
            "Search Error",
            "Failed to search movies. Please try again.",
        ),
        Route::MovieDetails { .. } => Notice::error(
            "Loading Error",
            "Failed to load movie details. Please try again.",
        ),
        Route::Recommend => Notice::error("Error", err.user_message()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::super::fake::FakeApi;
    use super::super::notice::NoticeLevel;
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(api: FakeApi) -> (App<FakeApi>, Arc<FakeApi>, Inbox) {
        let api = Arc::new(api);
        let (app, inbox) = App::new(Arc::clone(&api));
        (app, api, inbox)
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_truncates_sections() {
        // Arrange
        let (mut app, api, mut inbox) = app(FakeApi::with_results(20));

        // Act
        app.navigate(Route::Home);
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        let Content::Home { popular, trending } = app.content() else {
            panic!("expected home content");
        };
        assert_eq!(popular.len(), HOME_POPULAR_LIMIT);
        assert_eq!(trending.len(), HOME_TRENDING_LIMIT);
        assert_eq!(api.calls().len(), 2);
        assert_eq!(app.table_state.selected(), Some(0));
        assert!(!app.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_movie_renders_not_found() {
        // Arrange
        let api = FakeApi::default().failing(|| ApiError::NotFound {
            what: String::from("movie 42"),
        });
        let (mut app, _api, mut inbox) = app(api);

        // Act
        app.navigate(Route::MovieDetails { id: 42 });
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        assert_eq!(app.content(), &Content::NotFound);
        assert_eq!(app.notices().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_raises_notice() {
        // Arrange
        let api = FakeApi::default().failing(|| ApiError::Server {
            status: 503,
            path: String::from("popular"),
        });
        let (mut app, _api, mut inbox) = app(api);

        // Act
        app.navigate(Route::Popular);
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        let notice = app.notices().next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.description,
            "Failed to load popular movies. Please try again."
        );
        assert_eq!(app.route(), &Route::Popular);
        assert_eq!(app.content(), &Content::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_is_discarded() {
        // Arrange
        let api = FakeApi::with_results(3).delay("popular", Duration::from_secs(1));
        let (mut app, _api, mut inbox) = app(api);

        // Act
        app.navigate(Route::Popular);
        app.navigate(Route::Trending);
        let first = inbox.view.recv().await.unwrap();
        app.on_view(first);
        let second = inbox.view.recv().await.unwrap();
        app.on_view(second);

        // Assert
        assert!(matches!(app.content(), Content::Trending(_)));
        assert_eq!(app.route(), &Route::Trending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_dropdown_selection_opens_details() {
        // Arrange
        let (mut app, api, mut inbox) = app(FakeApi::with_results(3));
        app.handle_key(press(KeyCode::Char('/')));
        for c in "alien".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }

        // Act
        app.on_search(inbox.search.recv().await.unwrap());
        app.on_search(inbox.search.recv().await.unwrap());
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Enter));
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        assert_eq!(app.route(), &Route::MovieDetails { id: 2 });
        assert_eq!(app.focus(), Focus::Content);
        assert_eq!(app.search.query(), "");
        assert_eq!(api.calls(), ["search:alien", "movie:2"]);
        assert_eq!(app.current_movie().unwrap().id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_submit_opens_results_view() {
        // Arrange
        let (mut app, api, mut inbox) = app(FakeApi::with_results(7));
        app.handle_key(press(KeyCode::Char('/')));
        app.handle_key(press(KeyCode::Char('u')));
        app.handle_key(press(KeyCode::Char('p')));

        // Act: Enter before the dropdown appears submits the full search
        app.handle_key(press(KeyCode::Enter));
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        assert_eq!(
            app.route(),
            &Route::SearchResults {
                query: String::from("up")
            }
        );
        assert_eq!(app.list().len(), 7);
        assert_eq!(api.calls(), ["search:up"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_outside_dismisses_search() {
        // Arrange
        let (mut app, _api, _inbox) = app(FakeApi::default());
        app.hitboxes.search = Rect::new(0, 0, 40, 3);
        app.handle_key(press(KeyCode::Char('/')));
        app.handle_key(press(KeyCode::Char('x')));

        // Act
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 20,
            modifiers: KeyModifiers::NONE,
        });

        // Assert
        assert_eq!(app.focus(), Focus::Content);
        assert_eq!(app.search.query(), "");
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropdown_border_click_selects_nothing() {
        // Arrange
        let (mut app, api, mut inbox) = app(FakeApi::with_results(3));
        app.handle_key(press(KeyCode::Char('/')));
        for c in "heat".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.on_search(inbox.search.recv().await.unwrap());
        app.on_search(inbox.search.recv().await.unwrap());
        app.hitboxes.search = Rect::new(0, 0, 40, 3);
        app.hitboxes.dropdown = Some(Rect::new(0, 3, 40, 6));

        // Act
        app.handle_mouse(left_click(5, 3));

        // Assert
        assert_eq!(app.route(), &Route::Home);
        assert!(app.search.dropdown_visible());
        assert_eq!(api.calls(), ["search:heat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropdown_row_click_opens_movie() {
        // Arrange
        let (mut app, _api, mut inbox) = app(FakeApi::with_results(3));
        app.handle_key(press(KeyCode::Char('/')));
        for c in "heat".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.on_search(inbox.search.recv().await.unwrap());
        app.on_search(inbox.search.recv().await.unwrap());
        app.hitboxes.dropdown = Some(Rect::new(0, 3, 40, 6));

        // Act: first row sits just below the top border
        app.handle_mouse(left_click(5, 4));

        // Assert
        assert_eq!(app.route(), &Route::MovieDetails { id: 1 });
        assert_eq!(app.search.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_returns_to_previous_route() {
        // Arrange
        let (mut app, _api, mut inbox) = app(FakeApi::with_results(2));
        app.navigate(Route::Popular);
        app.on_view(inbox.view.recv().await.unwrap());
        app.handle_key(press(KeyCode::Enter));
        app.on_view(inbox.view.recv().await.unwrap());

        // Act
        let went_back = app.back();
        app.on_view(inbox.view.recv().await.unwrap());

        // Assert
        assert!(went_back);
        assert_eq!(app.route(), &Route::Popular);
        assert_eq!(app.list().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending_tab_switches_list() {
        // Arrange
        let (mut app, _api, mut inbox) = app(FakeApi::with_results(2));
        app.navigate(Route::Trending);
        app.on_view(inbox.view.recv().await.unwrap());

        // Act
        app.handle_key(press(KeyCode::Tab));

        // Assert
        assert_eq!(app.trending_tab(), TrendingTab::TvShows);
        assert_eq!(app.list()[0].title, "show 0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recommend_form_validation_via_keys() {
        // Arrange
        let (mut app, api, _inbox) = app(FakeApi::with_results(2));
        app.handle_key(press(KeyCode::Char('r')));

        // Act
        app.handle_key(press(KeyCode::Enter));

        // Assert
        assert_eq!(app.focus(), Focus::Form);
        assert_eq!(app.notices().next().unwrap().title, "Movie Required");
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_expire() {
        // Arrange
        let (mut app, _api, _inbox) = app(FakeApi::default());
        app.push_notice(Notice::info("Hello", "world"));

        // Act
        tokio::time::advance(NOTICE_TTL).await;
        app.expire_notices();

        // Assert
        assert_eq!(app.notices().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_keys() {
        // Arrange
        let (mut app, _api, _inbox) = app(FakeApi::default());

        // Act & Assert
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.handle_key(press(KeyCode::Char('q'))));
    }
}
