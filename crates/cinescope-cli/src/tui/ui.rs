//! TUI rendering for the movie browser.

use cinescope_api::{ImageSize, Mood, Movie, MovieApi, RatingClass};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};

use super::app::{App, Content, Focus, Hitboxes, TrendingTab};
use super::notice::{Notice, NoticeLevel};
use super::recommend::RecommendMode;
use super::route::Route;

/// Width of a notice toast, including borders.
const NOTICE_WIDTH: u16 = 48;

/// Draws the browser and records hit-test regions on `app`.
#[allow(clippy::indexing_slicing)]
pub fn draw<A>(frame: &mut Frame, app: &mut App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search + route
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    draw_search_box(frame, header[0], app);
    draw_route_info(frame, header[1], app);
    draw_main(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);

    let dropdown = draw_dropdown(frame, header[0], chunks[1], app);
    draw_notices(frame, chunks[1], app);

    app.hitboxes = Hitboxes {
        search: header[0],
        dropdown,
    };
}

// --- Styles ---

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

const fn rating_color(class: RatingClass) -> Color {
    match class {
        RatingClass::High => Color::Green,
        RatingClass::Medium => Color::Yellow,
        RatingClass::Low => Color::Red,
    }
}

/// Formats a runtime as `2h 16m`.
#[allow(clippy::arithmetic_side_effects, clippy::integer_division)]
fn fmt_runtime(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    }
}

// --- Header ---

fn draw_search_box<A>(frame: &mut Frame, area: Rect, app: &App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let focused = app.focus() == Focus::Search;
    let mut spans = vec![Span::raw(app.search.query().to_owned())];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
    }
    if app.search.is_loading() {
        spans.push(Span::styled("  searching...", Style::default().fg(Color::DarkGray)));
    }

    let title = if focused { " Search " } else { " Search: / " };
    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(focused)),
    );
    frame.render_widget(input, area);
}

fn draw_route_info<A>(frame: &mut Frame, area: Rect, app: &App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let status = if app.is_loading() {
        Span::styled("Loading...", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(app.route().path())
    };
    let info = Paragraph::new(Line::from(status)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" cinescope: {} ", app.route().title())),
    );
    frame.render_widget(info, area);
}

// --- Main ---

fn draw_main<A>(frame: &mut Frame, area: Rect, app: &mut App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let route = app.route().clone();
    if route == Route::Recommend {
        draw_recommend(frame, area, app);
        return;
    }

    if app.is_loading() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", route.title())));
        frame.render_widget(loading, area);
        return;
    }

    let focused = app.focus() == Focus::Content;
    match (app.content().clone(), &route) {
        (Content::Home { trending, .. }, _) => draw_home(frame, area, app, &trending),
        (Content::Movies(movies), Route::SearchResults { query }) => {
            if movies.is_empty() {
                draw_no_results(frame, area, query);
            } else {
                let noun = if movies.len() == 1 { "result" } else { "results" };
                let title = format!(" Found {} {noun} for \"{query}\" ", movies.len());
                draw_movie_table(frame, area, &movies, &title, focused, &mut app.table_state);
            }
        }
        (Content::Movies(movies), _) => {
            let title = format!(" {} ", route.title());
            draw_movie_table(frame, area, &movies, &title, focused, &mut app.table_state);
        }
        (Content::Trending(_), _) => draw_trending(frame, area, app),
        (Content::Details(movie), _) => draw_details(frame, area, &movie),
        (Content::NotFound, _) => draw_message(
            frame,
            area,
            "Movie Not Found",
            "The movie you're looking for doesn't exist or has been removed.",
        ),
        (Content::Empty, _) => draw_message(frame, area, route.title(), "Nothing to show."),
    }
}

/// Builds a movie table with title, year, rating, and genres columns.
fn movie_table<'a>(movies: &'a [Movie], title: &'a str, focused: bool) -> Table<'a> {
    let header = Row::new(vec!["Title", "Year", "Rating", "Genres"])
        .style(header_style())
        .bottom_margin(1);

    let rows: Vec<Row> = movies
        .iter()
        .map(|m| {
            Row::new(vec![
                Line::from(m.title.clone()),
                Line::from(m.year()),
                Line::from(Span::styled(
                    format!("\u{2605} {}", m.rating()),
                    Style::default().fg(rating_color(m.rating_class())),
                )),
                Line::from(m.genre_names()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Percentage(30),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style(focused)),
        )
        .row_highlight_style(highlight_style())
}

fn draw_movie_table(
    frame: &mut Frame,
    area: Rect,
    movies: &[Movie],
    title: &str,
    focused: bool,
    state: &mut TableState,
) {
    frame.render_stateful_widget(movie_table(movies, title, focused), area, state);
}

#[allow(clippy::indexing_slicing)]
fn draw_home<A>(frame: &mut Frame, area: Rect, app: &mut App<A>, trending: &[Movie])
where
    A: MovieApi + Send + Sync + 'static,
{
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let popular = app.list().to_vec();
    let focused = app.focus() == Focus::Content;
    draw_movie_table(
        frame,
        panes[0],
        &popular,
        " Popular Movies ",
        focused,
        &mut app.table_state,
    );

    let lines: Vec<Line> = trending
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::styled(
                    format!("{:>4} ", m.rating()),
                    Style::default().fg(rating_color(m.rating_class())),
                ),
                Span::raw(m.title.clone()),
                Span::styled(format!(" ({})", m.year()), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let trending = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Trending Now "));
    frame.render_widget(trending, panes[1]);
}

#[allow(clippy::indexing_slicing)]
fn draw_trending<A>(frame: &mut Frame, area: Rect, app: &mut App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let selected = match app.trending_tab() {
        TrendingTab::Movies => 0,
        TrendingTab::TvShows => 1,
    };
    let tabs = Tabs::new(vec!["Movies", "TV Shows"])
        .select(selected)
        .highlight_style(highlight_style())
        .block(Block::default().borders(Borders::ALL).title(" Tab: switch "));
    frame.render_widget(tabs, chunks[0]);

    let list = app.list().to_vec();
    let focused = app.focus() == Focus::Content;
    draw_movie_table(
        frame,
        chunks[1],
        &list,
        " Trending ",
        focused,
        &mut app.table_state,
    );
}

fn draw_details(frame: &mut Frame, area: Rect, movie: &Movie) {
    let mut facts = vec![Span::styled(
        format!("\u{2605} {}", movie.rating()),
        Style::default()
            .fg(rating_color(movie.rating_class()))
            .add_modifier(Modifier::BOLD),
    )];
    if movie.vote_count > 0 {
        facts.push(Span::raw(format!(" ({} votes)", movie.vote_count)));
    }
    let year = movie.year();
    if !year.is_empty() {
        facts.push(Span::raw(format!("  {year}")));
    }
    if let Some(runtime) = movie.runtime {
        facts.push(Span::raw(format!("  {}", fmt_runtime(runtime))));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(facts),
    ];
    let genres = movie.genre_names();
    if !genres.is_empty() {
        lines.push(Line::from(Span::styled(
            genres,
            Style::default().fg(Color::Magenta),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Overview", header_style())));
    lines.push(Line::from(
        movie
            .overview
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| String::from("No overview available for this movie.")),
    ));

    let companies: Vec<&str> = movie
        .production_companies
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    if !companies.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Production", header_style())));
        lines.push(Line::from(companies.join(", ")));
    }

    if movie.poster_path.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Poster: {}", movie.poster_url(ImageSize::Original)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Movie Details "));
    frame.render_widget(details, area);
}

fn draw_no_results(frame: &mut Frame, area: Rect, query: &str) {
    draw_message(
        frame,
        area,
        "No Results Found",
        &format!(
            "We couldn't find any movies matching \"{query}\". Try different keywords or check your spelling."
        ),
    );
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, body: &str) {
    let lines = vec![
        Line::from(Span::styled(title.to_owned(), header_style())),
        Line::from(""),
        Line::from(body.to_owned()),
    ];
    let message = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}

// --- Recommend ---

#[allow(clippy::indexing_slicing)]
fn draw_recommend<A>(frame: &mut Frame, area: Rect, app: &mut App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let form_focused = app.focus() == Focus::Form;
    let form = &app.recommend;

    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(format!("[{label}]"), highlight_style())
        } else {
            Span::raw(format!(" {label} "))
        }
    };
    let mut lines = vec![
        Line::from(vec![
            tab("By Movie", form.mode == RecommendMode::Movie),
            Span::raw(" "),
            tab("By Mood", form.mode == RecommendMode::Mood),
        ]),
        Line::from(""),
    ];

    match form.mode {
        RecommendMode::Movie => {
            lines.push(Line::from("Movie name:"));
            let mut input = vec![Span::styled(
                form.movie_name.clone(),
                Style::default().fg(Color::Yellow),
            )];
            if form_focused {
                input.push(Span::styled("_", Style::default().fg(Color::Cyan)));
            }
            lines.push(Line::from(input));
        }
        RecommendMode::Mood => {
            lines.push(Line::from("Mood:"));
            let moods: Vec<Span> = Mood::ALL
                .iter()
                .flat_map(|m| {
                    let span = if form.mood == Some(*m) {
                        Span::styled(format!("[{}]", m.label()), highlight_style())
                    } else {
                        Span::raw(format!(" {} ", m.label()))
                    };
                    [span, Span::raw(" ")]
                })
                .collect();
            lines.push(Line::from(moods));
        }
    }

    lines.push(Line::from(""));
    if form.is_loading() {
        lines.push(Line::from(Span::styled(
            "Getting recommendations...",
            Style::default().fg(Color::Yellow),
        )));
    }

    let form_widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Get Recommendations ")
            .border_style(border_style(form_focused)),
    );
    frame.render_widget(form_widget, panes[0]);

    let results = app.list().to_vec();
    if results.is_empty() {
        draw_message(
            frame,
            panes[1],
            "Recommendations",
            "Enter a movie name or pick a mood, then press Enter.",
        );
    } else {
        let focused = app.focus() == Focus::Content;
        draw_movie_table(
            frame,
            panes[1],
            &results,
            " Recommended For You ",
            focused,
            &mut app.table_state,
        );
    }
}

// --- Overlays ---

/// Draws the search dropdown under the search box. Returns its area.
fn draw_dropdown<A>(frame: &mut Frame, search: Rect, main: Rect, app: &App<A>) -> Option<Rect>
where
    A: MovieApi + Send + Sync + 'static,
{
    if !app.search.dropdown_visible() {
        return None;
    }
    let results = app.search.results();
    // Movie rows + "View all" row + borders.
    let wanted = u16::try_from(results.len()).unwrap_or(u16::MAX).saturating_add(3);
    let area = Rect {
        x: search.x,
        y: main.y,
        width: search.width,
        height: wanted.min(main.height),
    };

    let highlighted = app.search.highlighted();
    let mut lines: Vec<Line> = results
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let style = if i == highlighted {
                highlight_style()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(m.title.clone(), style),
                Span::styled(format!("  {}", m.year()), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("  \u{2605} {}", m.rating()),
                    Style::default().fg(rating_color(m.rating_class())),
                ),
            ])
        })
        .collect();
    let view_all_style = if highlighted == results.len() {
        highlight_style()
    } else {
        Style::default().fg(Color::Blue)
    };
    lines.push(Line::from(Span::styled(
        format!("View all results for \"{}\"", app.search.query().trim()),
        view_all_style,
    )));

    frame.render_widget(Clear, area);
    let dropdown = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(true)),
    );
    frame.render_widget(dropdown, area);
    Some(area)
}

/// Stacks notices in the top-right corner of the main area.
fn draw_notices<A>(frame: &mut Frame, main: Rect, app: &App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let width = NOTICE_WIDTH.min(main.width);
    let x = main.x.saturating_add(main.width.saturating_sub(width));
    let mut y = main.y;

    for notice in app.notices() {
        let height = 4;
        if y.saturating_add(height) > main.y.saturating_add(main.height) {
            break;
        }
        let area = Rect {
            x,
            y,
            width,
            height,
        };
        frame.render_widget(Clear, area);
        frame.render_widget(notice_widget(notice), area);
        y = y.saturating_add(height);
    }
}

fn notice_widget(notice: &Notice) -> Paragraph<'_> {
    let color = match notice.level {
        NoticeLevel::Info => Color::Blue,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    Paragraph::new(notice.description.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", notice.title))
                .border_style(Style::default().fg(color)),
        )
}

// --- Footer ---

fn draw_footer<A>(frame: &mut Frame, area: Rect, app: &App<A>)
where
    A: MovieApi + Send + Sync + 'static,
{
    let help = match app.focus() {
        Focus::Search => {
            "Type to search | \u{2191}\u{2193}: highlight | Enter: open | Esc: close"
        }
        Focus::Form => "Type movie | Tab: movie/mood | \u{2190}\u{2192}: mood | Enter: submit | Esc: done",
        Focus::Content => match app.route() {
            Route::Recommend => {
                "i: edit form  \u{2191}\u{2193}/j/k: move  Enter: details  h/p/t: views  b: back  q: quit"
            }
            Route::Trending => {
                "Tab: movies/tv  \u{2191}\u{2193}/j/k: move  Enter: details  /: search  b: back  q: quit"
            }
            Route::MovieDetails { .. } => "o: open poster  /: search  h/p/t/r: views  b: back  q: quit",
            _ => {
                "\u{2191}\u{2193}/j/k: move  Enter: details  o: poster  /: search  h/p/t/r: views  b: back  q: quit"
            }
        },
    };
    let footer = Paragraph::new(Line::from(help)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
