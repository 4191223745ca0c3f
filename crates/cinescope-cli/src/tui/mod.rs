//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Terminal events, timers, and
//! request results are multiplexed on the current runtime; spawned tasks
//! only send messages back to the loop, which owns all state.

/// Browser state and input handling.
pub mod app;
/// Transient notices.
pub mod notice;
/// Recommendation form controller.
pub mod recommend;
/// Views and their paths.
pub mod route;
/// Debounced search controller.
pub mod search;
/// Cancellable delayed messages.
pub mod timer;
mod ui;

#[cfg(test)]
mod fake;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinescope_api::MovieApi;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::app::{App, Inbox};
use self::route::Route;

/// Redraw and notice-expiry interval when nothing else happens.
const TICK: Duration = Duration::from_millis(250);

/// Runs the movie browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<A>(api: Arc<A>) -> Result<()>
where
    A: MovieApi + Send + Sync + 'static,
{
    let (mut app, mut inbox) = App::new(api);
    app.navigate(Route::Home);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut inbox).await;

    // Cleanup (every step runs even if an earlier one or the event loop failed)
    let mut restore = RestoreErrors::default();
    restore.record("failed to disable raw mode", disable_raw_mode());
    restore.record(
        "failed to leave alternate screen",
        crossterm::execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen),
    );
    restore.record("failed to restore cursor", terminal.show_cursor());

    result.and(restore.finish())
}

/// Collects terminal restore failures, keeping the first.
#[derive(Debug, Default)]
struct RestoreErrors {
    first: Option<anyhow::Error>,
}

impl RestoreErrors {
    /// Records the outcome of one restore step.
    fn record(&mut self, step: &'static str, outcome: io::Result<()>) {
        let Err(e) = outcome else {
            return;
        };
        tracing::warn!(error = %e, step, "Terminal restore step failed");
        if self.first.is_none() {
            self.first = Some(anyhow::Error::new(e).context(step));
        }
    }

    /// Returns the first recorded failure, if any.
    fn finish(self) -> Result<()> {
        self.first.map_or(Ok(()), Err)
    }
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
    inbox: &mut Inbox,
) -> Result<()>
where
    A: MovieApi + Send + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("failed to draw TUI")?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        return Ok(());
                    }
                }
                Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read event"),
                None => return Ok(()),
            },
            Some(msg) = inbox.search.recv() => app.on_search(msg),
            Some(msg) = inbox.recommend.recv() => app.on_recommend(msg),
            Some(msg) = inbox.view.recv() => app.on_view(msg),
            _ = tick.tick() => app.expire_notices(),
        }
    }
}
