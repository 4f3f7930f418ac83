//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events and a periodic tick.
//! The tick drives the two time-based behaviors: status message expiry and
//! the search debounce — when a session's deadline has passed, the due
//! request is claimed here and dispatched as a background task.

use crate::app::{App, AppEvent};
use crate::search::SearchRequest;
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: key presses from crossterm's async event stream
/// - **Background tasks**: store fetches and search responses via `AppEvent`
/// - **Periodic tick**: 250ms timer for status expiry and debounced search
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // Signal handlers for graceful shutdown (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending app events before waiting, so search responses are
        // not starved behind rapid typing
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    app.needs_redraw = true;
                    match handle_input(app, key.code, key.modifiers, &event_tx) {
                        Action::Quit => break,
                        Action::Continue => {}
                    }
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app, &event_tx);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Handle the periodic tick: claim and dispatch a due search request.
///
/// The session hands out at most one request per settled debounce window;
/// dispatch happens here rather than on the keystroke so rapid typing costs
/// nothing.
fn handle_tick(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.search_surface.is_open() {
        if let Some(request) = app.search.poll_deadline() {
            app.needs_redraw = true;
            spawn_search(app, request, event_tx);
        }
    }
}

/// Dispatch a search request as a background task.
///
/// The task is never aborted: a superseded response is discarded by the
/// session's request-id check when it arrives. Collaborator failures are
/// folded into an empty result set inside `CmsClient::search`.
fn spawn_search(app: &App, request: SearchRequest, event_tx: &mpsc::Sender<AppEvent>) {
    let cms = app.cms.clone();
    let tx = event_tx.clone();

    tracing::debug!(request_id = request.id, query = %request.query, "Spawning search task");

    tokio::spawn(async move {
        let results = cms.search(&request.query).await;
        let event = AppEvent::SearchCompleted {
            request_id: request.id,
            query: request.query,
            results,
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send search results (receiver dropped)");
        }
    });
}

/// Dispatch a store refresh as a background task.
///
/// Fetch failures become a display string here; the UI keeps the previous
/// store and shows a status message instead of failing.
pub(super) fn spawn_store_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.loading_store {
        tracing::debug!("Store load already in flight, ignoring refresh");
        return;
    }
    app.loading_store = true;

    let cms = app.cms.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let result = cms
            .fetch_all_articles()
            .await
            .map_err(|e| e.to_string());
        if let Err(e) = tx.send(AppEvent::StoreLoaded { result }).await {
            tracing::warn!(error = %e, "Failed to send store (receiver dropped)");
        }
    });
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
