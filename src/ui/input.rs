//! Keyboard input dispatch.
//!
//! Input is routed by surface: the search overlay and the navigation menu
//! capture keys while open; otherwise keys drive the listing. Each handler
//! is a plain transition function on `App` — the only side effects are
//! spawning background work and handing navigation targets to the OS.

use crate::app::{App, AppEvent};
use crate::listing::SortMode;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::loop_runner::{spawn_store_load, Action};

/// Top-level key dispatch.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Ctrl+C always quits, regardless of surface
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.search_surface.is_open() {
        handle_search_input(app, code);
        return Action::Continue;
    }

    if app.menu.is_open() {
        handle_menu_input(app, code);
        return Action::Continue;
    }

    handle_browse_input(app, code, event_tx)
}

/// Keys for the listing view.
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('/') | KeyCode::Char('s') => app.open_search(),
        KeyCode::Char('m') | KeyCode::Tab => app.toggle_menu(),
        KeyCode::Char('r') => {
            app.set_status("Recarregando artigos...");
            spawn_store_load(app, event_tx);
        }
        KeyCode::Left | KeyCode::Char('h') => app.cycle_category(-1),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_category(1),
        KeyCode::Char('o') => {
            app.cycle_sort();
            app.set_status(app.view_state.sort_mode.label());
        }
        KeyCode::Char('1') => app.set_sort(SortMode::Recent),
        KeyCode::Char('2') => app.set_sort(SortMode::Oldest),
        KeyCode::Char('3') => app.set_sort(SortMode::Alphabetical),
        KeyCode::Up | KeyCode::Char('k') => app.nav_up(),
        KeyCode::Down | KeyCode::Char('j') => app.nav_down(),
        KeyCode::Enter => {
            if let Some(article) = app.selected_article() {
                let slug = article.slug.clone();
                navigate(app, &slug);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Keys while the search overlay is open.
///
/// Typing feeds the session, which owns the debounce; the actual dispatch
/// happens on the next tick once the deadline settles.
fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_search(),
        KeyCode::Enter => {
            if let Some(slug) = app.search.select() {
                app.close_search();
                navigate(app, &slug);
            }
        }
        KeyCode::Up => app.search.move_selection(-1),
        KeyCode::Down => app.search.move_selection(1),
        KeyCode::Backspace => app.search.backspace(),
        KeyCode::Char(c) => {
            if c.is_control() {
                return;
            }
            if app.search.query.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Pesquisa limitada a {} caracteres",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return;
            }
            app.search.push_char(c);
        }
        _ => {}
    }
}

/// Keys while the navigation menu is open.
fn handle_menu_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('m') | KeyCode::Tab => app.close_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.menu_nav(-1),
        KeyCode::Down | KeyCode::Char('j') => app.menu_nav(1),
        KeyCode::Enter => {
            if let Some(article) = app.selected_menu_article() {
                let slug = article.slug.clone();
                app.close_menu();
                navigate(app, &slug);
            }
        }
        _ => {}
    }
}

/// Hand a navigation target to the OS.
///
/// The listing module only ever yields a slug; composing the public URL and
/// actually routing is the shell's job. Articles without a slug have no
/// page to open.
fn navigate(app: &mut App, slug: &str) {
    if slug.is_empty() {
        app.set_status("Este artigo ainda não tem página publicada");
        return;
    }
    let url = app.article_url(slug);
    match open::that(&url) {
        Ok(()) => {
            tracing::info!(url = %url, "Opened article in browser");
            app.set_status("Abrindo no navegador...");
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
            app.set_status(format!("Não foi possível abrir: {}", url));
        }
    }
}
