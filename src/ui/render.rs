//! Listing view rendering.
//!
//! Layout, top to bottom: header bar (title, or the search input while the
//! overlay is open), category chip row with counts, the article list, and
//! a status line. Overlays (search results, menu) are drawn on top.

use crate::app::App;
use crate::listing::ViewState;
use crate::util::{format_month_year, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{menu, search};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = Paragraph::new(format!(
            "Terminal muito pequeno\nMínimo: {}x{}",
            MIN_WIDTH, MIN_HEIGHT
        ))
        .alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // category chips
            Constraint::Min(0),    // article list
            Constraint::Length(1), // status line
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_chips(f, app, chunks[1]);
    render_articles(f, app, chunks[2]);
    render_status(f, app, chunks[3]);

    // Overlays on top of the listing
    if app.search_surface.is_open() {
        search::render(f, app, chunks[0]);
    } else if app.menu.is_open() {
        menu::render(f, app);
    }
}

/// Header bar: blog identity, or the search input while the overlay is open.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_surface.is_open() {
        let marker = if app.search.is_searching() { "⟳" } else { "🔎" };
        Line::from(vec![
            Span::styled(
                format!("{} Pesquisar artigos: ", marker),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::raw(strip_control_chars(&app.search.query).into_owned()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(vec![
            Span::styled("banca", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" — "),
            Span::styled(
                app.site_url.to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ])
    };

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Category chip row: "Todos" plus one chip per topic with its article
/// count. The active chip is highlighted.
fn render_chips(f: &mut Frame, app: &App, area: Rect) {
    let active = Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD);
    let inactive = Style::default().add_modifier(Modifier::DIM);
    let is_all = app.view_state.active_category.is_none();

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(" Todos ", if is_all { active } else { inactive }),
    ];

    for topic in app.topics.iter() {
        let selected = app.view_state.active_category.as_deref() == Some(topic.slug.as_str());
        let label = match app.counts.get(topic.slug.as_str()) {
            Some(count) => format!(" {} ({}) ", topic.title, count),
            None => format!(" {} ", topic.title),
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, if selected { active } else { inactive }));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The article list under the current [`ViewState`].
fn render_articles(f: &mut Frame, app: &App, area: Rect) {
    if app.visible.is_empty() {
        let msg = if app.loading_store {
            "Carregando artigos..."
        } else {
            "Nenhum post encontrado nesta categoria."
        };
        let placeholder = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(sort_block(&app.view_state));
        f.render_widget(placeholder, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|article| ListItem::new(article_line(app, article, width)))
        .collect();

    let list = List::new(items)
        .block(sort_block(&app.view_state))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, area, &mut state);
}

/// Bordered block whose title shows the active sort order.
fn sort_block(view_state: &ViewState) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", view_state.sort_mode.label()))
}

/// One listing row: title, topic title and publication month.
fn article_line<'a>(app: &App, article: &crate::cms::ArticleSummary, width: usize) -> Line<'a> {
    let title = if article.title.is_empty() {
        "Sem título".to_string()
    } else {
        strip_control_chars(&article.title).into_owned()
    };

    let mut meta = Vec::new();
    if let Some(slug) = article.category.as_deref() {
        if let Some(topic) = app.topics.iter().find(|t| t.slug == slug) {
            meta.push(topic.title.clone());
        }
    }
    if let Some(published) = article.published_at {
        meta.push(format_month_year(published));
    }

    let meta = if meta.is_empty() {
        String::new()
    } else {
        format!("  [{}]", meta.join(" · "))
    };

    let title_width = width.saturating_sub(crate::util::display_width(&meta));
    Line::from(vec![
        Span::raw(truncate_to_width(&title, title_width).into_owned()),
        Span::styled(meta, Style::default().add_modifier(Modifier::DIM)),
    ])
}

/// Status line: the current message, or the key hints.
fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some((msg, _)) => Line::from(Span::raw(msg.to_string())),
        None => Line::from(Span::styled(
            " q sair · / pesquisar · m menu · ←→ categoria · o ordenar · r recarregar",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Centered rect helper for overlays.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
