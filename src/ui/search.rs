//! Search results overlay, anchored below the header where the input lives.

use crate::app::App;
use crate::search::{SearchStatus, MIN_QUERY_CHARS};
use crate::util::strip_control_chars;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the result dropdown under the header. Nothing is drawn until the
/// query reaches the minimum length — short queries never searched, so
/// there is nothing to report.
pub(super) fn render(f: &mut Frame, app: &App, header: Rect) {
    if app.search.query.trim().chars().count() < MIN_QUERY_CHARS {
        return;
    }

    let height = (app.search.results.len() as u16 + 2).clamp(3, 12);
    let area = Rect {
        x: header.x + 1,
        y: header.y + header.height,
        width: header.width.saturating_sub(2),
        height: height.min(f.area().height.saturating_sub(header.height)),
    };

    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title(" Resultados ");

    match app.search.status() {
        SearchStatus::Searching | SearchStatus::Debouncing => {
            let msg = Paragraph::new("Buscando...")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
        }
        SearchStatus::Done if app.search.results.is_empty() => {
            let msg = Paragraph::new("Nenhum resultado encontrado")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
        }
        SearchStatus::Done => {
            let items: Vec<ListItem> = app
                .search
                .results
                .iter()
                .map(|article| {
                    let title = strip_control_chars(&article.title).into_owned();
                    let mut spans = vec![Span::raw(title)];
                    if let Some(desc) = article.description.as_deref() {
                        spans.push(Span::styled(
                            format!(" — {}", strip_control_chars(desc)),
                            Style::default().add_modifier(Modifier::DIM),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(app.search.selected));
            f.render_stateful_widget(list, area, &mut state);
        }
        SearchStatus::Idle => {}
    }
}
