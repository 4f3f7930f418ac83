//! Navigation menu overlay: every topic with its articles.

use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::render::centered_rect;

/// Render the menu as a centered overlay. Sections follow the configured
/// topic order; the flattened selection index highlights one article row.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    let mut flat_index = 0usize;

    for section in &app.menu_sections {
        lines.push(Line::from(Span::styled(
            section.topic.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        if section.articles.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (nenhum artigo)",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }

        for article in &section.articles {
            let selected = flat_index == app.menu_selected;
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let marker = if selected { "› " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker, strip_control_chars(&article.title)),
                style,
            )));
            flat_index += 1;
        }

        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from("Nenhum tópico configurado"));
    }

    // Keep the selected row in view for long menus
    let selected_line = lines
        .iter()
        .position(|l| l.spans.iter().any(|s| s.content.starts_with('›')))
        .unwrap_or(0);
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = selected_line.saturating_sub(visible.saturating_sub(1)) as u16;

    let menu = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Menu "))
        .scroll((scroll, 0));
    f.render_widget(menu, area);
}
