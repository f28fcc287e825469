use ratatui::layout::Rect;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::palette::Palette;
use super::screen::Screen;

/// Table of contents drawn over the left side of the notes pane.
pub fn draw(f: &mut Frame, area: Rect, screen: &mut Screen, palette: &Palette) {
    let width = (area.width * 2 / 5).max(24).min(area.width);
    let sidebar_area = Rect {
        width,
        ..area
    };
    screen.sidebar_area = Some(sidebar_area);

    let block = Block::default()
        .title(Line::from(" Contents ").style(palette.accent()))
        .borders(Borders::ALL)
        .border_style(palette.accent())
        .style(palette.base());

    f.render_widget(Clear, sidebar_area);

    if let Some(placeholder) = &screen.sidebar.placeholder {
        let paragraph = Paragraph::new(placeholder.clone())
            .style(palette.muted())
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, sidebar_area);
        return;
    }

    let mut items = Vec::new();
    for entry in &screen.sidebar.entries {
        let style = if entry.active {
            palette.accent()
        } else {
            palette.base()
        };
        let marker = if entry.active { "\u{25B8} " } else { "  " };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(entry.title.clone(), style),
        ])));
        for sub in &entry.subheadings {
            items.push(ListItem::new(Line::styled(
                format!("    \u{2022} {}", sub.text),
                palette.muted(),
            )));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, sidebar_area, &mut screen.sidebar_state);
}
