use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use super::palette::Palette;
use super::screen::Screen;

/// Popup list of categories, "All categories" first.
pub fn draw(f: &mut Frame, area: Rect, screen: &Screen, palette: &Palette) {
    let mut items = vec![ListItem::new("All categories")];
    items.extend(
        screen
            .categories
            .options
            .iter()
            .map(|o| ListItem::new(o.label.clone())),
    );

    let width = screen
        .categories
        .options
        .iter()
        .map(|o| o.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(16) as u16
        + 6;
    let height = items.len() as u16 + 2;
    let popup = centered(area, width, height);

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Category ")
                .borders(Borders::ALL)
                .border_style(palette.accent()),
        )
        .style(palette.base())
        .highlight_style(palette.accent().add_modifier(Modifier::REVERSED))
        .highlight_symbol("\u{25B8} ");

    let mut state = ListState::default().with_selected(screen.picker);
    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
