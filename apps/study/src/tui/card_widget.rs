use flashcard_core::{CardDisplay, CategoryFilter, Face};
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use super::palette::Palette;
use super::screen::Screen;

pub fn draw(f: &mut Frame, area: Rect, screen: &mut Screen, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    draw_category(f, rows[0], screen, palette);

    let card_area = rows[1].inner(Margin::new(2, 0));
    screen.card_area = Some(card_area);
    draw_card(f, card_area, &screen.card, palette);

    draw_navigation(f, rows[2], &screen.card, palette);
}

fn draw_category(f: &mut Frame, area: Rect, screen: &Screen, palette: &Palette) {
    let label = match &screen.categories.active {
        CategoryFilter::All => "All categories".to_string(),
        CategoryFilter::Category(name) => screen
            .categories
            .options
            .iter()
            .find(|o| o.name == *name)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| name.clone()),
    };

    let line = Line::from(vec![
        Span::styled("  Category: ", palette.muted()),
        Span::styled(label, palette.accent()),
        Span::styled("  (c to change)", palette.muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_card(f: &mut Frame, area: Rect, card: &CardDisplay, palette: &Palette) {
    let (title, body, style) = match card {
        CardDisplay::Loading => (
            String::new(),
            "Loading flashcards...".to_string(),
            palette.muted(),
        ),
        CardDisplay::Failed { message } => (
            String::new(),
            message.clone(),
            palette.base().fg(palette.error),
        ),
        CardDisplay::Empty { message, .. } => (String::new(), message.clone(), palette.muted()),
        CardDisplay::Card(view) => match view.face {
            Face::Question => (" Question ".to_string(), view.question.clone(), palette.base()),
            Face::Answer => (
                " Answer ".to_string(),
                view.answer.clone(),
                palette.base().add_modifier(Modifier::BOLD),
            ),
        },
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.accent())
        .padding(Padding::uniform(1));
    if !title.is_empty() {
        block = block.title(Line::from(title).style(palette.accent()));
    }
    if let CardDisplay::Card(view) = card {
        if !view.category.is_empty() {
            block = block.title_bottom(
                Line::from(format!(" {} ", view.category))
                    .style(palette.muted())
                    .right_aligned(),
            );
        }
    }

    let paragraph = Paragraph::new(body)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, area);
}

fn draw_navigation(f: &mut Frame, area: Rect, card: &CardDisplay, palette: &Palette) {
    let progress = match card {
        CardDisplay::Card(view) => view.progress.clone(),
        CardDisplay::Empty { progress, .. } => progress.clone(),
        _ => String::new(),
    };

    let line = Line::from(vec![
        Span::styled("\u{25C0} Prev", palette.control(card.can_previous())),
        Span::styled(format!("   {}   ", progress), palette.base()),
        Span::styled("Next \u{25B6}", palette.control(card.can_next())),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
