use flashcard_core::ViewMode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use super::palette::Palette;
use super::screen::Screen;
use super::{card_widget, category_picker, notes_widget, sidebar_widget, status_bar};

pub fn draw(f: &mut Frame, screen: &mut Screen) {
    let palette = Palette::for_theme(screen.theme);
    let size = f.area();
    f.render_widget(Block::default().style(palette.base()), size);

    // Header, main area, status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(f, outer[0], screen, &palette);

    match screen.mode {
        ViewMode::Cards => {
            screen.sidebar_area = None;
            card_widget::draw(f, outer[1], screen, &palette);
            if screen.picker.is_some() {
                category_picker::draw(f, size, screen, &palette);
            }
        }
        ViewMode::Notes => {
            screen.card_area = None;
            notes_widget::draw(f, outer[1], screen, &palette);
            if screen.sidebar.open {
                sidebar_widget::draw(f, outer[1], screen, &palette);
            } else {
                screen.sidebar_area = None;
            }
        }
    }

    status_bar::draw(f, outer[2], screen, &palette);
}

fn draw_header(f: &mut Frame, area: Rect, screen: &Screen, palette: &Palette) {
    let title = match screen.mode {
        ViewMode::Cards => " Flashcards",
        ViewMode::Notes => " Notes",
    };
    let controls = format!(
        "[m] {}   [t] {} ",
        screen.mode.switch_label(),
        screen.theme.indicator()
    );

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(controls.chars().count() as u16 + 1)])
        .split(area);

    f.render_widget(Paragraph::new(title).style(palette.accent()), halves[0]);
    f.render_widget(
        Paragraph::new(controls)
            .style(palette.muted())
            .alignment(Alignment::Right),
        halves[1],
    );
}
