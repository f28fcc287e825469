use flashcard_core::NotesDisplay;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use super::markdown;
use super::palette::Palette;
use super::screen::Screen;

pub fn draw(f: &mut Frame, area: Rect, screen: &mut Screen, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let content_area = rows[0];

    let view = match &screen.notes {
        NotesDisplay::Section(view) => view,
        NotesDisplay::Loading => {
            draw_message(f, content_area, "Loading notes...", palette.muted());
            return;
        }
        NotesDisplay::Empty { message } => {
            draw_message(f, content_area, message, palette.muted());
            return;
        }
        NotesDisplay::Failed { message } => {
            draw_message(f, content_area, message, palette.base().fg(palette.error));
            return;
        }
    };

    let block = Block::default()
        .title(
            Line::from(format!(
                " {}/{} \u{00B7} {} ",
                view.index + 1,
                view.total,
                view.section.title
            ))
            .style(palette.accent()),
        )
        .borders(Borders::ALL)
        .border_style(palette.muted())
        .padding(Padding::horizontal(1));
    let inner = block.inner(content_area);
    let rendered = markdown::render_section(&view.section, palette, inner.width as usize);
    let (can_previous, can_next) = (view.can_previous, view.can_next);

    screen.content_rows = inner.height as usize;
    screen.content_len = rendered.lines.len();
    let max_scroll = screen.content_len.saturating_sub(screen.content_rows);

    if let Some(anchor) = screen.pending_anchor.take() {
        match rendered.anchors.get(&anchor) {
            Some(&row) => screen.scroll_target = Some(row.min(max_scroll)),
            None => tracing::debug!(%anchor, "Anchor not found in rendered section"),
        }
    }
    screen.content_scroll = screen.content_scroll.min(max_scroll);

    let paragraph = Paragraph::new(rendered.lines)
        .style(palette.base())
        .block(block)
        .scroll((scroll_offset(screen.content_scroll), 0));
    f.render_widget(paragraph, content_area);

    let line = Line::from(vec![
        Span::styled("\u{25C0} Prev", palette.control(can_previous)),
        Span::styled("   [s] Contents   ", palette.muted()),
        Span::styled("Next \u{25B6}", palette.control(can_next)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), rows[1]);
}

fn draw_message(f: &mut Frame, area: Rect, message: &str, style: Style) {
    let paragraph = Paragraph::new(message.to_string())
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::uniform(1)));
    f.render_widget(paragraph, area);
}

/// Paragraph offsets are `u16`; longer sections stop at the last addressable row.
fn scroll_offset(scroll: usize) -> u16 {
    u16::try_from(scroll).unwrap_or(u16::MAX)
}
