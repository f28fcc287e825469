use flashcard_core::ViewMode;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::palette::Palette;
use super::screen::Screen;

pub fn draw(f: &mut Frame, area: Rect, screen: &Screen, palette: &Palette) {
    let hints = if screen.picker.is_some() {
        " Up/Down: choose  Enter: apply  Esc: cancel "
    } else {
        match screen.mode {
            ViewMode::Cards => {
                " Space/Enter: flip  Left/Right: prev/next  c: category  m: notes  t: theme  q: quit "
            }
            ViewMode::Notes if screen.sidebar.open => {
                " Up/Down: select  Enter: open  Esc: close contents  q: quit "
            }
            ViewMode::Notes => {
                " Left/Right: prev/next section  s: contents  j/k: scroll  m: cards  t: theme  q: quit "
            }
        }
    };

    let status = Paragraph::new(hints).style(
        Style::default()
            .bg(palette.highlight)
            .fg(palette.text),
    );
    f.render_widget(status, area);
}
