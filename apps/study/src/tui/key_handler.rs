use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flashcard_core::{Action, ViewMode};
use ratatui::layout::{Margin, Position};

use super::screen::{Screen, SidebarItem};

/// Decode a key press. Purely visual keys are handled here; everything else becomes
/// an [`Action`] for the controller.
pub fn handle_key(screen: &mut Screen, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        screen.quit = true;
        return None;
    }

    if let Some(row) = screen.picker {
        return handle_picker_key(screen, key, row);
    }
    if screen.mode == ViewMode::Notes && screen.sidebar.open {
        if let Some(action) = handle_sidebar_key(screen, key) {
            return action;
        }
    }

    match key.code {
        KeyCode::Char('q') => {
            screen.quit = true;
            None
        }
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('m') => Some(Action::SwitchMode),
        KeyCode::Left => Some(Action::Previous),
        KeyCode::Right => Some(Action::Next),
        _ => match screen.mode {
            ViewMode::Cards => handle_cards_key(screen, key),
            ViewMode::Notes => handle_notes_key(screen, key),
        },
    }
}

fn handle_cards_key(screen: &mut Screen, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Flip),
        KeyCode::Char('c') => {
            screen.picker = Some(screen.active_picker_row());
            None
        }
        _ => None,
    }
}

fn handle_notes_key(screen: &mut Screen, key: KeyEvent) -> Option<Action> {
    let page = screen.content_rows.max(1) as isize;
    let max = max_scroll(screen);
    match key.code {
        KeyCode::Char('s') => return Some(Action::ToggleSidebar),
        KeyCode::Char('j') | KeyCode::Down => screen.scroll_by(1, max),
        KeyCode::Char('k') | KeyCode::Up => screen.scroll_by(-1, max),
        KeyCode::PageDown => screen.scroll_by(page, max),
        KeyCode::PageUp => screen.scroll_by(-page, max),
        KeyCode::Char('g') | KeyCode::Home => screen.scroll_by(isize::MIN, max),
        KeyCode::Char('G') | KeyCode::End => screen.scroll_by(isize::MAX, max),
        _ => {}
    }
    None
}

fn handle_picker_key(screen: &mut Screen, key: KeyEvent, row: usize) -> Option<Action> {
    let rows = screen.categories.options.len() + 1;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            screen.picker = Some(row.saturating_sub(1));
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.picker = Some((row + 1).min(rows - 1));
            None
        }
        KeyCode::Enter => {
            screen.picker = None;
            Some(Action::Filter(screen.picker_filter(row)))
        }
        KeyCode::Esc | KeyCode::Char('c') => {
            screen.picker = None;
            None
        }
        KeyCode::Char('q') => {
            screen.quit = true;
            None
        }
        _ => None,
    }
}

/// `Some(..)` when the sidebar consumed the key.
fn handle_sidebar_key(screen: &mut Screen, key: KeyEvent) -> Option<Option<Action>> {
    let items = screen.sidebar_items();
    let selected = screen.sidebar_state.selected().unwrap_or(0);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            screen.sidebar_state.select(Some(selected.saturating_sub(1)));
            Some(None)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = items.len().saturating_sub(1);
            screen.sidebar_state.select(Some((selected + 1).min(last)));
            Some(None)
        }
        KeyCode::Enter => Some(items.get(selected).map(item_action)),
        KeyCode::Esc => Some(Some(Action::CloseSidebar)),
        _ => None,
    }
}

fn item_action(item: &SidebarItem) -> Action {
    match item {
        SidebarItem::Section(index) => Action::ShowSection(*index),
        SidebarItem::SubHeading { anchor, .. } => Action::SelectAnchor(anchor.clone()),
    }
}

fn max_scroll(screen: &Screen) -> usize {
    screen.content_len.saturating_sub(screen.content_rows)
}

pub fn handle_mouse(screen: &mut Screen, mouse: MouseEvent) -> Option<Action> {
    let position = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match screen.mode {
            ViewMode::Notes if screen.sidebar.open => {
                let Some(area) = screen.sidebar_area.filter(|a| a.contains(position)) else {
                    // Click on the overlay
                    return Some(Action::CloseSidebar);
                };
                // Borders are not rows
                let list = area.inner(Margin::new(1, 1));
                if !list.contains(position) {
                    return None;
                }
                let row = usize::from(mouse.row - list.y);
                let index = screen.sidebar_state.offset() + row;
                let item = screen.sidebar_items().get(index).cloned()?;
                screen.sidebar_state.select(Some(index));
                Some(item_action(&item))
            }
            ViewMode::Cards if screen.picker.is_none() => screen
                .card_area
                .filter(|a| a.contains(position))
                .map(|_| Action::Flip),
            _ => None,
        },
        MouseEventKind::ScrollDown if screen.mode == ViewMode::Notes => {
            let max = max_scroll(screen);
            screen.scroll_by(3, max);
            None
        }
        MouseEventKind::ScrollUp if screen.mode == ViewMode::Notes => {
            let max = max_scroll(screen);
            screen.scroll_by(-3, max);
            None
        }
        _ => None,
    }
}
