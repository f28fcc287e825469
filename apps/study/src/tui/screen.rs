//! Terminal-side state: the last view models from the controller plus local UI state.

use flashcard_core::{
    CardDisplay, CategoryFilter, CategorySelector, NotesDisplay, SectionScroll, SidebarView,
    Theme, View, ViewMode,
};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

/// One selectable row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    Section(usize),
    SubHeading { section: usize, anchor: String },
}

pub struct Screen {
    pub theme: Theme,
    pub mode: ViewMode,
    pub categories: CategorySelector,
    pub card: CardDisplay,
    pub notes: NotesDisplay,
    pub sidebar: SidebarView,

    /// Open category selector with the highlighted row (0 is "All categories").
    pub picker: Option<usize>,
    pub sidebar_state: ListState,
    pub content_scroll: usize,
    /// Row the content pane is scrolling towards.
    pub scroll_target: Option<usize>,
    /// Anchor waiting for layout before it can become a scroll target.
    pub pending_anchor: Option<String>,
    pub content_rows: usize,
    pub content_len: usize,

    // Areas saved for mouse hit-testing
    pub card_area: Option<Rect>,
    pub sidebar_area: Option<Rect>,

    pub quit: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            mode: ViewMode::default(),
            categories: CategorySelector {
                options: Vec::new(),
                active: CategoryFilter::All,
            },
            card: CardDisplay::Loading,
            notes: NotesDisplay::Loading,
            sidebar: SidebarView::default(),
            picker: None,
            sidebar_state: ListState::default(),
            content_scroll: 0,
            scroll_target: None,
            pending_anchor: None,
            content_rows: 0,
            content_len: 0,
            card_area: None,
            sidebar_area: None,
            quit: false,
        }
    }

    /// Sidebar rows in display order: each section followed by its sub-headings.
    pub fn sidebar_items(&self) -> Vec<SidebarItem> {
        let mut items = Vec::new();
        for entry in &self.sidebar.entries {
            items.push(SidebarItem::Section(entry.index));
            for sub in &entry.subheadings {
                items.push(SidebarItem::SubHeading {
                    section: entry.index,
                    anchor: sub.anchor.clone(),
                });
            }
        }
        items
    }

    /// Row of the picker entry matching the active filter.
    pub fn active_picker_row(&self) -> usize {
        match &self.categories.active {
            CategoryFilter::All => 0,
            CategoryFilter::Category(name) => self
                .categories
                .options
                .iter()
                .position(|o| o.name == *name)
                .map_or(0, |idx| idx + 1),
        }
    }

    /// Filter selected by picker row `row`.
    pub fn picker_filter(&self, row: usize) -> CategoryFilter {
        match row.checked_sub(1).and_then(|idx| self.categories.options.get(idx)) {
            Some(option) => CategoryFilter::Category(option.name.clone()),
            None => CategoryFilter::All,
        }
    }

    pub fn scroll_by(&mut self, delta: isize, max: usize) {
        self.scroll_target = None;
        self.content_scroll = self.content_scroll.saturating_add_signed(delta).min(max);
    }

    /// Advance the smooth scroll one frame. Returns true while still moving.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.scroll_target else {
            return false;
        };
        if self.content_scroll == target {
            self.scroll_target = None;
            return false;
        }
        let distance = target.abs_diff(self.content_scroll);
        let step = distance.div_ceil(4).max(1);
        if target > self.content_scroll {
            self.content_scroll += step;
        } else {
            self.content_scroll -= step;
        }
        true
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl View for Screen {
    fn render_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn render_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.picker = None;
    }

    fn render_categories(&mut self, selector: &CategorySelector) {
        self.categories = selector.clone();
    }

    fn render_card(&mut self, card: &CardDisplay) {
        self.card = card.clone();
    }

    fn render_section(&mut self, notes: &NotesDisplay) {
        self.notes = notes.clone();
        self.scroll_target = None;
        match notes {
            NotesDisplay::Section(section) => match &section.scroll {
                SectionScroll::Anchor(anchor) => self.pending_anchor = Some(anchor.clone()),
                SectionScroll::Keep => self.pending_anchor = None,
                SectionScroll::Top => {
                    self.pending_anchor = None;
                    self.content_scroll = 0;
                }
            },
            _ => {
                self.pending_anchor = None;
                self.content_scroll = 0;
            }
        }
    }

    fn render_sidebar(&mut self, sidebar: &SidebarView) {
        let was_open = self.sidebar.open;
        self.sidebar = sidebar.clone();
        if sidebar.open && !was_open {
            let active = sidebar.active_index().unwrap_or(0);
            let row = self
                .sidebar_items()
                .iter()
                .position(|item| *item == SidebarItem::Section(active));
            self.sidebar_state.select(row);
        }
    }
}
