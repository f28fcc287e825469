//! Paginated navigation over note sections.

use crate::notes::NoteSection;

/// Section cursor plus sidebar visibility.
#[derive(Debug, Clone, Default)]
pub struct NotesViewer {
    sections: Vec<NoteSection>,
    current: usize,
    sidebar_open: bool,
}

impl NotesViewer {
    pub fn new(sections: Vec<NoteSection>) -> Self {
        Self {
            sections,
            current: 0,
            sidebar_open: false,
        }
    }

    pub fn sections(&self) -> &[NoteSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&NoteSection> {
        self.sections.get(self.current)
    }

    pub fn can_previous(&self) -> bool {
        !self.is_empty() && self.current > 0
    }

    pub fn can_next(&self) -> bool {
        !self.is_empty() && self.current + 1 < self.len()
    }

    /// Make section `index` the visible one. Out-of-range indices are ignored.
    pub fn show(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next_section(&mut self) -> bool {
        self.can_next() && self.show(self.current + 1)
    }

    pub fn previous_section(&mut self) -> bool {
        self.can_previous() && self.show(self.current - 1)
    }

    /// Index of the section holding `anchor`.
    pub fn find_anchor(&self, anchor: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.contains_anchor(anchor))
    }

    /// Reveal the section holding `anchor`, switching sections only when needed.
    pub fn select_anchor(&mut self, anchor: &str) -> Option<usize> {
        if self
            .current()
            .is_some_and(|section| section.contains_anchor(anchor))
        {
            return Some(self.current);
        }
        let index = self.find_anchor(anchor)?;
        self.current = index;
        Some(index)
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}
