//! Rendering interface between the controller and a concrete renderer.
//!
//! The controller never draws anything itself. After every state change it hands
//! owned view models to a [`View`], so the state machines can run without a screen.

use serde::{Deserialize, Serialize};

use crate::notes::{NoteSection, SubHeading};
use crate::types::{CategoryFilter, CategoryOption, Face, Theme, ViewMode};

pub const NO_CARDS_MESSAGE: &str = "No cards in this category";
pub const CARDS_ERROR_MESSAGE: &str = "Error loading flashcards. Please restart to try again.";
pub const NO_SECTIONS_MESSAGE: &str = "No sections found.";

/// Inline message shown in place of the notes when they fail to load.
pub fn notes_error_message(source_name: &str) -> String {
    format!(
        "Error loading notes. Please make sure \"{}\" exists.",
        source_name
    )
}

/// The card currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub face: Face,
    pub progress: String,
    pub can_previous: bool,
    pub can_next: bool,
}

/// What the card area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardDisplay {
    Loading,
    Card(CardView),
    /// The active filter matched nothing; navigation is disabled.
    Empty { message: String, progress: String },
    Failed { message: String },
}

impl CardDisplay {
    pub fn can_previous(&self) -> bool {
        matches!(self, Self::Card(card) if card.can_previous)
    }

    pub fn can_next(&self) -> bool {
        matches!(self, Self::Card(card) if card.can_next)
    }
}

/// Category selector contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelector {
    pub options: Vec<CategoryOption>,
    pub active: CategoryFilter,
}

/// The visible note section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub index: usize,
    pub total: usize,
    pub section: NoteSection,
    pub can_previous: bool,
    pub can_next: bool,
    pub scroll: SectionScroll,
}

/// Where the notes pane lands when a section is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "anchor", rename_all = "snake_case")]
pub enum SectionScroll {
    /// Start of the section.
    #[default]
    Top,
    /// Same section shown again; leave the reader where they were.
    Keep,
    /// A heading anchor inside the section.
    Anchor(String),
}

/// What the notes area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotesDisplay {
    Loading,
    Section(SectionView),
    Empty { message: String },
    Failed { message: String },
}

/// Sidebar table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SidebarView {
    pub open: bool,
    pub entries: Vec<SidebarEntry>,
    /// Shown instead of entries when the document has no sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl SidebarView {
    pub fn active_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarEntry {
    pub index: usize,
    pub title: String,
    pub active: bool,
    pub subheadings: Vec<SubHeading>,
}

/// A concrete renderer.
pub trait View {
    fn render_theme(&mut self, theme: Theme);
    fn render_mode(&mut self, mode: ViewMode);
    fn render_categories(&mut self, selector: &CategorySelector);
    fn render_card(&mut self, card: &CardDisplay);
    fn render_section(&mut self, notes: &NotesDisplay);
    fn render_sidebar(&mut self, sidebar: &SidebarView);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_disabled_unless_card() {
        let empty = CardDisplay::Empty {
            message: NO_CARDS_MESSAGE.to_string(),
            progress: "Card 0 of 0".to_string(),
        };
        assert!(!empty.can_previous());
        assert!(!empty.can_next());
        assert!(!CardDisplay::Loading.can_next());
    }

    #[test]
    fn notes_error_names_source() {
        assert_eq!(
            notes_error_message("notes.md"),
            "Error loading notes. Please make sure \"notes.md\" exists."
        );
    }

    #[test]
    fn card_display_serializes_tagged() {
        let json = serde_json::to_value(CardDisplay::Failed {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "failed");
        assert_eq!(json["message"], "boom");
    }
}
