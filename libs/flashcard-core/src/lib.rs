//! Core flashcard library: everything the study tool does that does not touch a screen.
//!
//! Provides:
//! - Card deck parsing and category ordering
//! - Card browser state machine (position + face)
//! - Markdown notes sectioning and the notes viewer state machine
//! - The `View` rendering interface and the `StudyController` that drives it

pub mod browser;
pub mod controller;
pub mod deck;
pub mod error;
pub mod notes;
pub mod types;
pub mod view;
pub mod viewer;

pub use browser::CardBrowser;
pub use controller::{Action, MemoryThemeStore, Request, StudyController, ThemeStore};
pub use deck::{parse_deck, CategoryOrder, DEFAULT_CATEGORY_ORDER};
pub use error::{LoadError, Result};
pub use notes::{slugify, split_sections, Block, NoteSection, SubHeading, INTRODUCTION_TITLE};
pub use types::{Card, CategoryFilter, CategoryOption, Face, Theme, ViewMode};
pub use view::{
    CardDisplay, CardView, CategorySelector, NotesDisplay, SectionScroll, SectionView,
    SidebarEntry, SidebarView, View,
};
pub use viewer::NotesViewer;
