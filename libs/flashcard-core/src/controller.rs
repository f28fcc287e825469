//! Application state and the single controller that mutates it.

use std::convert::Infallible;

use crate::browser::CardBrowser;
use crate::deck::CategoryOrder;
use crate::error::LoadError;
use crate::notes::split_sections;
use crate::types::{Card, CategoryFilter, Theme, ViewMode};
use crate::view::{
    notes_error_message, CardDisplay, CardView, CategorySelector, NotesDisplay, SectionScroll,
    SectionView, SidebarEntry, SidebarView, View, CARDS_ERROR_MESSAGE, NO_CARDS_MESSAGE,
    NO_SECTIONS_MESSAGE,
};
use crate::viewer::NotesViewer;

/// Persistence for the theme preference.
pub trait ThemeStore {
    type Error: std::error::Error;

    fn load_theme(&self) -> Result<Option<Theme>, Self::Error>;
    fn save_theme(&mut self, theme: Theme) -> Result<(), Self::Error>;
}

/// Theme store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    theme: Option<Theme>,
}

impl ThemeStore for MemoryThemeStore {
    type Error = Infallible;

    fn load_theme(&self) -> Result<Option<Theme>, Self::Error> {
        Ok(self.theme)
    }

    fn save_theme(&mut self, theme: Theme) -> Result<(), Self::Error> {
        self.theme = Some(theme);
        Ok(())
    }
}

/// A user input, already decoded from whatever device produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Previous card or section, depending on the mode.
    Previous,
    /// Next card or section, depending on the mode.
    Next,
    Flip,
    Filter(CategoryFilter),
    ToggleTheme,
    SwitchMode,
    ShowSection(usize),
    SelectAnchor(String),
    ToggleSidebar,
    CloseSidebar,
}

/// Work the host must perform on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Fetch the notes document and pass the result to [`StudyController::notes_loaded`].
    FetchNotes,
}

#[derive(Debug)]
enum CardsState {
    Loading,
    Ready(CardBrowser),
    Failed,
}

#[derive(Debug)]
enum NotesState {
    NotRequested,
    Loading,
    Ready(NotesViewer),
    Failed(String),
}

/// Owns every piece of UI state and renders through a [`View`] after each change.
pub struct StudyController<S: ThemeStore> {
    store: S,
    theme: Theme,
    mode: ViewMode,
    category_order: CategoryOrder,
    notes_source: String,
    cards: CardsState,
    notes: NotesState,
}

impl<S: ThemeStore> StudyController<S> {
    /// Create a controller, restoring the persisted theme (light when absent).
    pub fn new(store: S, category_order: CategoryOrder, notes_source: impl Into<String>) -> Self {
        let theme = match store.load_theme() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read theme preference: {}", e);
                Theme::default()
            }
        };

        Self {
            store,
            theme,
            mode: ViewMode::default(),
            category_order,
            notes_source: notes_source.into(),
            cards: CardsState::Loading,
            notes: NotesState::NotRequested,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn browser(&self) -> Option<&CardBrowser> {
        match &self.cards {
            CardsState::Ready(browser) => Some(browser),
            _ => None,
        }
    }

    pub fn notes_viewer(&self) -> Option<&NotesViewer> {
        match &self.notes {
            NotesState::Ready(viewer) => Some(viewer),
            _ => None,
        }
    }

    /// Push the complete current state to `view`.
    pub fn render_all(&self, view: &mut dyn View) {
        view.render_theme(self.theme);
        view.render_mode(self.mode);
        self.render_categories(view);
        self.render_card(view);
        if !matches!(self.notes, NotesState::NotRequested) {
            self.render_notes(view, SectionScroll::Top);
            self.render_sidebar(view);
        }
    }

    /// Install the deck, or show the load error in the card area.
    pub fn cards_loaded(&mut self, result: Result<Vec<Card>, LoadError>, view: &mut dyn View) {
        match result {
            Ok(deck) => {
                tracing::info!("Loaded {} cards", deck.len());
                self.cards = CardsState::Ready(CardBrowser::new(deck));
            }
            Err(e) => {
                tracing::error!("Error loading cards: {}", e);
                self.cards = CardsState::Failed;
            }
        }
        self.render_categories(view);
        self.render_card(view);
    }

    /// Split the fetched notes into sections, or show the inline load error.
    pub fn notes_loaded(&mut self, result: Result<String, LoadError>, view: &mut dyn View) {
        if !matches!(self.notes, NotesState::Loading) {
            tracing::warn!("Ignoring notes that were not requested");
            return;
        }
        match result {
            Ok(markdown) => {
                let sections = split_sections(&markdown);
                tracing::info!("Loaded notes with {} sections", sections.len());
                self.notes = NotesState::Ready(NotesViewer::new(sections));
            }
            Err(e) => {
                tracing::error!("Error loading notes: {}", e);
                self.notes = NotesState::Failed(notes_error_message(&self.notes_source));
            }
        }
        self.render_notes(view, SectionScroll::Top);
        self.render_sidebar(view);
    }

    /// Apply one user input.
    pub fn dispatch(&mut self, action: Action, view: &mut dyn View) -> Option<Request> {
        tracing::debug!(?action, mode = ?self.mode, "dispatch");
        match action {
            Action::Previous => match self.mode {
                ViewMode::Cards => self.step_card(view, CardBrowser::previous),
                ViewMode::Notes => self.step_section(view, NotesViewer::previous_section),
            },
            Action::Next => match self.mode {
                ViewMode::Cards => self.step_card(view, CardBrowser::next),
                ViewMode::Notes => self.step_section(view, NotesViewer::next_section),
            },
            Action::Flip => {
                if self.mode == ViewMode::Cards {
                    self.step_card(view, CardBrowser::flip);
                }
            }
            Action::Filter(filter) => self.filter(filter, view),
            Action::ToggleTheme => self.toggle_theme(view),
            Action::SwitchMode => return self.switch_mode(view),
            Action::ShowSection(index) => self.show_section(index, view),
            Action::SelectAnchor(anchor) => self.select_anchor(&anchor, view),
            Action::ToggleSidebar => {
                if let NotesState::Ready(viewer) = &mut self.notes {
                    viewer.toggle_sidebar();
                    self.render_sidebar(view);
                }
            }
            Action::CloseSidebar => {
                if let NotesState::Ready(viewer) = &mut self.notes {
                    if viewer.sidebar_open() {
                        viewer.close_sidebar();
                        self.render_sidebar(view);
                    }
                }
            }
        }
        None
    }

    fn step_card(&mut self, view: &mut dyn View, step: fn(&mut CardBrowser) -> bool) {
        if let CardsState::Ready(browser) = &mut self.cards {
            if step(browser) {
                self.render_card(view);
            }
        }
    }

    fn step_section(&mut self, view: &mut dyn View, step: fn(&mut NotesViewer) -> bool) {
        if let NotesState::Ready(viewer) = &mut self.notes {
            if step(viewer) {
                self.render_notes(view, SectionScroll::Top);
                self.render_sidebar(view);
            }
        }
    }

    fn filter(&mut self, filter: CategoryFilter, view: &mut dyn View) {
        if let CardsState::Ready(browser) = &mut self.cards {
            browser.filter(filter);
            self.render_categories(view);
            self.render_card(view);
        }
    }

    fn toggle_theme(&mut self, view: &mut dyn View) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.save_theme(self.theme) {
            tracing::warn!("Theme preference will not survive a restart: {}", e);
        }
        view.render_theme(self.theme);
    }

    fn switch_mode(&mut self, view: &mut dyn View) -> Option<Request> {
        self.mode = self.mode.toggled();
        view.render_mode(self.mode);

        if self.mode != ViewMode::Notes {
            return None;
        }
        if matches!(self.notes, NotesState::NotRequested) {
            self.notes = NotesState::Loading;
            self.render_notes(view, SectionScroll::Top);
            return Some(Request::FetchNotes);
        }
        self.render_notes(view, SectionScroll::Keep);
        self.render_sidebar(view);
        None
    }

    fn show_section(&mut self, index: usize, view: &mut dyn View) {
        if let NotesState::Ready(viewer) = &mut self.notes {
            if viewer.show(index) {
                viewer.close_sidebar();
                self.render_notes(view, SectionScroll::Top);
                self.render_sidebar(view);
            }
        }
    }

    fn select_anchor(&mut self, anchor: &str, view: &mut dyn View) {
        if let NotesState::Ready(viewer) = &mut self.notes {
            if viewer.select_anchor(anchor).is_some() {
                viewer.close_sidebar();
                self.render_notes(view, SectionScroll::Anchor(anchor.to_string()));
                self.render_sidebar(view);
            } else {
                tracing::debug!(anchor, "Unknown anchor");
            }
        }
    }

    fn render_categories(&self, view: &mut dyn View) {
        let selector = match &self.cards {
            CardsState::Ready(browser) => CategorySelector {
                options: self.category_order.options(browser.deck()),
                active: browser.active_filter().clone(),
            },
            _ => CategorySelector {
                options: Vec::new(),
                active: CategoryFilter::All,
            },
        };
        view.render_categories(&selector);
    }

    fn render_card(&self, view: &mut dyn View) {
        let display = match &self.cards {
            CardsState::Loading => CardDisplay::Loading,
            CardsState::Failed => CardDisplay::Failed {
                message: CARDS_ERROR_MESSAGE.to_string(),
            },
            CardsState::Ready(browser) => match browser.current() {
                Some(card) => CardDisplay::Card(CardView {
                    question: card.question.clone(),
                    answer: card.answer.clone(),
                    category: card.category.clone(),
                    face: browser.face(),
                    progress: browser.progress(),
                    can_previous: browser.can_previous(),
                    can_next: browser.can_next(),
                }),
                None => CardDisplay::Empty {
                    message: NO_CARDS_MESSAGE.to_string(),
                    progress: browser.progress(),
                },
            },
        };
        view.render_card(&display);
    }

    fn render_notes(&self, view: &mut dyn View, scroll: SectionScroll) {
        let display = match &self.notes {
            NotesState::NotRequested | NotesState::Loading => NotesDisplay::Loading,
            NotesState::Failed(message) => NotesDisplay::Failed {
                message: message.clone(),
            },
            NotesState::Ready(viewer) => match viewer.current() {
                Some(section) => NotesDisplay::Section(SectionView {
                    index: viewer.current_index(),
                    total: viewer.len(),
                    section: section.clone(),
                    can_previous: viewer.can_previous(),
                    can_next: viewer.can_next(),
                    scroll,
                }),
                None => NotesDisplay::Empty {
                    message: NO_SECTIONS_MESSAGE.to_string(),
                },
            },
        };
        view.render_section(&display);
    }

    fn render_sidebar(&self, view: &mut dyn View) {
        let sidebar = match &self.notes {
            NotesState::Ready(viewer) => SidebarView {
                open: viewer.sidebar_open(),
                entries: viewer
                    .sections()
                    .iter()
                    .enumerate()
                    .map(|(index, section)| SidebarEntry {
                        index,
                        title: section.title.clone(),
                        active: index == viewer.current_index(),
                        subheadings: section.subheadings.clone(),
                    })
                    .collect(),
                placeholder: viewer
                    .is_empty()
                    .then(|| NO_SECTIONS_MESSAGE.to_string()),
            },
            _ => SidebarView::default(),
        };
        view.render_sidebar(&sidebar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Face;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingView {
        theme: Option<Theme>,
        mode: Option<ViewMode>,
        categories: Option<CategorySelector>,
        card: Option<CardDisplay>,
        notes: Option<NotesDisplay>,
        sidebar: Option<SidebarView>,
        card_renders: usize,
    }

    impl View for RecordingView {
        fn render_theme(&mut self, theme: Theme) {
            self.theme = Some(theme);
        }
        fn render_mode(&mut self, mode: ViewMode) {
            self.mode = Some(mode);
        }
        fn render_categories(&mut self, selector: &CategorySelector) {
            self.categories = Some(selector.clone());
        }
        fn render_card(&mut self, card: &CardDisplay) {
            self.card = Some(card.clone());
            self.card_renders += 1;
        }
        fn render_section(&mut self, notes: &NotesDisplay) {
            self.notes = Some(notes.clone());
        }
        fn render_sidebar(&mut self, sidebar: &SidebarView) {
            self.sidebar = Some(sidebar.clone());
        }
    }

    impl RecordingView {
        fn card_view(&self) -> &CardView {
            match &self.card {
                Some(CardDisplay::Card(card)) => card,
                other => panic!("expected a card, got {:?}", other),
            }
        }

        fn section_view(&self) -> &SectionView {
            match &self.notes {
                Some(NotesDisplay::Section(section)) => section,
                other => panic!("expected a section, got {:?}", other),
            }
        }
    }

    #[derive(Debug)]
    struct BrokenStoreError;

    impl std::fmt::Display for BrokenStoreError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "storage unavailable")
        }
    }

    impl std::error::Error for BrokenStoreError {}

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        type Error = BrokenStoreError;

        fn load_theme(&self) -> Result<Option<Theme>, Self::Error> {
            Err(BrokenStoreError)
        }

        fn save_theme(&mut self, _theme: Theme) -> Result<(), Self::Error> {
            Err(BrokenStoreError)
        }
    }

    const NOTES: &str = "Preface.\n\n# One\n\n## Alpha\n\n# Two\n\n## Beta\n";

    fn sample_deck() -> Vec<Card> {
        vec![
            Card::new("A", "1", "X"),
            Card::new("B", "2", "Y"),
            Card::new("C", "3", "X"),
        ]
    }

    fn controller() -> (StudyController<MemoryThemeStore>, RecordingView) {
        let mut controller =
            StudyController::new(MemoryThemeStore::default(), CategoryOrder::default(), "notes.md");
        let mut view = RecordingView::default();
        controller.render_all(&mut view);
        controller.cards_loaded(Ok(sample_deck()), &mut view);
        (controller, view)
    }

    fn notes_controller() -> (StudyController<MemoryThemeStore>, RecordingView) {
        let (mut controller, mut view) = controller();
        let request = controller.dispatch(Action::SwitchMode, &mut view);
        assert_eq!(request, Some(Request::FetchNotes));
        controller.notes_loaded(Ok(NOTES.to_string()), &mut view);
        (controller, view)
    }

    #[test]
    fn initial_render() {
        let mut controller =
            StudyController::new(MemoryThemeStore::default(), CategoryOrder::default(), "notes.md");
        let mut view = RecordingView::default();
        controller.render_all(&mut view);
        assert_eq!(view.theme, Some(Theme::Light));
        assert_eq!(view.mode, Some(ViewMode::Cards));
        assert_eq!(view.card, Some(CardDisplay::Loading));
        assert!(view.notes.is_none());

        controller.cards_loaded(Ok(sample_deck()), &mut view);
        let card = view.card_view();
        assert_eq!(card.question, "A");
        assert_eq!(card.face, Face::Question);
        assert_eq!(card.progress, "Card 1 of 3");
        assert!(!card.can_previous);
        assert!(card.can_next);
    }

    #[test]
    fn filter_then_next_disables_next() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::Filter(CategoryFilter::parse("X")), &mut view);
        assert_eq!(view.card_view().question, "A");
        assert_eq!(view.card_view().progress, "Card 1 of 2");

        controller.dispatch(Action::Next, &mut view);
        let card = view.card_view();
        assert_eq!(card.question, "C");
        assert!(!card.can_next);
        assert!(card.can_previous);
    }

    #[test]
    fn next_at_end_does_not_rerender() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::Next, &mut view);
        controller.dispatch(Action::Next, &mut view);
        let renders = view.card_renders;
        controller.dispatch(Action::Next, &mut view);
        assert_eq!(view.card_renders, renders);
        assert_eq!(controller.browser().map(|b| b.position()), Some(2));
    }

    #[test]
    fn empty_filter_shows_placeholder() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::Filter(CategoryFilter::parse("Z")), &mut view);
        assert_eq!(
            view.card,
            Some(CardDisplay::Empty {
                message: NO_CARDS_MESSAGE.to_string(),
                progress: "Card 0 of 0".to_string(),
            })
        );
        assert_eq!(
            view.categories.as_ref().map(|c| c.active.clone()),
            Some(CategoryFilter::Category("Z".to_string()))
        );
    }

    #[test]
    fn categories_are_rendered_on_load() {
        let (_, view) = controller();
        let labels: Vec<String> = view
            .categories
            .map(|c| c.options.into_iter().map(|o| o.label).collect())
            .unwrap_or_default();
        assert_eq!(labels, vec!["1. X", "2. Y"]);
    }

    #[test]
    fn flip_and_move() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::Flip, &mut view);
        assert_eq!(view.card_view().face, Face::Answer);
        controller.dispatch(Action::Next, &mut view);
        assert_eq!(view.card_view().face, Face::Question);
    }

    #[test]
    fn load_failure_is_rendered() {
        let mut controller =
            StudyController::new(MemoryThemeStore::default(), CategoryOrder::default(), "notes.md");
        let mut view = RecordingView::default();
        controller.cards_loaded(Err(LoadError::Malformed("bad".to_string())), &mut view);
        assert_eq!(
            view.card,
            Some(CardDisplay::Failed {
                message: CARDS_ERROR_MESSAGE.to_string()
            })
        );
        controller.dispatch(Action::Next, &mut view);
        controller.dispatch(Action::Flip, &mut view);
        assert!(controller.browser().is_none());
    }

    #[test]
    fn theme_toggle_twice_restores_preference() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::ToggleTheme, &mut view);
        assert_eq!(view.theme, Some(Theme::Dark));
        assert_eq!(controller.store().load_theme().unwrap(), Some(Theme::Dark));
        controller.dispatch(Action::ToggleTheme, &mut view);
        assert_eq!(view.theme, Some(Theme::Light));
        assert_eq!(controller.store().load_theme().unwrap(), Some(Theme::Light));
    }

    #[test]
    fn persisted_theme_is_restored() {
        let mut store = MemoryThemeStore::default();
        store.save_theme(Theme::Dark).unwrap();
        let controller = StudyController::new(store, CategoryOrder::default(), "notes.md");
        assert_eq!(controller.theme(), Theme::Dark);
    }

    #[test]
    fn broken_store_is_not_fatal() {
        let mut controller = StudyController::new(BrokenStore, CategoryOrder::default(), "n.md");
        let mut view = RecordingView::default();
        assert_eq!(controller.theme(), Theme::Light);
        controller.dispatch(Action::ToggleTheme, &mut view);
        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(view.theme, Some(Theme::Dark));
    }

    #[test]
    fn notes_are_requested_once() {
        let (mut controller, mut view) = controller();
        assert_eq!(
            controller.dispatch(Action::SwitchMode, &mut view),
            Some(Request::FetchNotes)
        );
        assert_eq!(view.notes, Some(NotesDisplay::Loading));
        assert_eq!(controller.dispatch(Action::SwitchMode, &mut view), None);
        assert_eq!(controller.dispatch(Action::SwitchMode, &mut view), None);
        assert_eq!(controller.mode(), ViewMode::Notes);
    }

    #[test]
    fn notes_keep_section_across_mode_switches() {
        let (mut controller, mut view) = notes_controller();
        let section = view.section_view();
        assert_eq!(section.section.title, "Introduction");
        assert_eq!(section.total, 3);
        assert!(!section.can_previous);

        controller.dispatch(Action::Next, &mut view);
        controller.dispatch(Action::SwitchMode, &mut view);
        assert_eq!(controller.mode(), ViewMode::Cards);
        assert_eq!(controller.dispatch(Action::SwitchMode, &mut view), None);
        assert_eq!(view.section_view().index, 1);
        assert_eq!(view.section_view().section.title, "One");
        assert_eq!(view.section_view().scroll, SectionScroll::Keep);

        controller.dispatch(Action::Next, &mut view);
        assert_eq!(view.section_view().scroll, SectionScroll::Top);
    }

    #[test]
    fn arrows_follow_mode() {
        let (mut controller, mut view) = notes_controller();
        controller.dispatch(Action::Next, &mut view);
        controller.dispatch(Action::Next, &mut view);
        controller.dispatch(Action::Next, &mut view);
        assert_eq!(view.section_view().index, 2);
        assert!(!view.section_view().can_next);
        assert_eq!(controller.browser().map(|b| b.position()), Some(0));

        controller.dispatch(Action::Flip, &mut view);
        assert_eq!(controller.browser().map(|b| b.face()), Some(Face::Question));
    }

    #[test]
    fn sidebar_marks_active_section() {
        let (mut controller, mut view) = notes_controller();
        controller.dispatch(Action::ShowSection(2), &mut view);
        let sidebar = view.sidebar.clone().unwrap_or_default();
        assert_eq!(sidebar.active_index(), Some(2));
        assert_eq!(sidebar.entries.iter().filter(|e| e.active).count(), 1);
        assert_eq!(view.section_view().scroll, SectionScroll::Top);
    }

    #[test]
    fn select_anchor_reveals_section_and_closes_sidebar() {
        let (mut controller, mut view) = notes_controller();
        controller.dispatch(Action::ToggleSidebar, &mut view);
        assert!(view.sidebar.as_ref().is_some_and(|s| s.open));

        controller.dispatch(Action::SelectAnchor("beta".to_string()), &mut view);
        let section = view.section_view();
        assert_eq!(section.index, 2);
        assert_eq!(section.scroll, SectionScroll::Anchor("beta".to_string()));
        assert!(view.sidebar.as_ref().is_some_and(|s| !s.open));
    }

    #[test]
    fn close_sidebar_from_overlay() {
        let (mut controller, mut view) = notes_controller();
        controller.dispatch(Action::ToggleSidebar, &mut view);
        controller.dispatch(Action::CloseSidebar, &mut view);
        assert!(view.sidebar.as_ref().is_some_and(|s| !s.open));
    }

    #[test]
    fn notes_failure_renders_inline_error() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::SwitchMode, &mut view);
        controller.notes_loaded(
            Err(LoadError::Fetch {
                source_name: "notes.md".to_string(),
                message: "404".to_string(),
            }),
            &mut view,
        );
        assert_eq!(
            view.notes,
            Some(NotesDisplay::Failed {
                message: notes_error_message("notes.md")
            })
        );
        controller.dispatch(Action::SwitchMode, &mut view);
        assert_eq!(controller.dispatch(Action::SwitchMode, &mut view), None);
    }

    #[test]
    fn empty_notes_show_placeholder() {
        let (mut controller, mut view) = controller();
        controller.dispatch(Action::SwitchMode, &mut view);
        controller.notes_loaded(Ok(String::new()), &mut view);
        assert_eq!(
            view.notes,
            Some(NotesDisplay::Empty {
                message: NO_SECTIONS_MESSAGE.to_string()
            })
        );
        assert_eq!(
            view.sidebar.and_then(|s| s.placeholder),
            Some(NO_SECTIONS_MESSAGE.to_string())
        );
    }

    #[test]
    fn unrequested_notes_are_ignored() {
        let (mut controller, mut view) = controller();
        controller.notes_loaded(Ok(NOTES.to_string()), &mut view);
        assert!(controller.notes_viewer().is_none());
    }
}
