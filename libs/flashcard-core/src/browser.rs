//! Linear card browsing over a filtered view of the deck.

use crate::types::{Card, CategoryFilter, Face};

/// Browsing state: the deck, the active filter and a `(position, face)` cursor.
///
/// The filtered view is kept as deck positions so it always preserves deck order.
#[derive(Debug, Clone)]
pub struct CardBrowser {
    deck: Vec<Card>,
    filter: CategoryFilter,
    view: Vec<usize>,
    position: usize,
    face: Face,
}

impl CardBrowser {
    /// Start browsing `deck` with every card in view.
    pub fn new(deck: Vec<Card>) -> Self {
        let mut browser = Self {
            deck,
            filter: CategoryFilter::All,
            view: Vec::new(),
            position: 0,
            face: Face::Question,
        };
        browser.filter(CategoryFilter::All);
        browser
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn active_filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Recompute the view for `filter`; the cursor returns to the first card's question.
    pub fn filter(&mut self, filter: CategoryFilter) {
        self.view = self
            .deck
            .iter()
            .enumerate()
            .filter(|(_, card)| filter.matches(card))
            .map(|(idx, _)| idx)
            .collect();
        self.filter = filter;
        self.position = 0;
        self.face = Face::Question;
    }

    /// Cards in the current view, in deck order.
    pub fn filtered(&self) -> impl Iterator<Item = &Card> + '_ {
        self.view.iter().map(|&idx| &self.deck[idx])
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn current(&self) -> Option<&Card> {
        self.view.get(self.position).map(|&idx| &self.deck[idx])
    }

    pub fn can_previous(&self) -> bool {
        !self.is_empty() && self.position > 0
    }

    pub fn can_next(&self) -> bool {
        !self.is_empty() && self.position + 1 < self.len()
    }

    /// Advance one card. Returns false at the last card.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.position += 1;
        self.face = Face::Question;
        true
    }

    /// Step back one card. Returns false at the first card.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.position -= 1;
        self.face = Face::Question;
        true
    }

    /// Toggle the visible face. Returns false when there is no card to flip.
    pub fn flip(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.face = self.face.flipped();
        true
    }

    /// Progress line, e.g. `Card 2 of 5`.
    pub fn progress(&self) -> String {
        if self.is_empty() {
            "Card 0 of 0".to_string()
        } else {
            format!("Card {} of {}", self.position + 1, self.len())
        }
    }
}
