//! Card deck parsing and category ordering.
//!
//! # Format
//! ```json
//! [
//!   { "question": "What is a region?", "answer": "A geographic area.", "category": "Intro" }
//! ]
//! ```

use crate::error::Result;
use crate::types::{Card, CategoryOption};

/// Categories listed first in the selector, in this order.
pub const DEFAULT_CATEGORY_ORDER: [&str; 4] = [
    "Intro",
    "Cloud Computing",
    "AWS Cloud Locations",
    "Shared Responsibility",
];

/// Parse a JSON array of cards.
pub fn parse_deck(content: &str) -> Result<Vec<Card>> {
    let cards: Vec<Card> = serde_json::from_str(content)?;
    Ok(cards)
}

/// Fixed priority list used to order categories in the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOrder {
    priority: Vec<String>,
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_ORDER)
    }
}

impl CategoryOrder {
    pub fn new<I, S>(priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priority: priority.into_iter().map(Into::into).collect(),
        }
    }

    fn rank(&self, category: &str) -> usize {
        self.priority
            .iter()
            .position(|p| p == category)
            .unwrap_or(usize::MAX)
    }

    /// Distinct categories of `cards`, known ones first by priority, the rest in
    /// encounter order.
    pub fn sort(&self, cards: &[Card]) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for card in cards {
            if !categories.contains(&card.category) {
                categories.push(card.category.clone());
            }
        }
        // sort_by_key is stable, so unknown categories keep encounter order
        categories.sort_by_key(|c| self.rank(c));
        categories
    }

    /// Selector entries with 1-based numbered labels.
    pub fn options(&self, cards: &[Card]) -> Vec<CategoryOption> {
        self.sort(cards)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| CategoryOption {
                label: format!("{}. {}", idx + 1, name),
                name,
            })
            .collect()
    }
}
