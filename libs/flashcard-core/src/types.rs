//! Core types for the flashcard study tool.

use serde::{Deserialize, Deserializer, Serialize};

/// A single question/answer flashcard.
///
/// Missing or `null` fields deserialize to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub question: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub answer: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub category: String,
}

impl Card {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which side of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Question,
    Answer,
}

impl Default for Face {
    fn default() -> Self {
        Self::Question
    }
}

impl Face {
    pub fn flipped(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Question,
        }
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

impl Theme {
    /// Get the theme name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse from the stored name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Glyph for the theme toggle: offers the theme you would switch to.
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Light => "\u{1F319}",
            Self::Dark => "\u{2600}\u{FE0F}",
        }
    }
}

/// Which of the two views is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Cards,
    Notes,
}

impl Default for ViewMode {
    fn default() -> Self {
        Self::Cards
    }
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Cards => Self::Notes,
            Self::Notes => Self::Cards,
        }
    }

    /// Label for the control that switches away from this mode.
    pub fn switch_label(&self) -> &'static str {
        match self {
            Self::Cards => "Switch to Notes",
            Self::Notes => "Switch to Flashcards",
        }
    }
}

/// Active category filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "name")]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::All
    }
}

impl CategoryFilter {
    /// Parse a selector value; `"all"` selects every card.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => card.category == *name,
        }
    }
}

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub name: String,
    pub label: String,
}
