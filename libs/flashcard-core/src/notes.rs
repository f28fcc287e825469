//! Splits a markdown notes document into navigable sections.
//!
//! The document is rendered with pulldown-cmark and cut into top-level blocks. Every
//! level-1 heading opens a new section; blocks before the first one form an
//! "Introduction" section. Level-2 headings become sub-navigation entries.

use std::collections::HashSet;
use std::ops::Range;

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

/// Title of the section holding content that precedes the first top-level heading.
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// One top-level block of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Markdown source of the block.
    pub markdown: String,
    /// Rendered HTML of the block.
    pub html: String,
    /// Anchor of a level-1 or level-2 heading block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Level-2 heading inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubHeading {
    pub text: String,
    pub anchor: String,
}

/// A slice of the document starting at a level-1 heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSection {
    pub title: String,
    /// Heading block; absent for the Introduction section.
    pub heading: Option<Block>,
    /// Blocks between the heading and the next level-1 heading.
    pub blocks: Vec<Block>,
    pub subheadings: Vec<SubHeading>,
    /// Link reference definitions of the whole document, one per line. Blocks reparsed
    /// on their own need these to resolve `[text][label]` links.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_definitions: String,
}

impl NoteSection {
    fn introduction() -> Self {
        Self {
            title: INTRODUCTION_TITLE.to_string(),
            heading: None,
            blocks: Vec::new(),
            subheadings: Vec::new(),
            link_definitions: String::new(),
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        self.heading.as_ref().and_then(|h| h.anchor.as_deref())
    }

    pub fn is_introduction(&self) -> bool {
        self.heading.is_none()
    }

    /// Heading and body blocks in document order.
    pub fn all_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.heading.iter().chain(self.blocks.iter())
    }

    /// Rendered HTML of the whole section.
    pub fn html(&self) -> String {
        self.all_blocks().map(|b| b.html.as_str()).collect()
    }

    pub fn contains_anchor(&self, anchor: &str) -> bool {
        self.all_blocks().any(|b| b.anchor.as_deref() == Some(anchor))
    }
}

/// Split `markdown` into sections in document order.
pub fn split_sections(markdown: &str) -> Vec<NoteSection> {
    let mut anchors = AnchorRegistry::default();
    let mut sections: Vec<NoteSection> = Vec::new();

    let (raw_blocks, link_definitions) = top_level_blocks(markdown);
    for raw in raw_blocks {
        let RawBlock { mut events, range } = raw;
        let heading = heading_of(&events);

        let anchor = match &heading {
            Some((HeadingLevel::H1 | HeadingLevel::H2, explicit, text)) => {
                Some(anchors.assign(explicit.as_deref(), text))
            }
            _ => None,
        };
        if let (Some(anchor), Some(Event::Start(Tag::Heading { id, .. }))) =
            (&anchor, events.first_mut())
        {
            *id = Some(CowStr::from(anchor.clone()));
        }

        let mut rendered = String::new();
        html::push_html(&mut rendered, events.into_iter());
        let block = Block {
            markdown: markdown[range].to_string(),
            html: rendered,
            anchor: anchor.clone(),
        };

        match (heading, anchor) {
            (Some((HeadingLevel::H1, _, title)), _) => sections.push(NoteSection {
                title,
                heading: Some(block),
                blocks: Vec::new(),
                subheadings: Vec::new(),
                link_definitions: String::new(),
            }),
            (heading, anchor) => {
                if sections.is_empty() {
                    sections.push(NoteSection::introduction());
                }
                let Some(section) = sections.last_mut() else {
                    continue;
                };
                if let (Some((HeadingLevel::H2, _, text)), Some(anchor)) = (heading, anchor) {
                    section.subheadings.push(SubHeading { text, anchor });
                }
                section.blocks.push(block);
            }
        }
    }

    for section in &mut sections {
        section.link_definitions.clone_from(&link_definitions);
    }
    sections
}

/// Lowercase alphanumerics joined by single dashes; `section` when nothing remains.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

struct RawBlock<'a> {
    events: Vec<Event<'a>>,
    range: Range<usize>,
}

/// Top-level blocks plus the link reference definitions found between them.
///
/// Definitions produce no events, so any non-blank source outside every block is one.
fn top_level_blocks(markdown: &str) -> (Vec<RawBlock<'_>>, String) {
    let mut blocks = Vec::new();
    let mut definitions = String::new();
    let mut events = Vec::new();
    let mut range = 0..0;
    let mut covered = 0;
    let mut depth = 0usize;

    for (event, span) in Parser::new_ext(markdown, options()).into_offset_iter() {
        if depth == 0 {
            push_definitions(&mut definitions, &markdown[covered.min(span.start)..span.start]);
            range = span.clone();
        }
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        range.end = range.end.max(span.end);
        events.push(event);

        if depth == 0 {
            covered = covered.max(range.end);
            blocks.push(RawBlock {
                events: std::mem::take(&mut events),
                range: range.clone(),
            });
        }
    }
    push_definitions(&mut definitions, &markdown[covered.min(markdown.len())..]);

    (blocks, definitions)
}

fn push_definitions(definitions: &mut String, gap: &str) {
    for line in gap.lines().map(str::trim).filter(|l| !l.is_empty()) {
        definitions.push_str(line);
        definitions.push('\n');
    }
}

/// Level, explicit id and plain text of a heading block.
fn heading_of(events: &[Event<'_>]) -> Option<(HeadingLevel, Option<String>, String)> {
    let Some(Event::Start(Tag::Heading { level, id, .. })) = events.first() else {
        return None;
    };

    let mut text = String::new();
    for event in &events[1..] {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }

    Some((*level, id.as_ref().map(|s| s.to_string()), text.trim().to_string()))
}

#[derive(Default)]
struct AnchorRegistry {
    used: HashSet<String>,
}

impl AnchorRegistry {
    fn assign(&mut self, explicit: Option<&str>, text: &str) -> String {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            if self.used.insert(id.to_string()) {
                return id.to_string();
            }
        }

        let base = slugify(text);
        if self.used.insert(base.clone()) {
            return base;
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| self.used.insert(candidate.clone()))
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(sections: &[NoteSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn splits_at_top_level_headings() {
        let input = "# One\n\npara 1\n\n# Two\n\npara 2a\n\npara 2b\n\n# Three\n";
        let sections = split_sections(input);
        assert_eq!(titles(&sections), vec!["One", "Two", "Three"]);
        assert_eq!(sections[0].blocks.len(), 1);
        assert_eq!(sections[1].blocks.len(), 2);
        assert!(sections[2].blocks.is_empty());
        assert_eq!(sections[1].blocks[1].markdown.trim(), "para 2b");
    }

    #[test]
    fn link_definitions_are_shared_by_every_section() {
        let input = "# Links\n\nSee [the docs][aws] for more.\n\n[aws]: https://aws.amazon.com\n\n# Two\n\nAlso [aws].\n";
        let sections = split_sections(input);
        assert_eq!(titles(&sections), vec!["Links", "Two"]);
        assert_eq!(sections[0].blocks.len(), 1);
        assert!(sections[0]
            .html()
            .contains(r#"<a href="https://aws.amazon.com">the docs</a>"#));
        for section in &sections {
            assert_eq!(section.link_definitions, "[aws]: https://aws.amazon.com\n");
        }
    }

    #[test]
    fn documents_without_definitions_carry_none() {
        let sections = split_sections("# One\n\n[inline](https://example.com)\n");
        assert_eq!(sections[0].link_definitions, "");
    }

    #[test]
    fn leading_content_becomes_introduction() {
        let input = "Welcome.\n\n# One\n\nbody\n\n# Two\n";
        let sections = split_sections(input);
        assert_eq!(titles(&sections), vec![INTRODUCTION_TITLE, "One", "Two"]);
        assert!(sections[0].is_introduction());
        assert_eq!(sections[0].blocks.len(), 1);
        assert!(sections[0].html().contains("<p>Welcome.</p>"));
    }

    #[test]
    fn no_introduction_without_leading_content() {
        let sections = split_sections("\n\n# Only\n\ntext\n");
        assert_eq!(titles(&sections), vec!["Only"]);
    }

    #[test]
    fn document_without_headings_is_one_introduction() {
        let sections = split_sections("just text\n\n- a\n- b\n");
        assert_eq!(titles(&sections), vec![INTRODUCTION_TITLE]);
        assert_eq!(sections[0].blocks.len(), 2);
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(split_sections("").is_empty());
        assert!(split_sections("   \n\n").is_empty());
    }

    #[test]
    fn collects_subheadings() {
        let input = "# Compute\n\n## EC2\n\ntext\n\n### Detail\n\n## Lambda\n\n# Storage\n\n## S3\n";
        let sections = split_sections(input);
        let subs: Vec<&str> = sections[0]
            .subheadings
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(subs, vec!["EC2", "Lambda"]);
        assert_eq!(sections[1].subheadings[0].anchor, "s3");
    }

    #[test]
    fn heading_html_carries_anchor() {
        let sections = split_sections("# Cloud Basics\n\n## What is IaaS?\n");
        assert_eq!(sections[0].anchor(), Some("cloud-basics"));
        assert!(sections[0].html().contains(r#"<h1 id="cloud-basics">"#));
        assert!(sections[0].html().contains(r#"<h2 id="what-is-iaas">"#));
        assert!(sections[0].contains_anchor("what-is-iaas"));
    }

    #[test]
    fn duplicate_headings_get_suffixes() {
        let input = "# Summary\n\n## Summary\n\n# Summary\n\n## Summary\n";
        let sections = split_sections(input);
        let anchors: Vec<String> = sections
            .iter()
            .flat_map(|s| s.all_blocks().filter_map(|b| b.anchor.clone()))
            .collect();
        assert_eq!(anchors, vec!["summary", "summary-1", "summary-2", "summary-3"]);
    }

    #[test]
    fn explicit_id_is_kept_when_unique() {
        let input = "# Intro {#start}\n\n## Part {#start}\n";
        let sections = split_sections(input);
        assert_eq!(sections[0].anchor(), Some("start"));
        assert_eq!(sections[0].subheadings[0].anchor, "part");
    }

    #[test]
    fn inline_code_in_heading_text() {
        let sections = split_sections("# Using `cargo`\n");
        assert_eq!(sections[0].title, "Using cargo");
    }

    #[test]
    fn nested_blocks_stay_whole() {
        let input = "# One\n\n> quote\n>\n> # not a section\n\n- item\n  - nested\n";
        let sections = split_sections(input);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].blocks.len(), 2);
    }

    #[test]
    fn setext_heading_opens_section() {
        let sections = split_sections("Title\n=====\n\nbody\n");
        assert_eq!(titles(&sections), vec!["Title"]);
    }

    #[test]
    fn slugify_rules() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  C++ & Rust  "), "c-rust");
        assert_eq!(slugify("snake_case-name"), "snake-case-name");
        assert_eq!(slugify("???"), "section");
    }
}
