//! Markdown to styled terminal lines.

use std::collections::HashMap;

use flashcard_core::NoteSection;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::palette::Palette;

/// A section laid out for a given width.
pub struct RenderedSection {
    pub lines: Vec<Line<'static>>,
    /// Row of each heading anchor in `lines`.
    pub anchors: HashMap<String, usize>,
}

pub fn render_section(section: &NoteSection, palette: &Palette, width: usize) -> RenderedSection {
    let mut lines = Vec::new();
    let mut anchors = HashMap::new();

    for block in section.all_blocks() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        if let Some(anchor) = &block.anchor {
            anchors.insert(anchor.clone(), lines.len());
        }
        let lines_of_block =
            render_markdown_with_definitions(&block.markdown, &section.link_definitions, palette);
        for line in lines_of_block {
            lines.extend(wrap_line(line, width));
        }
    }

    RenderedSection { lines, anchors }
}

pub fn render_markdown(markdown: &str, palette: &Palette) -> Vec<Line<'static>> {
    render_markdown_with_definitions(markdown, "", palette)
}

/// Render one block of a larger document. `definitions` are the document's link
/// reference definitions; they produce no output of their own.
pub fn render_markdown_with_definitions(
    markdown: &str,
    definitions: &str,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let source = if definitions.is_empty() || !markdown.contains('[') {
        markdown.to_string()
    } else {
        format!("{}\n\n{}", markdown.trim_end(), definitions)
    };

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut writer = Writer::new(palette);
    for event in Parser::new_ext(&source, options) {
        writer.event(event);
    }
    writer.finish()
}

struct Writer<'p> {
    palette: &'p Palette,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
}

impl<'p> Writer<'p> {
    fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_else(|| self.palette.base())
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let style = f(self.style());
        self.styles.push(style);
    }

    fn text(&mut self, text: &str) {
        let style = self.style();
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                "\u{2502} ".repeat(self.quote_depth),
                self.palette.muted(),
            ));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                let accent = self.palette.accent();
                self.push_style(|_| {
                    if level == HeadingLevel::H1 {
                        accent.add_modifier(Modifier::UNDERLINED)
                    } else {
                        accent
                    }
                });
                self.text(&format!("{} ", "#".repeat(heading_depth(level))));
            }
            Event::End(TagEnd::Heading(_)) => {
                self.styles.pop();
                self.flush();
            }
            Event::End(TagEnd::Paragraph) => self.flush(),
            Event::Start(Tag::BlockQuote) => {
                self.flush();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush();
                self.in_code_block = false;
            }
            Event::Start(Tag::List(first)) => {
                self.flush();
                self.lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{}{}. ", indent, n);
                        *n += 1;
                        bullet
                    }
                    _ => format!("{}\u{2022} ", indent),
                };
                let style = self.palette.muted();
                self.spans.push(Span::styled(bullet, style));
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::Emphasis) => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Event::Start(Tag::Strong) => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Strikethrough) => {
                self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT))
            }
            Event::Start(Tag::Link { .. }) => {
                let accent = self.palette.accent;
                self.push_style(|s| s.fg(accent).add_modifier(Modifier::UNDERLINED))
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.styles.pop();
            }
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => self.flush(),
            Event::End(TagEnd::TableCell) => {
                let style = self.palette.muted();
                self.spans.push(Span::styled(" \u{2502} ", style));
            }
            Event::Text(text) if self.in_code_block => {
                let style = self.palette.base().fg(self.palette.code);
                for line in text.lines() {
                    self.spans.push(Span::styled(format!("    {}", line), style));
                    self.flush();
                }
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = self.style().fg(self.palette.code);
                self.spans.push(Span::styled(code.to_string(), style));
            }
            Event::Html(html) => {
                let style = self.palette.muted();
                self.spans.push(Span::styled(html.trim_end().to_string(), style));
                self.flush();
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines
                    .push(Line::styled("\u{2500}".repeat(24), self.palette.muted()));
            }
            Event::TaskListMarker(checked) => {
                self.text(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(label) => self.text(&format!("[^{}]", label)),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Greedy word wrap that keeps span styles.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let mut wrapped = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in line.spans {
        let style = span.style;
        for word in span.content.split_inclusive(' ') {
            let mut word = word.to_string();
            let mut word_width = word.width();

            if current_width + word.trim_end().width() > width && current_width > 0 {
                wrapped.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            while word_width > width {
                let (head, tail) = split_at_width(&word, width);
                wrapped.push(Line::from(vec![Span::styled(head, style)]));
                word = tail;
                word_width = word.width();
            }
            if !word.is_empty() {
                current_width += word_width;
                current.push(Span::styled(word, style));
            }
        }
    }
    if !current.is_empty() {
        wrapped.push(Line::from(current));
    }
    wrapped
}

fn split_at_width(text: &str, width: usize) -> (String, String) {
    let mut taken = 0;
    for (idx, ch) in text.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if taken + w > width && idx > 0 {
            return (text[..idx].to_string(), text[idx..].to_string());
        }
        taken += w;
    }
    (text.to_string(), String::new())
}
