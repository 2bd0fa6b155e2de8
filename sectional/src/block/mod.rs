use std::ops::Range;

use pulldown_cmark::{CowStr, Event, Tag};

/// Position of a block inside a [`Document`](crate::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// What a block is, as far as the section machinery cares.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// An ATX or setext heading.
    Heading {
        /// 1 = `#`, 6 = `######`.
        level: u8,
        /// Plain heading text, whitespace-normalized.
        title: String,
        /// Explicit or assigned anchor id.
        id: Option<String>,
    },
    /// Any other top-level construct (paragraph, list, table, code, rule, raw HTML...).
    Leaf,
    /// Synthetic container. Its owning heading is the sibling right before it.
    Section { level: u8 },
}

/// A structural unit of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Nested blocks, in document order. Only sections have children.
    pub children: Vec<BlockId>,
    /// The parser events making up this block. Empty for sections.
    pub events: Vec<Event<'static>>,
    /// Byte span in source.
    pub span: Range<usize>,
}

impl Block {
    pub fn section(level: u8, span: Range<usize>) -> Self {
        Block {
            kind: BlockKind::Section { level },
            children: Vec::new(),
            events: Vec::new(),
            span,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level, .. } => Some(level),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, BlockKind::Section { .. })
    }

    /// Set the anchor id of a heading, keeping the start event in sync so the
    /// id shows up in rendered markup. Does nothing for other kinds.
    pub fn set_heading_id(&mut self, new_id: String) {
        let BlockKind::Heading { id, .. } = &mut self.kind else {
            return;
        };
        for event in &mut self.events {
            if let Event::Start(Tag::Heading { id: event_id, .. }) = event {
                *event_id = Some(CowStr::from(new_id.clone()));
                break;
            }
        }
        *id = Some(new_id);
    }

    /// Short human-readable description, used by outlines.
    pub fn label(&self) -> String {
        match &self.kind {
            BlockKind::Heading { level, title, .. } => {
                format!("{} {}", "#".repeat(*level as usize), title)
            }
            BlockKind::Section { level } => format!("<section> (level {})", level),
            BlockKind::Leaf => leaf_label(self.events.first()).to_string(),
        }
    }
}

fn leaf_label(first: Option<&Event<'_>>) -> &'static str {
    match first {
        Some(Event::Start(tag)) => match tag {
            Tag::Paragraph => "paragraph",
            Tag::BlockQuote(_) => "blockquote",
            Tag::CodeBlock(_) => "code block",
            Tag::HtmlBlock => "html",
            Tag::List(Some(_)) => "ordered list",
            Tag::List(None) => "list",
            Tag::Table(_) => "table",
            Tag::FootnoteDefinition(_) => "footnote",
            Tag::DefinitionList => "definition list",
            Tag::MetadataBlock(_) => "metadata",
            _ => "block",
        },
        Some(Event::Rule) => "rule",
        _ => "block",
    }
}
