use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag};

use crate::block::{Block, BlockKind};
use crate::document::Document;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into a document whose root holds every
/// top-level block in source order.
pub fn parse_blocks(source: &str, options: Options) -> Document {
    let parser = CmarkParser::new_ext(source, options);

    let mut state = ParseState::new();
    for (event, range) in parser.into_offset_iter() {
        state.process_event(event, range);
    }
    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    document: Document,
    /// Top-level block whose events are still being collected.
    current: Option<BlockBuilder>,
}

struct BlockBuilder {
    heading: Option<HeadingBuilder>,
    events: Vec<Event<'static>>,
    /// Open Start tags not yet matched by an End.
    depth: usize,
    span: Range<usize>,
}

struct HeadingBuilder {
    level: u8,
    id: Option<String>,
    text: String,
}

impl BlockBuilder {
    fn new(first: &Event<'_>, start: usize) -> Self {
        let heading = match first {
            Event::Start(Tag::Heading { level, id, .. }) => Some(HeadingBuilder {
                level: heading_level_to_u8(level),
                id: id.as_ref().map(|id| id.to_string()),
                text: String::new(),
            }),
            _ => None,
        };
        BlockBuilder {
            heading,
            events: Vec::new(),
            depth: 0,
            span: start..start,
        }
    }

    fn push(&mut self, event: Event<'_>, range: &Range<usize>) {
        match &event {
            Event::Start(_) => self.depth += 1,
            Event::End(_) => self.depth = self.depth.saturating_sub(1),
            Event::Text(s) | Event::Code(s) => {
                if let Some(heading) = self.heading.as_mut() {
                    heading.text.push_str(s);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = self.heading.as_mut() {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
        self.span.end = self.span.end.max(range.end);
        self.events.push(event.into_static());
    }

    fn is_complete(&self) -> bool {
        self.depth == 0
    }

    fn into_block(self) -> Block {
        let kind = match self.heading {
            Some(heading) => BlockKind::Heading {
                level: heading.level,
                title: normalize_heading_text(&heading.text),
                id: heading.id,
            },
            None => BlockKind::Leaf,
        };
        Block {
            kind,
            children: Vec::new(),
            events: self.events,
            span: self.span,
        }
    }
}

impl ParseState {
    fn new() -> Self {
        ParseState {
            document: Document::new(),
            current: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        let builder = self
            .current
            .get_or_insert_with(|| BlockBuilder::new(&event, range.start));
        builder.push(event, &range);

        // A Start at depth zero opens a block that runs until its matching End;
        // anything else at depth zero (a thematic break) is a block on its own.
        if builder.is_complete() {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if let Some(builder) = self.current.take() {
            let id = self.document.push(builder.into_block());
            self.document.root.push(id);
        }
    }

    fn finalize(mut self) -> Document {
        // pulldown-cmark always balances its tags, but keep whatever was
        // collected if the stream ends early.
        self.flush();
        self.document
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Strip leading/trailing whitespace, collapse interior whitespace.
fn normalize_heading_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
