mod structural;

use pulldown_cmark::Options;

use crate::Document;

/// Parser entry point.
pub struct Parser<'a> {
    source: &'a str,
    options: Options,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: Options) -> Self {
        Parser { source, options }
    }

    /// Parse the source Markdown into a flat document: one root block per
    /// top-level construct, no nesting.
    pub fn parse(&self) -> Document {
        structural::parse_blocks(self.source, self.options)
    }
}
