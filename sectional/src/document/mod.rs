use std::fmt;
use std::ops::{Index, IndexMut};

use crate::block::{Block, BlockId};

/// A parsed Markdown document.
///
/// Blocks live in a flat arena and refer to each other by [`BlockId`]. The
/// parser fills `root` with every top-level block in source order; transforms
/// re-parent blocks by moving ids around, never by copying blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    /// Top-level blocks, in document order.
    pub root: Vec<BlockId>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Add a block to the arena. The block is not attached anywhere yet.
    pub fn push(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)
    }

    /// Number of blocks in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in arena (creation) order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (BlockId(i), block))
    }

    pub fn heading_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_heading()).count()
    }

    pub fn section_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_section()).count()
    }
}

impl Index<BlockId> for Document {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }
}

impl IndexMut<BlockId> for Document {
    fn index_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }
}

/// Renders an indented outline of the block tree.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_blocks(
            doc: &Document,
            ids: &[BlockId],
            indent: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            for &id in ids {
                let block = &doc[id];
                writeln!(f, "{}{}", "  ".repeat(indent), block.label())?;
                write_blocks(doc, &block.children, indent + 1, f)?;
            }
            Ok(())
        }
        write_blocks(self, &self.root, 0, f)
    }
}
