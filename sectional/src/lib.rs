pub mod block;
pub mod document;
pub mod parser;

pub use block::{Block, BlockId, BlockKind};
pub use document::Document;
pub use pulldown_cmark::Options;
