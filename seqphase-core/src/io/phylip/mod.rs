//! Interleaved (phylip-style) block format.
//!
//! ```text
//!   2   12
//! seq1  ATGCCCGGGT AA
//! seq2  ATGCCAGGGT AA
//! ```
//!
//! Alignments longer than 60 columns continue in further blocks, separated by
//! a blank line and without names.

pub mod parser;
pub mod scanner;
pub mod writer;

pub use parser::{parse, parse_bytes, read_phylip_from_path, Parser};
pub use scanner::{Scanner, Token, TokenKind};
pub use writer::{write_phylip, write_phylip_to, write_phylip_to_path, CHUNK_WIDTH, LINE_WIDTH};

#[cfg(test)]
mod tests;
