use crate::alphabets::SeqAlphabet;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("invalid scoring parameters: {msg}")]
    InvalidScoring { msg: String },

    #[error("invalid parameter: {msg}")]
    InvalidParameter { msg: String },

    #[error("phylip format error at line {line}: {msg}")]
    PhylipFormat { msg: String, line: usize },

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("input sequences must be nucleotidic (detected {alphabet})")]
    NotNucleotide { alphabet: SeqAlphabet },

    #[error("reference orf: {msg}")]
    Reference { msg: String },

    #[error("no open reading frame found in the input sequences")]
    NoOrfFound,

    #[error("sequence '{name}' has length {len}, alignment length is {expected}")]
    AlignmentLengthMismatch {
        name: Box<str>,
        len: usize,
        expected: usize,
    },

    #[error("sequence length mismatch at index {index}: {len} (expected {expected})")]
    SequenceLengthMismatch {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("no valid sites to compare")]
    NoValidSites,

    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type BioResult<T> = Result<T, BioError>;

impl BioError {
    pub(crate) fn phylip(line: usize, msg: impl Into<String>) -> Self {
        BioError::PhylipFormat {
            msg: msg.into(),
            line,
        }
    }
}
