pub mod fasta;
pub mod phase_log;
pub mod phylip;

use crate::error::BioResult;
use crate::seq::Alignment;
use std::io::Cursor;
use std::path::Path;

/// Aligned input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentFormat {
    Fasta,
    Phylip,
}

impl AlignmentFormat {
    /// FASTA when the first non-blank byte is `>`, block format otherwise.
    pub fn detect(data: &[u8]) -> Self {
        match data.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'>') => AlignmentFormat::Fasta,
            _ => AlignmentFormat::Phylip,
        }
    }
}

/// Parses an alignment held in memory; `format` is detected when `None`.
pub fn read_alignment(data: &[u8], format: Option<AlignmentFormat>) -> BioResult<Alignment> {
    let format = format.unwrap_or_else(|| AlignmentFormat::detect(data));
    log::debug!("reading alignment as {format:?}");
    match format {
        AlignmentFormat::Fasta => fasta::read_fasta_alignment_from_reader(Cursor::new(data)),
        AlignmentFormat::Phylip => phylip::parse_bytes(data),
    }
}

pub fn read_alignment_from_path(
    path: impl AsRef<Path>,
    format: Option<AlignmentFormat>,
) -> BioResult<Alignment> {
    let data = std::fs::read(path)?;
    read_alignment(&data, format)
}
