//! Reading-frame phasing of nucleotide sequences against a reference ORF.
//!
//! The crate reads alignments in interleaved block (phylip) or FASTA format,
//! detects or takes a reference open reading frame, and trims every input
//! sequence so that it starts on the codon aligned with the reference start.

#[macro_use]
mod par;

pub mod align;
pub mod alphabets;
pub mod distance;
pub mod error;
pub mod io;
pub mod orf;
pub mod phase;
pub mod seq;

pub use error::{BioError, BioResult};
