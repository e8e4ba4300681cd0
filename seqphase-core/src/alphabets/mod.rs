pub mod dna;
pub mod protein;

use bit_set::BitSet;
use std::fmt;

/// Set of accepted byte symbols.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Alphabet {
    symbols: BitSet,
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Self {
        Alphabet {
            symbols: symbols.iter().map(|&b| usize::from(b)).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        self.symbols.contains(usize::from(b))
    }

    /// Every byte of `text` belongs to the alphabet.
    pub fn is_word(&self, text: &[u8]) -> bool {
        self.first_foreign(text, |_| false).is_none()
    }

    /// Offset of the first byte outside the alphabet that `skip` does not
    /// excuse.
    pub fn first_foreign(&self, text: &[u8], skip: impl Fn(u8) -> bool) -> Option<usize> {
        text.iter().position(|&b| !self.contains(b) && !skip(b))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Alphabet tag carried by alignments and sequence bags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SeqAlphabet {
    Nucleotide,
    AminoAcid,
    #[default]
    Unknown,
}

impl fmt::Display for SeqAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeqAlphabet::Nucleotide => "nucleotide",
            SeqAlphabet::AminoAcid => "amino-acid",
            SeqAlphabet::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Gap and missing-data symbols, ignored by alphabet detection.
#[inline]
pub fn is_gap(b: u8) -> bool {
    matches!(b, b'-' | b'.' | b'?')
}

/// Classify raw sequence content.
///
/// Rules (deterministic, not probabilistic):
/// - Gap symbols are ignored
/// - Only IUPAC nucleotide symbols → Nucleotide
/// - Only IUPAC amino-acid symbols (stop `*` included) → AminoAcid
/// - Otherwise → Unknown
pub fn detect_alphabet(bytes: &[u8]) -> SeqAlphabet {
    let nt = dna::iupac_alphabet();
    let aa = protein::iupac_alphabet();
    let mut nucleotide = true;

    for &b in bytes {
        if is_gap(b) {
            continue;
        }
        if nucleotide && nt.contains(b) {
            continue;
        }
        nucleotide = false;
        if !aa.contains(b) {
            return SeqAlphabet::Unknown;
        }
    }

    if nucleotide {
        SeqAlphabet::Nucleotide
    } else {
        SeqAlphabet::AminoAcid
    }
}

/// Alphabet shared by several sequences: the least specific of their individual tags.
pub fn detect_common_alphabet<'a, I>(seqs: I) -> SeqAlphabet
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut common = SeqAlphabet::Nucleotide;
    for seq in seqs {
        match detect_alphabet(seq) {
            SeqAlphabet::Nucleotide => {}
            SeqAlphabet::AminoAcid => common = SeqAlphabet::AminoAcid,
            SeqAlphabet::Unknown => return SeqAlphabet::Unknown,
        }
    }
    common
}
