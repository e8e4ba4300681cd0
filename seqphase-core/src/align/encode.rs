use crate::alphabets::SeqAlphabet;
use crate::error::{BioError, BioResult};
use std::sync::LazyLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSeq {
    pub(crate) codes: Vec<u8>,
    pub(crate) alphabet_size: usize,
}

impl EncodedSeq {
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Code given to gaps, ambiguity symbols and anything outside the site alphabet.
pub const UNKNOWN_SITE: u8 = 255;

/// NCBI matrix order, shared with [`crate::align::matrices::BLOSUM62`].
pub(crate) const PROTEIN_ALPHABET: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";
const NT_SITES: &[u8] = b"ACGT";
const AA_SITES: &[u8] = b"ARNDCQEGHILKMFPSTWYV";

static PROTEIN_MAP: LazyLock<[u8; 256]> = LazyLock::new(|| build_map(PROTEIN_ALPHABET));
static NT_SITE_MAP: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut map = build_map(NT_SITES);
    // be forgiving: U/u count as T
    map[b'U' as usize] = map[b'T' as usize];
    map[b'u' as usize] = map[b't' as usize];
    map
});
static AA_SITE_MAP: LazyLock<[u8; 256]> = LazyLock::new(|| build_map(AA_SITES));

fn build_map(alphabet: &[u8]) -> [u8; 256] {
    let mut map = [UNKNOWN_SITE; 256];
    for (i, &b) in alphabet.iter().enumerate() {
        map[b as usize] = i as u8;
        map[b.to_ascii_lowercase() as usize] = i as u8;
    }
    map
}

/// Encode a protein for the aligner; symbols outside the matrix alphabet are rejected.
pub fn encode_protein(seq: &[u8]) -> BioResult<EncodedSeq> {
    let mut codes = Vec::with_capacity(seq.len());
    for (pos, &b) in seq.iter().enumerate() {
        let v = PROTEIN_MAP[b as usize];
        if v == UNKNOWN_SITE {
            return Err(BioError::InvalidChar { ch: b as char, pos });
        }
        codes.push(v);
    }
    Ok(EncodedSeq {
        codes,
        alphabet_size: PROTEIN_ALPHABET.len(),
    })
}

/// Encode a sequence site by site for distance computations.
///
/// Nucleotides map to `0..4` (A, C, G, T/U), amino acids to `0..20`. Gaps and
/// ambiguity codes map to [`UNKNOWN_SITE`].
pub fn encode_sites(seq: &[u8], alphabet: SeqAlphabet) -> BioResult<Vec<u8>> {
    let map: &[u8; 256] = match alphabet {
        SeqAlphabet::Nucleotide => &NT_SITE_MAP,
        SeqAlphabet::AminoAcid => &AA_SITE_MAP,
        SeqAlphabet::Unknown => {
            return Err(BioError::InvalidParameter {
                msg: "cannot encode sites of an unknown alphabet".into(),
            })
        }
    };
    Ok(seq.iter().map(|&b| map[b as usize]).collect())
}
