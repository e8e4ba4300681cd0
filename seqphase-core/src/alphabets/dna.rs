use crate::alphabets::Alphabet;
use std::sync::LazyLock;

static IUPAC: LazyLock<Alphabet> =
    LazyLock::new(|| Alphabet::new(b"ACGTURYSWKMBDHVNacgturyswkmbdhvn"));

pub fn iupac_alphabet() -> &'static Alphabet {
    &IUPAC
}

/// IUPAC codes and their complements; gaps and unknown bytes map to
/// themselves, case is preserved.
static COMPLEMENT: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
    for (&from, &to) in b"ACGTURYSWKMBDHVN".iter().zip(b"TGCAAYRSWMKVHDBN") {
        table[usize::from(from)] = to;
        table[usize::from(from.to_ascii_lowercase())] = to.to_ascii_lowercase();
    }
    table
});

#[inline]
pub fn complement(b: u8) -> u8 {
    COMPLEMENT[usize::from(b)]
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
