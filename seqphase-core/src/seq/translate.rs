use std::sync::LazyLock;

/// Translate `nt` from its first base; a trailing partial codon is dropped.
/// Codons containing anything other than A/C/G/T/U translate to `X`.
pub fn translate(nt: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(nt.len() / 3);
    for codon in nt.chunks_exact(3) {
        out.push(translate_codon(codon));
    }
    out
}

/// The three forward translations, indexed by frame.
pub fn three_frames(nt: &[u8]) -> [Vec<u8>; 3] {
    let frame = |offset: usize| {
        if nt.len() > offset {
            translate(&nt[offset..])
        } else {
            Vec::new()
        }
    };
    [frame(0), frame(1), frame(2)]
}

#[inline]
pub fn translate_codon(codon: &[u8]) -> u8 {
    let i1 = BASE_INDEX[codon[0] as usize];
    let i2 = BASE_INDEX[codon[1] as usize];
    let i3 = BASE_INDEX[codon[2] as usize];
    if i1 < 4 && i2 < 4 && i3 < 4 {
        let idx = ((i1 as usize) << 4) | ((i2 as usize) << 2) | (i3 as usize);
        CODON_TABLE[idx]
    } else {
        b'X'
    }
}

/// Index of the first stop (`*`) in a translated sequence.
#[inline]
pub fn first_stop(aa: &[u8]) -> Option<usize> {
    memchr::memchr(STOP, aa)
}

pub const STOP: u8 = b'*';
pub const START: u8 = b'M';

static BASE_INDEX: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut map = [255u8; 256];
    for (i, (&upper, &alt)) in b"ACGT".iter().zip(b"ACGU".iter()).enumerate() {
        map[upper as usize] = i as u8;
        map[upper.to_ascii_lowercase() as usize] = i as u8;
        map[alt as usize] = i as u8;
        map[alt.to_ascii_lowercase() as usize] = i as u8;
    }
    map
});

const CODON_TABLE: [u8; 64] = *b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";
