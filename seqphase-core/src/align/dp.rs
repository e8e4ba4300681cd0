//! Anchored dynamic programming aligner. Rows walk the target, columns the
//! query.

use super::encode::EncodedSeq;
use super::types::{AlignmentResult, Cigar, CigarOp, Scoring};

// low two bits: where the cell score came from
const FROM_DIAG: u8 = 0b00;
const FROM_DEL: u8 = 0b01;
const FROM_INS: u8 = 0b10;
const DIR_MASK: u8 = 0b11;
// the gap state at this cell continues the one before it
const DEL_EXTENDS: u8 = 0b0100;
const INS_EXTENDS: u8 = 0b1000;

const NEG_INF: i32 = i32::MIN / 2;

/// Semi-global alignment anchored on the target start.
///
/// The target is consumed from its first residue, so a missing target prefix
/// costs a deletion. Leading query residues and both tails are free, and the
/// alignment ends on the best scoring cell. Ties prefer a match, then a
/// deletion.
///
/// The traceback keeps one byte per cell, `(n + 1) * (m + 1)` bytes for a
/// target of `n` and a query of `m` residues, allocated on every call. Two
/// 10k-residue proteins need about 100 MB per worker.
pub fn align_anchored_dp(
    query: &EncodedSeq,
    target: &EncodedSeq,
    scoring: &Scoring,
) -> AlignmentResult {
    let m = query.codes.len();
    let n = target.codes.len();
    if m == 0 || n == 0 {
        return AlignmentResult::empty();
    }

    let cols = m + 1;
    let mut trace = vec![FROM_DIAG; (n + 1) * cols];
    // row 0 stays at zero: the query may start anywhere
    let mut h = vec![0i32; cols];
    let mut del = vec![NEG_INF; cols];
    let (mut best, mut end_i, mut end_j) = (NEG_INF, 0, 0);

    for i in 1..=n {
        let t = target.codes[i - 1];
        let mut diag = h[0];
        h[0] = scoring.gap_open + scoring.gap_extend * (i as i32 - 1);
        let mut ins = NEG_INF;
        for j in 1..=m {
            let mut flags = FROM_DIAG;
            let up = h[j];

            let del_ext = del[j] + scoring.gap_extend;
            let del_open = up + scoring.gap_open;
            del[j] = if del_ext > del_open {
                flags |= DEL_EXTENDS;
                del_ext
            } else {
                del_open
            };

            let ins_ext = ins + scoring.gap_extend;
            let ins_open = h[j - 1] + scoring.gap_open;
            ins = if ins_ext > ins_open {
                flags |= INS_EXTENDS;
                ins_ext
            } else {
                ins_open
            };

            let mut cell = diag + scoring.score(query.codes[j - 1], t);
            if del[j] > cell {
                cell = del[j];
                flags |= FROM_DEL;
            }
            if ins > cell {
                cell = ins;
                flags = (flags & !DIR_MASK) | FROM_INS;
            }

            trace[i * cols + j] = flags;
            h[j] = cell;
            if cell > best {
                best = cell;
                end_i = i;
                end_j = j;
            }
            diag = up;
        }
    }

    // walk back to row 0; the cigar is built reversed
    let mut cigar = Cigar::default();
    let (mut i, mut j) = (end_i, end_j);
    let mut state = FROM_DIAG;
    while i > 0 {
        if j == 0 {
            // column 0 holds a single deletion of the remaining target prefix
            cigar.push(CigarOp::Del, i);
            i = 0;
            continue;
        }
        let flags = trace[i * cols + j];
        match state {
            FROM_DEL => {
                cigar.push(CigarOp::Del, 1);
                if flags & DEL_EXTENDS == 0 {
                    state = FROM_DIAG;
                }
                i -= 1;
            }
            FROM_INS => {
                cigar.push(CigarOp::Ins, 1);
                if flags & INS_EXTENDS == 0 {
                    state = FROM_DIAG;
                }
                j -= 1;
            }
            _ => match flags & DIR_MASK {
                FROM_DIAG => {
                    cigar.push(CigarOp::Match, 1);
                    i -= 1;
                    j -= 1;
                }
                dir => state = dir,
            },
        }
    }
    cigar.ops.reverse();

    AlignmentResult {
        score: best,
        query_start: j,
        query_end: end_j - 1,
        target_start: i,
        target_end: end_i - 1,
        cigar,
    }
}
