pub mod dp;
pub mod encode;
pub mod matrices;
pub mod types;

use crate::error::{BioError, BioResult};

pub use encode::{encode_protein, encode_sites, EncodedSeq, UNKNOWN_SITE};
pub use types::{AlignmentResult, Cigar, CigarOp, Scoring};


/// Column counts of an alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    /// Aligned pairs carrying the same residue.
    pub matches: usize,
    /// All columns, gaps included.
    pub columns: usize,
}

/// Anchored alignment of `query` against `target`; see
/// [`dp::align_anchored_dp`].
pub fn align_anchored(
    query: &EncodedSeq,
    target: &EncodedSeq,
    scoring: &Scoring,
) -> BioResult<AlignmentResult> {
    for (which, seq) in [("query", query), ("target", target)] {
        if seq.alphabet_size != scoring.alphabet_size() {
            return Err(BioError::InvalidScoring {
                msg: format!(
                    "scoring matrix built for {} symbols, {which} uses {}",
                    scoring.alphabet_size(),
                    seq.alphabet_size
                ),
            });
        }
    }
    Ok(dp::align_anchored_dp(query, target, scoring))
}

/// Query/target coordinates of every aligned pair, in alignment order.
pub fn aligned_pairs(res: &AlignmentResult) -> Vec<(usize, usize)> {
    let mut qi = res.query_start;
    let mut ti = res.target_start;
    let mut out = Vec::new();
    for (op, len) in &res.cigar.ops {
        match op {
            CigarOp::Match => {
                for _ in 0..*len {
                    out.push((qi, ti));
                    qi += 1;
                    ti += 1;
                }
            }
            CigarOp::Ins => qi += *len,
            CigarOp::Del => ti += *len,
        }
    }
    out
}

pub fn alignment_stats(query: &[u8], target: &[u8], res: &AlignmentResult) -> AlignmentStats {
    let pairs = aligned_pairs(res);
    let matches = pairs
        .iter()
        .filter(|&&(qi, ti)| query[qi] == target[ti])
        .count();
    AlignmentStats {
        matches,
        columns: res.cigar.len(),
    }
}
