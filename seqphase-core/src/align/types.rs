use super::encode::PROTEIN_ALPHABET;
use super::matrices::BLOSUM62;
use crate::error::{BioError, BioResult};

/// Ins consumes query only (gap in target), Del consumes target only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CigarOp {
    Match,
    Ins,
    Del,
}

/// Run-length encoded alignment columns.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Cigar {
    pub ops: Vec<(CigarOp, usize)>,
}

impl Cigar {
    /// Appends `len` columns, merging with the last run when `op` repeats.
    pub fn push(&mut self, op: CigarOp, len: usize) {
        if len == 0 {
            return;
        }
        match self.ops.last_mut() {
            Some((last, run)) if *last == op => *run += len,
            _ => self.ops.push((op, len)),
        }
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.ops.iter().map(|&(_, run)| run).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn first_op(&self) -> Option<CigarOp> {
        self.ops.first().map(|&(op, _)| op)
    }
}

/// Alignment coordinates are 0-based; ends are inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub query_start: usize,
    pub query_end: usize,
    pub target_start: usize,
    pub target_end: usize,
    pub cigar: Cigar,
}

impl AlignmentResult {
    pub(crate) fn empty() -> Self {
        Self {
            score: 0,
            query_start: 0,
            query_end: 0,
            target_start: 0,
            target_end: 0,
            cigar: Cigar::default(),
        }
    }
}

/// Substitution matrix plus affine gap penalties.
///
/// A gap of `k` residues costs `gap_open + (k - 1) * gap_extend`.
#[derive(Clone, Debug)]
pub struct Scoring {
    matrix: Vec<i16>,
    alphabet_size: usize,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Scoring {
    /// `matrix` is row-major, `alphabet_size` x `alphabet_size`; penalties
    /// must not be positive.
    pub fn new(
        matrix: Vec<i16>,
        alphabet_size: usize,
        gap_open: i32,
        gap_extend: i32,
    ) -> BioResult<Self> {
        if matrix.len() != alphabet_size * alphabet_size {
            return Err(BioError::InvalidScoring {
                msg: format!(
                    "matrix has {} cells, expected {alphabet_size}x{alphabet_size}",
                    matrix.len()
                ),
            });
        }
        if gap_open > 0 || gap_extend > 0 {
            return Err(BioError::InvalidScoring {
                msg: format!("gap penalties must be <= 0 (open {gap_open}, extend {gap_extend})"),
            });
        }
        Ok(Self {
            matrix,
            alphabet_size,
            gap_open,
            gap_extend,
        })
    }

    /// BLOSUM62, gap open -11, gap extend -1.
    pub fn blosum62() -> Self {
        Self {
            matrix: BLOSUM62.to_vec(),
            alphabet_size: PROTEIN_ALPHABET.len(),
            gap_open: -11,
            gap_extend: -1,
        }
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        i32::from(self.matrix[a as usize * self.alphabet_size + b as usize])
    }
}
