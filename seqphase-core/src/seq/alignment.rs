use crate::alphabets::SeqAlphabet;
use crate::error::{BioError, BioResult};
use crate::seq::bag::SeqBag;
use crate::seq::record::Sequence;
use std::ops::Index;

/// Rows of identical length, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    alphabet: SeqAlphabet,
    seqs: Vec<Sequence>,
}

impl Alignment {
    pub fn new(alphabet: SeqAlphabet) -> Self {
        Self {
            alphabet,
            seqs: Vec::new(),
        }
    }

    /// Takes the rows of `bag` as is; every row must have the same length.
    pub fn from_bag(bag: SeqBag) -> BioResult<Self> {
        let mut al = Self::new(bag.alphabet());
        for seq in bag.into_vec() {
            al.push(seq)?;
        }
        Ok(al)
    }

    pub fn alphabet(&self) -> SeqAlphabet {
        self.alphabet
    }

    pub fn push(&mut self, seq: Sequence) -> BioResult<()> {
        if let Some(first) = self.seqs.first() {
            if first.len() != seq.len() {
                return Err(BioError::AlignmentLengthMismatch {
                    name: seq.name,
                    len: seq.seq.len(),
                    expected: first.len(),
                });
            }
        }
        self.seqs.push(seq);
        Ok(())
    }

    pub fn add_sequence(
        &mut self,
        name: impl Into<Box<str>>,
        seq: impl Into<Vec<u8>>,
        comment: Option<Box<str>>,
    ) -> BioResult<()> {
        self.push(Sequence {
            name: name.into(),
            seq: seq.into(),
            comment,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    /// Number of columns.
    pub fn length(&self) -> usize {
        self.seqs.first().map_or(0, |s| s.len())
    }

    pub fn get(&self, i: usize) -> Option<&Sequence> {
        self.seqs.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.seqs.iter()
    }

    pub fn as_slice(&self) -> &[Sequence] {
        &self.seqs
    }

    /// Drops the length constraint and every gap symbol.
    pub fn unalign(&self) -> SeqBag {
        let mut bag = SeqBag::new(self.alphabet);
        for seq in &self.seqs {
            bag.push(seq.ungapped());
        }
        bag
    }
}

impl Index<usize> for Alignment {
    type Output = Sequence;

    fn index(&self, index: usize) -> &Self::Output {
        &self.seqs[index]
    }
}
