use crate::alphabets::{detect_common_alphabet, SeqAlphabet};
use crate::error::BioResult;
use crate::seq::record::Sequence;
use std::ops::Index;

/// Unaligned sequences: no length constraint between members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeqBag {
    alphabet: SeqAlphabet,
    seqs: Vec<Sequence>,
}

impl SeqBag {
    pub fn new(alphabet: SeqAlphabet) -> Self {
        Self {
            alphabet,
            seqs: Vec::new(),
        }
    }

    /// Builds a bag and detects its alphabet from the content.
    pub fn from_sequences(seqs: Vec<Sequence>) -> Self {
        let mut bag = Self {
            alphabet: SeqAlphabet::Unknown,
            seqs,
        };
        bag.auto_alphabet();
        bag
    }

    pub fn alphabet(&self) -> SeqAlphabet {
        self.alphabet
    }

    pub fn set_alphabet(&mut self, alphabet: SeqAlphabet) {
        self.alphabet = alphabet;
    }

    pub fn auto_alphabet(&mut self) -> SeqAlphabet {
        self.alphabet = detect_common_alphabet(self.seqs.iter().map(|s| s.as_bytes()));
        self.alphabet
    }

    pub fn push(&mut self, seq: Sequence) {
        self.seqs.push(seq);
    }

    pub fn add_sequence(
        &mut self,
        name: impl Into<Box<str>>,
        seq: impl Into<Vec<u8>>,
        comment: Option<Box<str>>,
    ) {
        self.seqs.push(Sequence {
            name: name.into(),
            seq: seq.into(),
            comment,
        });
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
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

    pub fn into_vec(self) -> Vec<Sequence> {
        self.seqs
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.seqs.iter().map(|s| s.len()).collect()
    }

    /// Longest open reading frame over every sequence of the bag.
    pub fn longest_orf(&self, reverse: bool) -> BioResult<Sequence> {
        crate::orf::longest_orf(self, reverse)
    }
}

impl Index<usize> for SeqBag {
    type Output = Sequence;

    fn index(&self, index: usize) -> &Self::Output {
        &self.seqs[index]
    }
}

impl<'a> IntoIterator for &'a SeqBag {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs.iter()
    }
}
