//! Reading-frame phasing against a reference ORF.
//!
//! Every input sequence is translated in three (or six, with the reverse
//! strand) frames, each translation is aligned to the reference protein, and
//! the frame with the most matching residues among those passing the cutoffs
//! is kept. The sequence is then trimmed to start at the codon aligned with the
//! first reference residue.

mod candidate;
mod engine;

pub use engine::{Counts, PhasedStream, Phaser};

use crate::align::{encode_protein, EncodedSeq};
use crate::alphabets::{detect_alphabet, SeqAlphabet};
use crate::error::{BioError, BioResult};
use crate::seq::translate::{first_stop, translate};
use crate::seq::{SeqBag, Sequence, Strand};
use std::num::NonZeroUsize;
use std::thread;


/// What the engine does after a sequence fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop handing out work; sequences not yet started get no result.
    #[default]
    FailFast,
    SkipAndContinue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseOptions {
    /// Minimum alignment length as a fraction of the reference protein length.
    /// Negative disables.
    pub len_cutoff: f64,
    /// Minimum fraction of matching residues over the alignment length.
    /// Negative disables.
    pub match_cutoff: f64,
    /// Also search the three frames of the reverse complement.
    pub reverse: bool,
    /// Drop the nucleotides after the last aligned codon.
    pub cut_end: bool,
    pub workers: usize,
    pub on_failure: FailurePolicy,
}

impl Default for PhaseOptions {
    fn default() -> Self {
        Self {
            len_cutoff: -1.0,
            match_cutoff: 0.5,
            reverse: false,
            cut_end: false,
            workers: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            on_failure: FailurePolicy::FailFast,
        }
    }
}

impl PhaseOptions {
    pub fn with_len_cutoff(mut self, cutoff: f64) -> Self {
        self.len_cutoff = cutoff;
        self
    }

    pub fn with_match_cutoff(mut self, cutoff: f64) -> Self {
        self.match_cutoff = cutoff;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_cut_end(mut self, cut_end: bool) -> Self {
        self.cut_end = cut_end;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub(crate) fn validate(&self) -> BioResult<()> {
        if self.workers == 0 {
            return Err(BioError::InvalidParameter {
                msg: "at least one worker is required".to_string(),
            });
        }
        if self.len_cutoff.is_nan() || self.match_cutoff.is_nan() {
            return Err(BioError::InvalidParameter {
                msg: "cutoffs must be numbers".to_string(),
            });
        }
        Ok(())
    }
}

/// Nucleotide ORF plus its frame-0 translation, shared read-only by workers.
#[derive(Clone, Debug)]
pub struct ReferenceOrf {
    nt: Sequence,
    aa: Vec<u8>,
    encoded: EncodedSeq,
}

impl ReferenceOrf {
    pub fn new(seq: Sequence) -> BioResult<Self> {
        let nt = seq.ungapped();
        if nt.is_empty() {
            return Err(BioError::Reference {
                msg: format!("sequence '{}' is empty", nt.name()),
            });
        }
        let alphabet = detect_alphabet(nt.as_bytes());
        if alphabet != SeqAlphabet::Nucleotide {
            return Err(BioError::Reference {
                msg: format!("sequence '{}' is not nucleotidic ({alphabet})", nt.name()),
            });
        }
        let aa = translate(nt.as_bytes());
        if aa.is_empty() {
            return Err(BioError::Reference {
                msg: format!("sequence '{}' is shorter than one codon", nt.name()),
            });
        }
        let encoded = encode_protein(&aa).map_err(|err| BioError::Reference {
            msg: format!("cannot encode translation of '{}': {err}", nt.name()),
        })?;
        Ok(Self { nt, aa, encoded })
    }

    /// First sequence of `bag`.
    pub fn from_bag(bag: &SeqBag) -> BioResult<Self> {
        let first = bag.get(0).ok_or_else(|| BioError::Reference {
            msg: "reference file should contain at least one sequence".to_string(),
        })?;
        Self::new(first.clone())
    }

    /// Longest ORF of `bag`, renamed `<source>_LongestORF`.
    pub fn detect(bag: &SeqBag, reverse: bool) -> BioResult<Self> {
        let mut orf = bag.longest_orf(reverse)?;
        let name = format!("{}_LongestORF", orf.name());
        orf.set_name(name);
        Self::new(orf)
    }

    pub fn name(&self) -> &str {
        self.nt.name()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.nt
    }

    pub fn translation(&self) -> &[u8] {
        &self.aa
    }

    pub fn encoded(&self) -> &EncodedSeq {
        &self.encoded
    }
}

/// Trimmed output of an accepted sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct PhasedSeq {
    pub nt: Sequence,
    pub aa: Sequence,
    /// Offset of the retained start codon in the input sequence, forward
    /// coordinates. On the reverse strand this is the position of the first
    /// base of the start codon, read on the forward strand.
    pub start_position: usize,
    pub strand: Strand,
    pub frame: usize,
    pub matches: usize,
    pub alignment_length: usize,
    /// JC69 distance between the aligned codons and the reference codons.
    pub divergence: Option<f64>,
}

impl PhasedSeq {
    pub fn first_stop(&self) -> Option<usize> {
        first_stop(self.aa.as_bytes())
    }
}

#[derive(Debug)]
pub enum PhaseOutcome {
    Accepted(PhasedSeq),
    /// No frame passed the cutoffs.
    Removed,
    Failed(BioError),
}

#[derive(Debug)]
pub struct PhasedSequence {
    pub name: Box<str>,
    /// Position in the input bag.
    pub index: usize,
    pub outcome: PhaseOutcome,
}

impl PhasedSequence {
    pub fn accepted(&self) -> Option<&PhasedSeq> {
        match &self.outcome {
            PhaseOutcome::Accepted(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.outcome, PhaseOutcome::Removed)
    }

    pub fn error(&self) -> Option<&BioError> {
        match &self.outcome {
            PhaseOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
