//! Jukes-Cantor (JC69) nucleotide distances.

use crate::align::encode::encode_sites;
use crate::alphabets::{is_gap, SeqAlphabet};
use crate::error::{BioError, BioResult};
use crate::seq::Alignment;

#[cfg(test)]
mod tests;

/// JC69 distance between two encoded sequences.
///
/// Only sites selected by `selected` (all when `None`) where both sequences
/// carry a nucleotide code are compared, each weighted by `weights` (uniform
/// when `None`). With `gamma = Some(alpha)` the gamma-corrected formula is used.
/// Saturated or otherwise non-positive results are reported as 0.
pub fn jc69_distance(
    seq1: &[u8],
    seq2: &[u8],
    selected: Option<&[bool]>,
    weights: Option<&[f64]>,
    gamma: Option<f64>,
) -> BioResult<f64> {
    if seq1.len() != seq2.len() {
        return Err(BioError::SequenceLengthMismatch {
            index: 1,
            len: seq2.len(),
            expected: seq1.len(),
        });
    }
    check_site_vector(selected.map(|s| s.len()), seq1.len())?;
    check_site_vector(weights.map(|w| w.len()), seq1.len())?;
    if let Some(alpha) = gamma {
        if alpha.is_nan() || alpha <= 0.0 {
            return Err(BioError::InvalidParameter {
                msg: format!("gamma shape must be > 0, got {alpha}"),
            });
        }
    }

    let (diff, total) = count_diffs(seq1, seq2, selected, weights);
    if total <= 0.0 {
        return Err(BioError::NoValidSites);
    }

    let p = diff / total;
    let b = 1.0 - 4.0 * p / 3.0;
    let dist = match gamma {
        Some(alpha) => 0.75 * alpha * (b.powf(-1.0 / alpha) - 1.0),
        None => -0.75 * b.ln(),
    };
    // b <= 0 (p >= 3/4) is saturation, not a distance
    if b > 0.0 && dist > 0.0 {
        Ok(dist)
    } else {
        Ok(0.0)
    }
}

fn check_site_vector(len: Option<usize>, expected: usize) -> BioResult<()> {
    match len {
        Some(len) if len != expected => Err(BioError::SequenceLengthMismatch {
            index: 0,
            len,
            expected,
        }),
        _ => Ok(()),
    }
}

#[inline]
fn is_nucleotide_code(c: u8) -> bool {
    c < 4
}

fn count_diffs(
    seq1: &[u8],
    seq2: &[u8],
    selected: Option<&[bool]>,
    weights: Option<&[f64]>,
) -> (f64, f64) {
    let mut diff = 0.0f64;
    let mut total = 0.0f64;

    for (site, (&x, &y)) in seq1.iter().zip(seq2.iter()).enumerate() {
        if let Some(selected) = selected {
            if !selected[site] {
                continue;
            }
        }
        if !is_nucleotide_code(x) || !is_nucleotide_code(y) {
            continue;
        }
        let w = weights.map_or(1.0, |w| w[site]);
        total += w;
        if x != y {
            diff += w;
        }
    }

    (diff, total)
}

/// Site selection and encoded rows of one alignment, ready for pairwise JC69.
#[derive(Clone, Debug, Default)]
pub struct Jc69 {
    remove_gaps: bool,
    gamma: Option<f64>,
    selected: Vec<bool>,
    weights: Option<Vec<f64>>,
    num_sites: usize,
    codes: Vec<Vec<u8>>,
}

impl Jc69 {
    /// With `remove_gaps`, columns holding a gap in any sequence are ignored.
    pub fn new(remove_gaps: bool) -> Self {
        Self {
            remove_gaps,
            ..Self::default()
        }
    }

    pub fn with_gamma(mut self, alpha: f64) -> Self {
        self.gamma = Some(alpha);
        self
    }

    pub fn init(&mut self, al: &Alignment, weights: Option<&[f64]>) -> BioResult<()> {
        if al.alphabet() != SeqAlphabet::Nucleotide {
            return Err(BioError::NotNucleotide {
                alphabet: al.alphabet(),
            });
        }
        let len = al.length();
        check_site_vector(weights.map(|w| w.len()), len)?;

        let mut selected = vec![true; len];
        if let Some(weights) = weights {
            for (site, &w) in weights.iter().enumerate() {
                if w == 0.0 {
                    selected[site] = false;
                }
            }
        }
        if self.remove_gaps {
            for seq in al.iter() {
                for (site, &b) in seq.as_bytes().iter().enumerate() {
                    if is_gap(b) {
                        selected[site] = false;
                    }
                }
            }
        }

        let codes = al
            .iter()
            .map(|seq| encode_sites(seq.as_bytes(), SeqAlphabet::Nucleotide))
            .collect::<BioResult<Vec<_>>>()?;

        self.num_sites = selected.iter().filter(|&&s| s).count();
        self.selected = selected;
        self.weights = weights.map(|w| w.to_vec());
        self.codes = codes;
        log::debug!(
            "jc69: {} sequences, {} of {} sites selected",
            self.codes.len(),
            self.num_sites,
            len
        );
        Ok(())
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn selected_sites(&self) -> &[bool] {
        &self.selected
    }

    /// Encoded row `i`; every code is below 4 or equals [`crate::align::UNKNOWN_SITE`].
    pub fn sequence(&self, i: usize) -> BioResult<&[u8]> {
        self.codes
            .get(i)
            .map(|c| c.as_slice())
            .ok_or_else(|| BioError::InvalidParameter {
                msg: format!("no sequence at index {i}"),
            })
    }

    pub fn distance(&self, i: usize, j: usize) -> BioResult<f64> {
        jc69_distance(
            self.sequence(i)?,
            self.sequence(j)?,
            Some(&self.selected),
            self.weights.as_deref(),
            self.gamma,
        )
    }
}
