//! Longest open reading frame detection.

use crate::alphabets::dna::reverse_complement;
use crate::error::{BioError, BioResult};
use crate::seq::translate::{three_frames, START, STOP};
use crate::seq::{SeqBag, Sequence, Strand};
use memchr::memchr;

/// Position of an ORF on one strand of its source sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrfHit {
    pub strand: Strand,
    pub frame: usize,
    /// Nucleotide offset of the start codon on `strand`.
    pub start: usize,
    /// Nucleotide length, stop codon included.
    pub len: usize,
}

/// Longest `ATG..stop` run (or `ATG..` up to the last complete codon) over
/// every sequence of `bag`, the reverse complement included when `reverse`.
///
/// The returned sequence carries the name of the sequence it was found in.
/// Ties keep the first hit in sequence, strand, frame and position order.
pub fn longest_orf(bag: &SeqBag, reverse: bool) -> BioResult<Sequence> {
    let hits: Vec<Option<OrfHit>> =
        par_map!(bag.as_slice(), |seq: &Sequence| longest_in_sequence(seq.as_bytes(), reverse));

    let mut best: Option<(usize, OrfHit)> = None;
    for (i, hit) in hits.into_iter().enumerate() {
        let Some(hit) = hit else { continue };
        if best.map_or(true, |(_, b)| hit.len > b.len) {
            best = Some((i, hit));
        }
    }

    let (i, hit) = best.ok_or(BioError::NoOrfFound)?;
    let source = &bag[i];
    log::debug!(
        "longest orf: {} nt in '{}' ({:?} strand, frame {}, offset {})",
        hit.len,
        source.name(),
        hit.strand,
        hit.frame,
        hit.start
    );
    Ok(Sequence::new(source.name(), extract(source.as_bytes(), &hit)))
}

/// Longest ORF of a single nucleotide sequence.
pub fn longest_in_sequence(nt: &[u8], reverse: bool) -> Option<OrfHit> {
    let mut best = longest_on_strand(nt, Strand::Forward);
    if reverse {
        let rc = reverse_complement(nt);
        if let Some(hit) = longest_on_strand(&rc, Strand::Reverse) {
            if best.map_or(true, |b| hit.len > b.len) {
                best = Some(hit);
            }
        }
    }
    best
}

fn longest_on_strand(nt: &[u8], strand: Strand) -> Option<OrfHit> {
    let mut best: Option<OrfHit> = None;
    for (frame, aa) in three_frames(nt).iter().enumerate() {
        let mut i = 0;
        while let Some(off) = memchr(START, &aa[i..]) {
            let start = i + off;
            let end = match memchr(STOP, &aa[start..]) {
                Some(stop) => start + stop + 1,
                None => aa.len(),
            };
            let len = 3 * (end - start);
            if best.map_or(true, |b| len > b.len) {
                best = Some(OrfHit {
                    strand,
                    frame,
                    start: frame + 3 * start,
                    len,
                });
            }
            if end >= aa.len() {
                break;
            }
            i = end;
        }
    }
    best
}

/// Nucleotides of `hit`, read from the strand it was found on.
pub fn extract(nt: &[u8], hit: &OrfHit) -> Vec<u8> {
    match hit.strand {
        Strand::Forward => nt[hit.start..hit.start + hit.len].to_vec(),
        Strand::Reverse => {
            let rc = reverse_complement(nt);
            rc[hit.start..hit.start + hit.len].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::SeqAlphabet;

    fn bag(seqs: &[(&str, &[u8])]) -> SeqBag {
        let mut bag = SeqBag::new(SeqAlphabet::Nucleotide);
        for (name, seq) in seqs {
            bag.add_sequence(*name, seq.to_vec(), None);
        }
        bag
    }

    #[test]
    fn longest_of_three() {
        let bag = bag(&[
            ("nine", b"ATGAAATAA"),
            ("fifteen", b"CCATGAAACCCGGGTAGCC"),
            ("twelve", b"ATGCCCGGGTGA"),
        ]);
        let orf = longest_orf(&bag, false).unwrap();
        assert_eq!(orf.name(), "fifteen");
        assert_eq!(orf.as_bytes(), b"ATGAAACCCGGGTAG");
        assert_eq!(orf.len(), 15);
    }

    #[test]
    fn ties_keep_first_sequence() {
        let bag = bag(&[("a", b"ATGCCCTAA"), ("b", b"ATGGGGTGA")]);
        assert_eq!(longest_orf(&bag, false).unwrap().name(), "a");
    }

    #[test]
    fn orf_without_stop_runs_to_last_codon() {
        let hit = longest_in_sequence(b"CCATGAAACCCG", false).unwrap();
        assert_eq!(hit.frame, 2);
        assert_eq!(hit.start, 2);
        assert_eq!(hit.len, 9);
    }

    #[test]
    fn later_orf_in_same_frame() {
        // ATG TAA | ATG AAA CCC TAG
        let hit = longest_in_sequence(b"ATGTAAATGAAACCCTAG", false).unwrap();
        assert_eq!(hit.start, 6);
        assert_eq!(hit.len, 12);
    }

    #[test]
    fn reverse_strand_search() {
        // reverse complement of ATGAAACCCTAA
        let bag = bag(&[("rev", b"TTAGGGTTTCAT")]);
        assert!(matches!(longest_orf(&bag, false), Err(BioError::NoOrfFound)));

        let orf = longest_orf(&bag, true).unwrap();
        assert_eq!(orf.name(), "rev");
        assert_eq!(orf.as_bytes(), b"ATGAAACCCTAA");
        let hit = longest_in_sequence(b"TTAGGGTTTCAT", true).unwrap();
        assert_eq!(hit.strand, Strand::Reverse);
    }

    #[test]
    fn no_orf_is_an_error() {
        let bag = bag(&[("a", b"CCCCCC"), ("b", b"")]);
        assert!(matches!(longest_orf(&bag, true), Err(BioError::NoOrfFound)));
        assert!(matches!(
            longest_orf(&SeqBag::default(), false),
            Err(BioError::NoOrfFound)
        ));
    }

    #[test]
    fn bag_method_delegates() {
        let bag = bag(&[("x", b"GGATGCCCTGA")]);
        assert_eq!(bag.longest_orf(false).unwrap().as_bytes(), b"ATGCCCTGA");
    }
}
