use super::{PhaseOptions, PhasedSeq, ReferenceOrf};
use crate::align::{
    align_anchored, aligned_pairs, alignment_stats, encode_protein, encode_sites,
    AlignmentResult, AlignmentStats, CigarOp, Scoring,
};
use crate::alphabets::dna::{iupac_alphabet, reverse_complement};
use crate::alphabets::{is_gap, SeqAlphabet};
use crate::distance::jc69_distance;
use crate::error::{BioError, BioResult};
use crate::seq::translate::{three_frames, translate};
use crate::seq::{Sequence, Strand};

struct Candidate {
    strand: Strand,
    frame: usize,
    stats: AlignmentStats,
    result: AlignmentResult,
}

/// Aligned pair at reference residue 0 opens the alignment.
fn is_anchored(res: &AlignmentResult) -> bool {
    res.target_start == 0 && res.cigar.first_op() == Some(CigarOp::Match)
}

fn passes_cutoffs(stats: &AlignmentStats, ref_len: usize, opts: &PhaseOptions) -> bool {
    if stats.columns == 0 {
        return false;
    }
    let columns = stats.columns as f64;
    let len_ok = opts.len_cutoff < 0.0 || columns >= opts.len_cutoff * ref_len as f64;
    let match_ok = opts.match_cutoff < 0.0 || stats.matches as f64 / columns >= opts.match_cutoff;
    len_ok && match_ok
}

fn check_nucleotides(seq: &[u8]) -> BioResult<()> {
    match iupac_alphabet().first_foreign(seq, is_gap) {
        Some(pos) => Err(BioError::InvalidChar {
            ch: seq[pos] as char,
            pos,
        }),
        None => Ok(()),
    }
}

/// Codon-level JC69 distance over the aligned residue pairs.
fn codon_divergence(
    query_nt: &[u8],
    frame: usize,
    reference: &[u8],
    res: &AlignmentResult,
) -> Option<f64> {
    let pairs = aligned_pairs(res);
    let mut q = Vec::with_capacity(3 * pairs.len());
    let mut r = Vec::with_capacity(3 * pairs.len());
    for (qi, ti) in pairs {
        let qs = frame + 3 * qi;
        q.extend_from_slice(&query_nt[qs..qs + 3]);
        r.extend_from_slice(&reference[3 * ti..3 * ti + 3]);
    }
    let q = encode_sites(&q, SeqAlphabet::Nucleotide).ok()?;
    let r = encode_sites(&r, SeqAlphabet::Nucleotide).ok()?;
    jc69_distance(&q, &r, None, None, None).ok()
}

fn strand_bytes<'a>(forward: &'a [u8], reverse: Option<&'a [u8]>, strand: Strand) -> &'a [u8] {
    match (strand, reverse) {
        (Strand::Reverse, Some(rc)) => rc,
        _ => forward,
    }
}

/// Phases one sequence; `Ok(None)` means no frame passed the cutoffs.
pub(crate) fn phase_sequence(
    seq: &Sequence,
    reference: &ReferenceOrf,
    opts: &PhaseOptions,
    scoring: &Scoring,
) -> BioResult<Option<PhasedSeq>> {
    check_nucleotides(seq.as_bytes())?;

    let forward = seq.as_bytes();
    let reverse = if opts.reverse {
        Some(reverse_complement(forward))
    } else {
        None
    };
    let strands: &[Strand] = if opts.reverse {
        &[Strand::Forward, Strand::Reverse]
    } else {
        &[Strand::Forward]
    };

    let ref_aa = reference.translation();
    let mut best: Option<Candidate> = None;
    for &strand in strands {
        let nt = strand_bytes(forward, reverse.as_deref(), strand);
        for (frame, aa) in three_frames(nt).into_iter().enumerate() {
            if aa.is_empty() {
                continue;
            }
            let encoded = encode_protein(&aa)?;
            let result = align_anchored(&encoded, reference.encoded(), scoring)?;
            if !is_anchored(&result) {
                continue;
            }
            let stats = alignment_stats(&aa, ref_aa, &result);
            if !passes_cutoffs(&stats, ref_aa.len(), opts) {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |b| stats.matches > b.stats.matches)
            {
                best = Some(Candidate {
                    strand,
                    frame,
                    stats,
                    result,
                });
            }
        }
    }

    let Some(best) = best else {
        log::debug!("{}: removed, no frame passed the cutoffs", seq.name());
        return Ok(None);
    };

    let nt = strand_bytes(forward, reverse.as_deref(), best.strand);
    let start = best.frame + 3 * best.result.query_start;
    let end = if opts.cut_end {
        (best.frame + 3 * (best.result.query_end + 1)).min(nt.len())
    } else {
        nt.len()
    };
    let trimmed = nt[start..end].to_vec();
    let aa = translate(&trimmed);
    let start_position = match best.strand {
        Strand::Forward => start,
        Strand::Reverse => nt.len() - 1 - start,
    };
    let divergence = codon_divergence(
        nt,
        best.frame,
        reference.sequence().as_bytes(),
        &best.result,
    );

    log::debug!(
        "{}: {:?} strand, frame {}, start {}, {} matches over {} columns, divergence {:?}",
        seq.name(),
        best.strand,
        best.frame,
        start_position,
        best.stats.matches,
        best.stats.columns,
        divergence
    );

    let mut nt_out = Sequence::new(seq.name(), trimmed);
    let mut aa_out = Sequence::new(seq.name(), aa);
    if let Some(comment) = seq.comment() {
        nt_out = nt_out.with_comment(comment);
        aa_out = aa_out.with_comment(comment);
    }

    Ok(Some(PhasedSeq {
        nt: nt_out,
        aa: aa_out,
        start_position,
        strand: best.strand,
        frame: best.frame,
        matches: best.stats.matches,
        alignment_length: best.stats.columns,
        divergence,
    }))
}
