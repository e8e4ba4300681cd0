//! Tab-separated report of a phasing run.

use crate::error::{BioError, BioResult};
use crate::io::fasta::write_record;
use crate::phase::{PhaseOutcome, PhasedSequence};
use crate::seq::Sequence;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

pub const HEADER: [&str; 4] = [
    "SeqName",
    "StartPosition",
    "ExtractedSequenceLength",
    "FirstStop",
];

/// Writes the reference ORF, the column header, then one row per sequence.
pub struct PhaseLogWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PhaseLogWriter<W> {
    pub fn new(mut inner: W, orf: &Sequence) -> BioResult<Self> {
        inner.write_all(b"Detected/Given ORF: ")?;
        write_record(&mut inner, orf)?;

        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .quote_style(QuoteStyle::Never)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, phased: &PhasedSequence) -> BioResult<()> {
        match &phased.outcome {
            PhaseOutcome::Accepted(seq) => {
                let first_stop = seq.first_stop().map_or(-1, |i| i as i64);
                self.writer.write_record([
                    phased.name.to_string(),
                    seq.start_position.to_string(),
                    seq.aa.len().to_string(),
                    first_stop.to_string(),
                ])?;
            }
            PhaseOutcome::Removed => {
                self.writer
                    .write_record([&*phased.name, "Removed", "N/A"])?;
            }
            PhaseOutcome::Failed(err) => {
                self.writer
                    .write_record([phased.name.to_string(), "Failed".to_string(), err.to_string()])?;
            }
        }
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(self) -> BioResult<W> {
        self.writer
            .into_inner()
            .map_err(|err| BioError::Io(err.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhasedSeq;
    use crate::seq::Strand;

    fn accepted(name: &str, aa: &[u8]) -> PhasedSequence {
        PhasedSequence {
            name: name.into(),
            index: 0,
            outcome: PhaseOutcome::Accepted(PhasedSeq {
                nt: Sequence::new(name, b"ATGCCCGGGTAA".to_vec()),
                aa: Sequence::new(name, aa.to_vec()),
                start_position: 2,
                strand: Strand::Forward,
                frame: 2,
                matches: 4,
                alignment_length: 4,
                divergence: Some(0.0),
            }),
        }
    }

    #[test]
    fn log_layout() {
        let orf = Sequence::new("ref_LongestORF", b"ATGCCCGGGTAA".to_vec());
        let mut log = PhaseLogWriter::new(Vec::new(), &orf).unwrap();
        log.write(&accepted("s1", b"MPG*")).unwrap();
        log.write(&accepted("s2", b"MPGK")).unwrap();
        log.write(&PhasedSequence {
            name: "s3".into(),
            index: 2,
            outcome: PhaseOutcome::Removed,
        })
        .unwrap();
        log.write(&PhasedSequence {
            name: "s4".into(),
            index: 3,
            outcome: PhaseOutcome::Failed(BioError::NoValidSites),
        })
        .unwrap();
        let text = String::from_utf8(log.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            "Detected/Given ORF: >ref_LongestORF\n\
             ATGCCCGGGTAA\n\
             SeqName\tStartPosition\tExtractedSequenceLength\tFirstStop\n\
             s1\t2\t4\t3\n\
             s2\t2\t4\t-1\n\
             s3\tRemoved\tN/A\n\
             s4\tFailed\tno valid sites to compare\n"
        );
    }
}
