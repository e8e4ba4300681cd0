use super::candidate::phase_sequence;
use super::{FailurePolicy, PhaseOptions, PhaseOutcome, PhasedSeq, PhasedSequence, ReferenceOrf};
use crate::align::Scoring;
use crate::alphabets::SeqAlphabet;
use crate::error::{BioError, BioResult};
use crate::seq::{SeqBag, Sequence};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Results buffered per worker before workers block.
const RESULTS_PER_WORKER: usize = 4;

#[derive(Clone, Debug)]
pub struct Phaser {
    options: PhaseOptions,
    scoring: Scoring,
}

impl Default for Phaser {
    fn default() -> Self {
        Self::new(PhaseOptions::default())
    }
}

impl Phaser {
    /// BLOSUM62, gap open -11, gap extend -1.
    pub fn new(options: PhaseOptions) -> Self {
        Self {
            options,
            scoring: Scoring::blosum62(),
        }
    }

    pub fn options(&self) -> &PhaseOptions {
        &self.options
    }

    /// Phases a single sequence on the calling thread.
    pub fn phase_one(
        &self,
        reference: &ReferenceOrf,
        seq: &Sequence,
    ) -> BioResult<Option<PhasedSeq>> {
        phase_sequence(seq, reference, &self.options, &self.scoring)
    }

    /// Phases against the first sequence of `reference`.
    pub fn phase_with_bag(&self, reference: &SeqBag, input: SeqBag) -> BioResult<PhasedStream> {
        let reference = ReferenceOrf::from_bag(reference)?;
        self.phase(Arc::new(reference), input)
    }

    /// Validates the input, then phases every sequence on `workers` threads.
    ///
    /// Results arrive in completion order. Errors returned here are fatal and
    /// happen before any worker starts; per-sequence errors are reported as
    /// [`PhaseOutcome::Failed`].
    pub fn phase(
        &self,
        reference: Arc<ReferenceOrf>,
        mut input: SeqBag,
    ) -> BioResult<PhasedStream> {
        self.options.validate()?;
        if input.alphabet() == SeqAlphabet::Unknown {
            input.auto_alphabet();
        }
        if input.alphabet() != SeqAlphabet::Nucleotide {
            return Err(BioError::NotNucleotide {
                alphabet: input.alphabet(),
            });
        }

        let total = input.len();
        let n_workers = self.options.workers.min(total.max(1));
        log::info!(
            "phasing {} sequences against '{}' ({} aa) with {} workers",
            total,
            reference.name(),
            reference.translation().len(),
            n_workers
        );

        let (work_tx, work_rx) = unbounded::<usize>();
        for i in 0..total {
            if work_tx.send(i).is_err() {
                break;
            }
        }
        drop(work_tx);

        let (result_tx, result_rx) = bounded(n_workers * RESULTS_PER_WORKER);
        let cancel = Arc::new(AtomicBool::new(false));
        let input = Arc::new(input);

        let mut workers = Vec::with_capacity(n_workers);
        for id in 0..n_workers {
            let worker = Worker {
                reference: Arc::clone(&reference),
                input: Arc::clone(&input),
                options: self.options.clone(),
                scoring: self.scoring.clone(),
                work: work_rx.clone(),
                results: result_tx.clone(),
                cancel: Arc::clone(&cancel),
            };
            let spawned = thread::Builder::new()
                .name(format!("phase-{id}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    cancel.store(true, Ordering::Relaxed);
                    return Err(BioError::Io(err));
                }
            }
        }

        Ok(PhasedStream {
            results: Some(result_rx),
            cancel,
            workers,
            total,
            counts: Counts::default(),
            finished: false,
        })
    }
}

struct Worker {
    reference: Arc<ReferenceOrf>,
    input: Arc<SeqBag>,
    options: PhaseOptions,
    scoring: Scoring,
    work: Receiver<usize>,
    results: Sender<PhasedSequence>,
    cancel: Arc<AtomicBool>,
}

impl Worker {
    fn run(self) {
        while !self.cancel.load(Ordering::Relaxed) {
            // disconnected once the queue is drained
            let Ok(index) = self.work.recv() else { break };
            let seq = &self.input[index];
            let phased = phase_sequence(seq, &self.reference, &self.options, &self.scoring);
            let outcome = match phased {
                Ok(Some(phased)) => PhaseOutcome::Accepted(phased),
                Ok(None) => PhaseOutcome::Removed,
                Err(err) => {
                    if self.options.on_failure == FailurePolicy::FailFast {
                        self.cancel.store(true, Ordering::Relaxed);
                    }
                    PhaseOutcome::Failed(err)
                }
            };
            let result = PhasedSequence {
                name: seq.name.clone(),
                index,
                outcome,
            };
            if self.results.send(result).is_err() {
                break;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub accepted: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Phasing results in completion order.
///
/// The iterator ends once every worker has exited. Dropping it early stops
/// the remaining work and joins the workers.
#[derive(Debug)]
pub struct PhasedStream {
    results: Option<Receiver<PhasedSequence>>,
    cancel: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    total: usize,
    counts: Counts,
    finished: bool,
}

impl PhasedStream {
    /// Number of input sequences.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Outcomes seen so far.
    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Drains the stream and restores input order.
    pub fn into_sorted_vec(self) -> Vec<PhasedSequence> {
        let mut out: Vec<PhasedSequence> = self.collect();
        out.sort_by_key(|p| p.index);
        out
    }

    fn shutdown(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // unblocks workers waiting on a full channel
        self.results.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("phasing worker panicked");
            }
        }
    }
}

impl Iterator for PhasedStream {
    type Item = PhasedSequence;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.results.as_ref()?.recv().ok();
        match &next {
            Some(phased) => match &phased.outcome {
                PhaseOutcome::Accepted(_) => self.counts.accepted += 1,
                PhaseOutcome::Removed => self.counts.removed += 1,
                PhaseOutcome::Failed(err) => {
                    self.counts.failed += 1;
                    log::warn!("{}: {err}", phased.name);
                }
            },
            None if !self.finished => {
                self.finished = true;
                self.shutdown();
                log::info!(
                    "phased {} sequences: {} accepted, {} removed, {} failed",
                    self.total,
                    self.counts.accepted,
                    self.counts.removed,
                    self.counts.failed
                );
            }
            None => {}
        }
        next
    }
}

impl Drop for PhasedStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}
