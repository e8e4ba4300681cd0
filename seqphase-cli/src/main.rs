use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use seqphase_core::io::phase_log::PhaseLogWriter;
use seqphase_core::io::{fasta, read_alignment_from_path, AlignmentFormat};
use seqphase_core::phase::{
    FailurePolicy, PhaseOptions, PhaseOutcome, PhasedSequence, Phaser, ReferenceOrf,
};
use seqphase_core::seq::{SeqBag, Sequence};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// seqphase - ORF-guided phasing of nucleotide sequences
#[derive(Parser, Debug)]
#[command(name = "seqphase", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every phased sequence
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Trim each sequence so that it starts on the codon aligned with the
    /// start of a reference ORF (given, or the longest ORF of the input)
    Phase(PhaseArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// FASTA alignment
    Fasta,
    /// Interleaved PHYLIP alignment
    Phylip,
    /// `>` as first character means FASTA
    Auto,
}

impl From<FormatArg> for Option<AlignmentFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => Some(AlignmentFormat::Fasta),
            FormatArg::Phylip => Some(AlignmentFormat::Phylip),
            FormatArg::Auto => None,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct PhaseArgs {
    /// Input alignment (or FASTA sequences with --unaligned)
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Read the input as unaligned FASTA
    #[arg(long = "unaligned")]
    unaligned: bool,

    /// Format of the input alignment
    #[arg(long = "input-format", value_enum, default_value = "auto")]
    input_format: FormatArg,

    /// Phased nucleotide FASTA ("stdout" or "-" for standard output)
    #[arg(short = 'o', long = "output", default_value = "stdout")]
    output: String,

    /// Phased amino-acid FASTA ("none" to skip)
    #[arg(long = "aa-output", default_value = "none")]
    aa_output: String,

    /// Tab-separated log of the retained start positions ("none" to skip)
    #[arg(short = 'l', long = "log", default_value = "none")]
    log: String,

    /// Minimum alignment length over the ORF protein length (-1 disables)
    #[arg(long = "len-cutoff", default_value_t = -1.0, allow_negative_numbers = true)]
    len_cutoff: f64,

    /// Minimum matches over the alignment length (-1 disables)
    #[arg(long = "match-cutoff", default_value_t = 0.5, allow_negative_numbers = true)]
    match_cutoff: f64,

    /// Also search the reverse strand
    #[arg(long = "reverse")]
    reverse: bool,

    /// Also remove the end of sequences that does not align with the ORF
    #[arg(long = "cut-end")]
    cut_end: bool,

    /// Reference ORF, FASTA ("none" detects the longest ORF of the input)
    #[arg(long = "ref-orf", default_value = "none")]
    ref_orf: String,

    /// Worker threads (default: available parallelism)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Report failing sequences in the log instead of aborting
    #[arg(long = "skip-failed")]
    skip_failed: bool,
}

impl PhaseArgs {
    fn options(&self) -> PhaseOptions {
        let mut opts = PhaseOptions::default()
            .with_len_cutoff(self.len_cutoff)
            .with_match_cutoff(self.match_cutoff)
            .with_reverse(self.reverse)
            .with_cut_end(self.cut_end);
        if let Some(threads) = self.threads {
            opts = opts.with_workers(threads);
        }
        if self.skip_failed {
            opts = opts.with_failure_policy(FailurePolicy::SkipAndContinue);
        }
        opts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Stdout,
    File(PathBuf),
}

/// `None` for "none".
fn parse_target(arg: &str) -> Option<Target> {
    match arg {
        "none" => None,
        "-" | "stdout" => Some(Target::Stdout),
        path => Some(Target::File(PathBuf::from(path))),
    }
}

fn open_target(target: &Target) -> Result<Box<dyn Write>> {
    match target {
        Target::Stdout => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Target::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

fn read_input(args: &PhaseArgs) -> Result<SeqBag> {
    let path = &args.input;
    if args.unaligned {
        return fasta::read_fasta_from_path(path)
            .with_context(|| format!("failed to read sequences from {}", path.display()));
    }
    let al = read_alignment_from_path(path, args.input_format.into())
        .with_context(|| format!("failed to read alignment from {}", path.display()))?;
    Ok(al.unalign())
}

fn read_reference(args: &PhaseArgs, input: &SeqBag) -> Result<ReferenceOrf> {
    if args.ref_orf == "none" {
        let orf = ReferenceOrf::detect(input, args.reverse)
            .context("failed to detect the longest ORF of the input")?;
        log::info!(
            "detected ORF {} ({} nt)",
            orf.name(),
            orf.sequence().len()
        );
        return Ok(orf);
    }
    let path = Path::new(&args.ref_orf);
    let file =
        File::open(path).with_context(|| format!("cannot open reference ORF {}", path.display()))?;
    let Some(seq) = fasta::read_first_fasta_record(BufReader::new(file))
        .with_context(|| format!("failed to read reference ORF from {}", path.display()))?
    else {
        bail!(
            "reference file {} should contain at least one sequence",
            path.display()
        );
    };
    ReferenceOrf::new(seq).with_context(|| format!("invalid reference ORF in {}", path.display()))
}

/// Runs the phasing and returns every result in input order.
fn phase(
    args: &PhaseArgs,
    reference: Arc<ReferenceOrf>,
    input: SeqBag,
) -> Result<Vec<PhasedSequence>> {
    let opts = args.options();
    let fail_fast = opts.on_failure == FailurePolicy::FailFast;
    let stream = Phaser::new(opts)
        .phase(reference, input)
        .context("cannot phase the input sequences")?;

    let mut results = Vec::with_capacity(stream.total());
    for phased in stream {
        if fail_fast {
            if let PhaseOutcome::Failed(err) = phased.outcome {
                return Err(anyhow::Error::new(err)
                    .context(format!("failed to phase sequence {}", phased.name)));
            }
        }
        results.push(phased);
    }
    results.sort_by_key(|p| p.index);
    Ok(results)
}

fn write_sequences<'a, I>(target: &Target, seqs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Sequence>,
{
    let writer = open_target(target)?;
    fasta::write_fasta_to(writer, seqs).context("failed to write sequences")
}

fn run_phase(args: &PhaseArgs) -> Result<()> {
    let nt_target = parse_target(&args.output);
    let aa_target = parse_target(&args.aa_output);
    let log_target = parse_target(&args.log);

    let input = read_input(args)?;
    let reference = Arc::new(read_reference(args, &input)?);
    let results = phase(args, Arc::clone(&reference), input)?;

    // nothing is written before the whole run succeeded
    let accepted = || results.iter().filter_map(|p| p.accepted());
    if let Some(target) = &nt_target {
        write_sequences(target, accepted().map(|p| &p.nt))?;
    }
    if let Some(target) = &aa_target {
        write_sequences(target, accepted().map(|p| &p.aa))?;
    }
    if let Some(target) = &log_target {
        let mut log = PhaseLogWriter::new(open_target(target)?, reference.sequence())?;
        for phased in &results {
            log.write(phased)?;
        }
        log.finish()?.flush()?;
    }
    log::info!(
        "{} of {} sequences phased",
        accepted().count(),
        results.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match &cli.command {
        Commands::Phase(args) => run_phase(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir, input: &str, extra: &[&str]) -> PhaseArgs {
        let input_path = dir.path().join("input");
        fs::write(&input_path, input).unwrap();
        let out = dir.path().join("out.fa");
        let aa = dir.path().join("out.aa.fa");
        let log = dir.path().join("out.log");
        let mut argv = vec![
            "seqphase".to_string(),
            "phase".to_string(),
            "-i".to_string(),
            input_path.display().to_string(),
            "-o".to_string(),
            out.display().to_string(),
            "--aa-output".to_string(),
            aa.display().to_string(),
            "-l".to_string(),
            log.display().to_string(),
            "-t".to_string(),
            "2".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Phase(args) => args,
        }
    }

    fn read(dir: &TempDir, name: &str) -> String {
        fs::read_to_string(dir.path().join(name)).unwrap()
    }

    const PHYLIP: &str = "2 16\ns1 TTATGCCCGG GTAAGG\ns2 AAAAAAAAAA AAAAAA\n";

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["seqphase", "phase", "-i", "in.phy"]).unwrap();
        let Commands::Phase(args) = cli.command;
        assert_eq!(args.output, "stdout");
        assert_eq!(args.aa_output, "none");
        assert_eq!(args.log, "none");
        assert_eq!(args.ref_orf, "none");
        assert_eq!(args.len_cutoff, -1.0);
        assert_eq!(args.match_cutoff, 0.5);
        assert!(!args.reverse && !args.cut_end && !args.unaligned && !args.skip_failed);
        assert_eq!(args.options().on_failure, FailurePolicy::FailFast);
    }

    #[test]
    fn negative_cutoffs_parse() {
        let cli = Cli::try_parse_from([
            "seqphase",
            "phase",
            "-i",
            "in.phy",
            "--match-cutoff",
            "-1",
            "--len-cutoff",
            "0.8",
        ])
        .unwrap();
        let Commands::Phase(args) = cli.command;
        assert_eq!(args.options().match_cutoff, -1.0);
        assert_eq!(args.options().len_cutoff, 0.8);
    }

    #[test]
    fn targets() {
        assert_eq!(parse_target("none"), None);
        assert_eq!(parse_target("-"), Some(Target::Stdout));
        assert_eq!(parse_target("stdout"), Some(Target::Stdout));
        assert_eq!(
            parse_target("out.fa"),
            Some(Target::File(PathBuf::from("out.fa")))
        );
    }

    #[test]
    fn phase_with_given_reference() {
        let dir = TempDir::new().unwrap();
        let ref_path = dir.path().join("ref.fa");
        fs::write(&ref_path, ">ref\nATGCCCGGGTAA\n>other\nCCC\n").unwrap();
        let args = args_for(&dir, PHYLIP, &["--ref-orf", &ref_path.display().to_string()]);
        run_phase(&args).unwrap();

        assert_eq!(read(&dir, "out.fa"), ">s1\nATGCCCGGGTAAGG\n");
        assert_eq!(read(&dir, "out.aa.fa"), ">s1\nMPG*\n");
        assert_eq!(
            read(&dir, "out.log"),
            "Detected/Given ORF: >ref\nATGCCCGGGTAA\n\
             SeqName\tStartPosition\tExtractedSequenceLength\tFirstStop\n\
             s1\t2\t4\t3\n\
             s2\tRemoved\tN/A\n"
        );
    }

    #[test]
    fn phase_with_detected_reference() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir, PHYLIP, &[]);
        run_phase(&args).unwrap();
        assert!(read(&dir, "out.log").starts_with("Detected/Given ORF: >s1_LongestORF\n"));
        assert_eq!(read(&dir, "out.fa"), ">s1\nATGCCCGGGTAAGG\n");
    }

    #[test]
    fn unaligned_fasta_input() {
        let dir = TempDir::new().unwrap();
        let input = ">a\nCCATGCCCGGGTAA\n>b\nTTATGCCCGGGTAAGGCC\n";
        let args = args_for(&dir, input, &["--unaligned", "--cut-end"]);
        run_phase(&args).unwrap();
        assert_eq!(
            read(&dir, "out.fa"),
            ">a\nATGCCCGGGTAA\n>b\nATGCCCGGGTAA\n"
        );
    }

    #[test]
    fn empty_reference_is_fatal_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ref_path = dir.path().join("empty.fa");
        fs::write(&ref_path, "").unwrap();
        let args = args_for(&dir, PHYLIP, &["--ref-orf", &ref_path.display().to_string()]);
        let err = run_phase(&args).unwrap_err();
        assert!(format!("{err:#}").contains("at least one sequence"));
        assert!(!dir.path().join("out.fa").exists());
        assert!(!dir.path().join("out.log").exists());
    }

    #[test]
    fn missing_reference_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.fa");
        let args = args_for(&dir, PHYLIP, &["--ref-orf", &missing.display().to_string()]);
        let err = run_phase(&args).unwrap_err();
        assert!(format!("{err:#}").contains("cannot open reference ORF"));
        assert!(!dir.path().join("out.fa").exists());
    }

    #[test]
    fn malformed_alignment_is_fatal() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir, "3 16\ns1 TTATGCCCGGGTAAGG\n", &[]);
        let err = run_phase(&args).unwrap_err();
        assert!(format!("{err:#}").contains("expected 3 sequences, found 1"));
        assert!(!dir.path().join("out.fa").exists());
    }

    #[test]
    fn protein_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let ref_path = dir.path().join("ref.fa");
        fs::write(&ref_path, ">ref\nATGCCCGGGTAA\n").unwrap();
        let args = args_for(
            &dir,
            ">p\nMKLVWWEEQ\n",
            &["--unaligned", "--ref-orf", &ref_path.display().to_string()],
        );
        let err = run_phase(&args).unwrap_err();
        assert!(format!("{err:#}").contains("nucleotidic"));
    }
}
