//! FASTA records: `>name comment` headers followed by sequence lines.

use crate::error::{BioError, BioResult};
use crate::seq::{Alignment, SeqBag, Sequence};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Residues per line when writing.
pub const FASTA_LINE_WIDTH: usize = 60;

/// Streams records from a reader.
///
/// Blank lines before the first header are skipped; whitespace inside
/// sequence lines is dropped. Iteration stops after the first error.
pub struct FastaRecords<R> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
    /// `line` holds a header that has not been turned into a record yet.
    header_ready: bool,
    done: bool,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_no: 0,
            header_ready: false,
            done: false,
        }
    }

    /// Loads the next line; `false` at end of input.
    fn advance(&mut self) -> BioResult<bool> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    fn is_header(&self) -> bool {
        self.line.first() == Some(&b'>')
    }

    fn read_record(&mut self) -> BioResult<Option<Sequence>> {
        while !self.header_ready {
            if !self.advance()? {
                return Ok(None);
            }
            if self.is_header() {
                self.header_ready = true;
            } else if !self.line.iter().all(u8::is_ascii_whitespace) {
                return Err(BioError::FastaFormat {
                    msg: "expected header line starting with '>'",
                    line: self.line_no,
                });
            }
        }
        self.header_ready = false;
        let (name, comment) = parse_header(&self.line, self.line_no)?;

        let mut seq = Vec::new();
        while self.advance()? {
            if self.is_header() {
                self.header_ready = true;
                break;
            }
            seq.extend(self.line.iter().filter(|b| !b.is_ascii_whitespace()));
        }
        Ok(Some(Sequence { name, seq, comment }))
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = BioResult<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let record = self.read_record().transpose();
        if !matches!(record, Some(Ok(_))) {
            self.done = true;
        }
        record
    }
}

pub fn fasta_records_from_reader<R: BufRead>(reader: R) -> FastaRecords<R> {
    FastaRecords::new(reader)
}

/// Reads every record into a bag and detects its alphabet.
pub fn read_fasta_from_reader<R: BufRead>(reader: R) -> BioResult<SeqBag> {
    let seqs = fasta_records_from_reader(reader).collect::<BioResult<Vec<_>>>()?;
    Ok(SeqBag::from_sequences(seqs))
}

pub fn read_fasta_from_path(path: impl AsRef<Path>) -> BioResult<SeqBag> {
    let file = File::open(path)?;
    read_fasta_from_reader(BufReader::new(file))
}

pub fn read_fasta_from_bytes(data: &[u8]) -> BioResult<SeqBag> {
    read_fasta_from_reader(Cursor::new(data))
}

/// Aligned FASTA: every record must have the same length.
pub fn read_fasta_alignment_from_reader<R: BufRead>(reader: R) -> BioResult<Alignment> {
    Alignment::from_bag(read_fasta_from_reader(reader)?)
}

/// First record of a FASTA stream, `None` when it holds no record.
pub fn read_first_fasta_record<R: BufRead>(reader: R) -> BioResult<Option<Sequence>> {
    fasta_records_from_reader(reader).next().transpose()
}

/// Splits `>name comment` at the first whitespace.
fn parse_header(line: &[u8], line_no: usize) -> BioResult<(Box<str>, Option<Box<str>>)> {
    let text = std::str::from_utf8(&line[1..]).map_err(|_| BioError::FastaFormat {
        msg: "header is not valid UTF-8",
        line: line_no,
    })?;
    let text = text.trim();
    let (name, comment) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    if name.is_empty() {
        return Err(BioError::FastaFormat {
            msg: "empty header",
            line: line_no,
        });
    }
    let comment = comment.trim();
    Ok((name.into(), (!comment.is_empty()).then(|| comment.into())))
}

pub fn write_record<W: Write>(writer: &mut W, seq: &Sequence) -> BioResult<()> {
    match seq.comment() {
        Some(comment) => writeln!(writer, ">{} {}", seq.name(), comment)?,
        None => writeln!(writer, ">{}", seq.name())?,
    }
    for line in seq.as_bytes().chunks(FASTA_LINE_WIDTH) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

pub fn write_fasta_to<'a, W, I>(mut writer: W, seqs: I) -> BioResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Sequence>,
{
    for seq in seqs {
        write_record(&mut writer, seq)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_fasta_to_path<'a, I>(path: impl AsRef<Path>, seqs: I) -> BioResult<()>
where
    I: IntoIterator<Item = &'a Sequence>,
{
    let file = File::create(path)?;
    write_fasta_to(BufWriter::new(file), seqs)
}
