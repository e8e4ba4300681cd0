use super::scanner::{Scanner, Token, TokenKind};
use crate::alphabets::{detect_alphabet, SeqAlphabet};
use crate::error::{BioError, BioResult};
use crate::seq::Alignment;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

/// Upper bound on buffers sized from header values.
const PREALLOC_LIMIT: usize = 1024;

/// Block-format parser with one token of lookahead.
pub struct Parser<R> {
    scanner: Scanner<R>,
    pending: Option<Token>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            scanner: Scanner::new(reader),
            pending: None,
        }
    }

    fn scan(&mut self) -> BioResult<Token> {
        match self.pending.take() {
            Some(tok) => Ok(tok),
            None => self.scanner.scan(),
        }
    }

    fn unscan(&mut self, tok: Token) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(tok);
    }

    fn scan_ignore_whitespace(&mut self) -> BioResult<Token> {
        loop {
            let tok = self.scan()?;
            if tok.kind != TokenKind::Whitespace {
                return Ok(tok);
            }
        }
    }

    /// Skips empty and blank lines; returns the kind of the next significant
    /// token, which is left for the next `scan`.
    fn skip_blank_lines(&mut self) -> BioResult<TokenKind> {
        loop {
            let tok = self.scan_ignore_whitespace()?;
            if tok.kind != TokenKind::EndOfLine {
                let kind = tok.kind;
                self.unscan(tok);
                return Ok(kind);
            }
        }
    }

    fn number(&mut self, what: &str) -> BioResult<usize> {
        let tok = self.scan()?;
        if tok.kind != TokenKind::Numeric {
            return Err(BioError::phylip(
                tok.line,
                format!("expected {what}, found {}", tok.describe()),
            ));
        }
        tok.literal_lossy()
            .parse()
            .map_err(|_| BioError::phylip(tok.line, format!("{what} is too large")))
    }

    /// Appends the sequence data of one line to `seq`, up to and including the
    /// end of line. Returns the number of data tokens read.
    fn read_line_data(&mut self, seq: &mut Vec<u8>) -> BioResult<usize> {
        let mut words = 0;
        loop {
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::Identifier => {
                    if let Some(pos) = tok.literal.iter().position(|b| !b.is_ascii_graphic()) {
                        return Err(BioError::phylip(
                            tok.line,
                            format!(
                                "invalid byte 0x{:02x} in sequence data",
                                tok.literal[pos]
                            ),
                        ));
                    }
                    seq.extend_from_slice(&tok.literal);
                    words += 1;
                }
                TokenKind::Whitespace => {}
                TokenKind::EndOfLine | TokenKind::Eof => return Ok(words),
                TokenKind::Numeric => {
                    return Err(BioError::phylip(
                        tok.line,
                        format!("unexpected {} in sequence data", tok.describe()),
                    ));
                }
            }
        }
    }

    pub fn parse(mut self) -> BioResult<Alignment> {
        let first = self.scan()?;
        if first.kind != TokenKind::Whitespace {
            self.unscan(first);
        }
        let nb_seq = self.number("number of sequences")?;
        let tok = self.scan()?;
        if tok.kind != TokenKind::Whitespace {
            return Err(BioError::phylip(
                tok.line,
                format!("expected whitespace after sequence count, found {}", tok.describe()),
            ));
        }
        let seq_len = self.number("alignment length")?;
        let tok = self.scan_ignore_whitespace()?;
        let empty = nb_seq == 0 || seq_len == 0;
        match tok.kind {
            TokenKind::EndOfLine => {}
            TokenKind::Eof if empty => {}
            _ => {
                return Err(BioError::phylip(
                    tok.line,
                    format!("expected end of header line, found {}", tok.describe()),
                ))
            }
        }
        if empty {
            return Ok(Alignment::new(SeqAlphabet::Unknown));
        }

        // header counts are untrusted until the data backs them
        let mut names: Vec<Box<str>> = Vec::with_capacity(nb_seq.min(PREALLOC_LIMIT));
        let mut seqs: Vec<Vec<u8>> = Vec::with_capacity(nb_seq.min(PREALLOC_LIMIT));

        // first block: name, then data
        self.skip_blank_lines()?;
        for i in 0..nb_seq {
            let tok = self.scan_ignore_whitespace()?;
            match tok.kind {
                TokenKind::Identifier | TokenKind::Numeric => {}
                TokenKind::Eof => {
                    return Err(BioError::phylip(
                        tok.line,
                        format!("expected {nb_seq} sequences, found {i}"),
                    ))
                }
                _ => {
                    return Err(BioError::phylip(
                        tok.line,
                        format!("expected sequence name, found {}", tok.describe()),
                    ))
                }
            }
            names.push(tok.literal_lossy().into());
            let mut seq = Vec::with_capacity(seq_len.min(PREALLOC_LIMIT));
            self.read_line_data(&mut seq)?;
            seqs.push(seq);
        }

        // continuation blocks, no names
        loop {
            if self.skip_blank_lines()? == TokenKind::Eof {
                break;
            }
            let line = self
                .pending
                .as_ref()
                .map_or(self.scanner.line(), |tok| tok.line);
            if seqs[0].len() >= seq_len {
                return Err(BioError::phylip(
                    line,
                    format!("unexpected data after {seq_len} symbols"),
                ));
            }
            for (i, seq) in seqs.iter_mut().enumerate() {
                let tok = self.scan_ignore_whitespace()?;
                match tok.kind {
                    TokenKind::Eof => {
                        return Err(BioError::phylip(
                            tok.line,
                            format!("block ends after {i} of {nb_seq} sequences"),
                        ))
                    }
                    TokenKind::EndOfLine => {
                        return Err(BioError::phylip(
                            tok.line,
                            "expected sequence data, found an empty line",
                        ))
                    }
                    _ => self.unscan(tok),
                }
                self.read_line_data(seq)?;
            }
        }

        let line = self.scanner.line();
        for (name, seq) in names.iter().zip(&seqs) {
            if seq.len() != seq_len {
                return Err(BioError::phylip(
                    line,
                    format!(
                        "sequence '{name}' has {} symbols, expected {seq_len}",
                        seq.len()
                    ),
                ));
            }
        }

        let mut al = Alignment::new(detect_alphabet(&seqs[0]));
        for (name, seq) in names.into_iter().zip(seqs) {
            al.add_sequence(name, seq, None)?;
        }
        log::debug!(
            "phylip: {} sequences of length {} ({})",
            al.len(),
            al.length(),
            al.alphabet()
        );
        Ok(al)
    }
}

pub fn parse<R: BufRead>(reader: R) -> BioResult<Alignment> {
    Parser::new(reader).parse()
}

pub fn parse_bytes(data: &[u8]) -> BioResult<Alignment> {
    parse(Cursor::new(data))
}

pub fn read_phylip_from_path(path: impl AsRef<Path>) -> BioResult<Alignment> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}
