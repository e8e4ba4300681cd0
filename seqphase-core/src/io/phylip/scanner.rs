use crate::error::BioResult;
use std::io::BufRead;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of ASCII digits.
    Numeric,
    /// Any other run of non-blank bytes, control characters included.
    Identifier,
    /// Run of spaces and tabs.
    Whitespace,
    /// `\n`, `\r\n` or a lone `\r`.
    EndOfLine,
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Vec<u8>,
    /// 1-based line the token starts on.
    pub line: usize,
}

impl Token {
    pub fn literal_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.literal)
    }

    /// Short description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Numeric => format!("number '{}'", self.literal_lossy()),
            TokenKind::Identifier => format!("'{}'", self.literal_lossy()),
            TokenKind::Whitespace => "whitespace".to_string(),
            TokenKind::EndOfLine => "end of line".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[inline]
fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
fn is_word(b: u8) -> bool {
    !matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Lexer over a buffered byte stream. Returns [`TokenKind::Eof`] forever once
/// the input is exhausted.
pub struct Scanner<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 1 }
    }

    /// Line the next token starts on.
    pub fn line(&self) -> usize {
        self.line
    }

    fn peek(&mut self) -> BioResult<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    fn read_run(&mut self, literal: &mut Vec<u8>, pred: fn(u8) -> bool) -> BioResult<()> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            let n = buf.iter().position(|&b| !pred(b)).unwrap_or(buf.len());
            let exhausted = n == buf.len();
            literal.extend_from_slice(&buf[..n]);
            self.reader.consume(n);
            if !exhausted {
                return Ok(());
            }
        }
    }

    pub fn scan(&mut self) -> BioResult<Token> {
        let line = self.line;
        let token = |kind, literal| Token {
            kind,
            literal,
            line,
        };

        let Some(b) = self.peek()? else {
            return Ok(token(TokenKind::Eof, Vec::new()));
        };

        match b {
            b'\n' => {
                self.reader.consume(1);
                self.line += 1;
                Ok(token(TokenKind::EndOfLine, b"\n".to_vec()))
            }
            b'\r' => {
                self.reader.consume(1);
                self.line += 1;
                if self.peek()? == Some(b'\n') {
                    self.reader.consume(1);
                    return Ok(token(TokenKind::EndOfLine, b"\r\n".to_vec()));
                }
                Ok(token(TokenKind::EndOfLine, b"\r".to_vec()))
            }
            b if is_blank(b) => {
                let mut literal = Vec::new();
                self.read_run(&mut literal, is_blank)?;
                Ok(token(TokenKind::Whitespace, literal))
            }
            _ => {
                let mut literal = Vec::new();
                self.read_run(&mut literal, is_word)?;
                let kind = if literal.iter().all(u8::is_ascii_digit) {
                    TokenKind::Numeric
                } else {
                    TokenKind::Identifier
                };
                Ok(token(kind, literal))
            }
        }
    }
}
