//! Pull-based JSON scanner. See `spec.md` §3.3/§4.2.

use crate::error::ScanError;
use crate::io::Source;
use crate::token::{Token, TokenKind};
use crate::utf8::utf8_seq_len;
use crate::value::{DynMap, DynValue};

/// Size of the chunks `Scanner` reads from its [`Source`] on refill.
const READ_CHUNK: usize = 4096;

/// Once the unread prefix before `cursor` exceeds this many bytes (and is
/// more than half the buffer), it is compacted away. Mirrors the
/// drain-on-threshold compaction the teacher's own `Buffer` uses.
const COMPACT_THRESHOLD: usize = 4096;

/// A pull-based JSON tokenizer over a blocking byte [`Source`].
///
/// Holds at most one pushed-back decoded code point (`pushback_char`) and at
/// most one pushed-back token (`pushback_token`) at a time, per `spec.md`
/// §3.3's invariant.
pub struct Scanner<R: Source> {
    source: R,
    read_buf: Vec<u8>,
    cursor: usize,
    limit: usize,
    eof: bool,
    scratch: String,
    position: usize,
    pushback_char: Option<char>,
    pushback_token: Option<Token>,
}

impl<R: Source> Scanner<R> {
    /// Wraps `source` in a new scanner with empty internal buffers.
    pub fn new(source: R) -> Self {
        Self {
            source,
            read_buf: Vec::new(),
            cursor: 0,
            limit: 0,
            eof: false,
            scratch: String::new(),
            position: 0,
            pushback_char: None,
            pushback_token: None,
        }
    }

    /// The cumulative logical character position, for diagnostics. Treated
    /// as advisory: `unscan` decrements it by one as a simplification
    /// rather than truly rewinding (`spec.md` §4.2 "Pushback").
    pub fn position(&self) -> usize {
        self.position
    }

    // ---- byte-level I/O -------------------------------------------------

    fn ensure_byte(&mut self) -> Result<bool, ScanError<R::Error>> {
        if self.cursor < self.limit {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        if self.cursor > 0 && (self.cursor > COMPACT_THRESHOLD || self.cursor == self.limit) {
            self.read_buf.drain(..self.cursor);
            self.limit -= self.cursor;
            self.cursor = 0;
        }
        let start = self.limit;
        self.read_buf.resize(start + READ_CHUNK, 0);
        let n = self.source.read(&mut self.read_buf[start..start + READ_CHUNK])?;
        self.read_buf.truncate(start + n);
        self.limit = start + n;
        if n == 0 {
            self.eof = true;
        }
        Ok(n > 0)
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ScanError<R::Error>> {
        if !self.ensure_byte()? {
            return Ok(None);
        }
        let b = self.read_buf[self.cursor];
        self.cursor += 1;
        Ok(Some(b))
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, ScanError<R::Error>> {
        if !self.ensure_byte()? {
            return Ok(None);
        }
        Ok(Some(self.read_buf[self.cursor]))
    }

    /// Decodes and consumes the next UTF-8 code point from the byte source,
    /// advancing `position` by one character.
    fn next_char(&mut self) -> Result<Option<char>, ScanError<R::Error>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let ch = if lead < 0x80 {
            lead as char
        } else {
            let len = utf8_seq_len(lead);
            let mut bytes = [0u8; 4];
            bytes[0] = lead;
            for b in bytes.iter_mut().take(len).skip(1) {
                let cont = self.next_byte()?.ok_or(ScanError::InvalidUtf8)?;
                if cont & 0xC0 != 0x80 {
                    return Err(ScanError::InvalidUtf8);
                }
                *b = cont;
            }
            let s = std::str::from_utf8(&bytes[..len]).map_err(|_| ScanError::InvalidUtf8)?;
            s.chars().next().ok_or(ScanError::InvalidUtf8)?
        };
        self.position += 1;
        Ok(Some(ch))
    }

    fn peek_char(&mut self) -> Result<Option<char>, ScanError<R::Error>> {
        if let Some(c) = self.pushback_char {
            return Ok(Some(c));
        }
        match self.next_char()? {
            Some(c) => {
                self.pushback_char = Some(c);
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    fn consume_char(&mut self) -> Result<Option<char>, ScanError<R::Error>> {
        if let Some(c) = self.pushback_char.take() {
            return Ok(Some(c));
        }
        self.next_char()
    }

    // ---- tokenizing -------------------------------------------------

    /// Returns the next token, skipping insignificant whitespace first. If a
    /// token was pushed back via [`Self::unscan`], returns it unchanged and
    /// clears the slot. Fails with [`ScanError::EndOfInput`] at end of
    /// input.
    pub fn scan(&mut self) -> Result<Token, ScanError<R::Error>> {
        if let Some(tok) = self.pushback_token.take() {
            return Ok(tok);
        }
        loop {
            match self.peek_char()? {
                None => return Err(ScanError::EndOfInput),
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.consume_char()?;
                }
                Some(_) => break,
            }
        }
        let c = self.consume_char()?.expect("checked non-empty above");
        match c {
            '{' => Ok(Token::structural(TokenKind::LBrace)),
            '}' => Ok(Token::structural(TokenKind::RBrace)),
            '[' => Ok(Token::structural(TokenKind::LBracket)),
            ']' => Ok(Token::structural(TokenKind::RBracket)),
            ':' => Ok(Token::structural(TokenKind::Colon)),
            ',' => Ok(Token::structural(TokenKind::Comma)),
            '"' => self.lex_string(),
            't' => self.lex_literal("rue", TokenKind::True),
            'f' => self.lex_literal("alse", TokenKind::False),
            'n' => self.lex_literal("ull", TokenKind::Null),
            '-' | '0'..='9' => self.lex_number(c),
            _ => Err(ScanError::Lex {
                reason: "invalid character",
                position: self.position,
            }),
        }
    }

    /// Buffers `tok`; the next call to [`Self::scan`] returns it unchanged.
    /// Single-slot: calling this twice before a `scan` overwrites the first
    /// pushed-back token.
    pub fn unscan(&mut self, tok: Token) {
        self.position = self.position.saturating_sub(1);
        self.pushback_token = Some(tok);
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ScanError<R::Error>> {
        let tok = self.scan()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(ScanError::UnexpectedToken {
                expected: kind.name(),
                got: tok.kind.name(),
                position: self.position,
            })
        }
    }

    fn lex_literal(
        &mut self,
        rest: &'static str,
        kind: TokenKind,
    ) -> Result<Token, ScanError<R::Error>> {
        for expected in rest.chars() {
            match self.consume_char()? {
                Some(c) if c == expected => {}
                _ => {
                    return Err(ScanError::Lex {
                        reason: "invalid literal",
                        position: self.position,
                    })
                }
            }
        }
        Ok(Token::structural(kind))
    }

    fn lex_string(&mut self) -> Result<Token, ScanError<R::Error>> {
        self.scratch.clear();
        loop {
            let Some(c) = self.consume_char()? else {
                return Err(ScanError::Lex {
                    reason: "unterminated string",
                    position: self.position,
                });
            };
            match c {
                '"' => break,
                '\\' => self.lex_escape()?,
                _ => self.scratch.push(c),
            }
        }
        Ok(Token {
            kind: TokenKind::String,
            text: std::mem::take(&mut self.scratch),
        })
    }

    fn lex_escape(&mut self) -> Result<(), ScanError<R::Error>> {
        let Some(c) = self.consume_char()? else {
            return Err(ScanError::Lex {
                reason: "unterminated escape",
                position: self.position,
            });
        };
        match c {
            '"' => self.scratch.push('"'),
            '\\' => self.scratch.push('\\'),
            '/' => self.scratch.push('/'),
            'b' => self.scratch.push('\u{0008}'),
            'f' => self.scratch.push('\u{000C}'),
            'n' => self.scratch.push('\n'),
            'r' => self.scratch.push('\r'),
            't' => self.scratch.push('\t'),
            'u' => {
                let cp = self.lex_hex4()?;
                match char::from_u32(cp) {
                    Some(ch) => self.scratch.push(ch),
                    // Lone surrogate half: spec.md marks surrogate-pair
                    // handling out of scope. Rather than emit bytes that
                    // are not valid UTF-8 (surrogates are excluded from
                    // UTF-8 by definition), substitute the replacement
                    // character so scanner payloads stay valid `String`s.
                    None => self.scratch.push('\u{FFFD}'),
                }
            }
            _ => {
                return Err(ScanError::Lex {
                    reason: "invalid escape sequence",
                    position: self.position,
                })
            }
        }
        Ok(())
    }

    fn lex_hex4(&mut self) -> Result<u32, ScanError<R::Error>> {
        let mut cp = 0u32;
        for _ in 0..4 {
            let Some(c) = self.consume_char()? else {
                return Err(ScanError::Lex {
                    reason: "truncated unicode escape",
                    position: self.position,
                });
            };
            let digit = c.to_digit(16).ok_or(ScanError::Lex {
                reason: "invalid unicode escape digit",
                position: self.position,
            })?;
            cp = cp * 16 + digit;
        }
        Ok(cp)
    }

    fn lex_number(&mut self, first: char) -> Result<Token, ScanError<R::Error>> {
        self.scratch.clear();
        self.scratch.push(first);
        if first == '-' {
            match self.consume_char()? {
                Some(c @ '0'..='9') => self.scratch.push(c),
                _ => {
                    return Err(ScanError::Lex {
                        reason: "expected digit after '-'",
                        position: self.position,
                    })
                }
            }
        }
        self.copy_digits()?;
        if matches!(self.peek_char()?, Some('.')) {
            self.scratch.push(self.consume_char()?.expect("peeked"));
            let copied = self.copy_digits()?;
            if copied == 0 {
                return Err(ScanError::Lex {
                    reason: "expected digit after '.'",
                    position: self.position,
                });
            }
        }
        // Extension over the teacher's lexer: accept an optional exponent
        // suffix (`spec.md` §9's flagged numeric-exponent bug, redesigned
        // per the REDESIGN FLAG rather than preserved).
        if matches!(self.peek_char()?, Some('e' | 'E')) {
            self.scratch.push(self.consume_char()?.expect("peeked"));
            if matches!(self.peek_char()?, Some('+' | '-')) {
                self.scratch.push(self.consume_char()?.expect("peeked"));
            }
            let copied = self.copy_digits()?;
            if copied == 0 {
                return Err(ScanError::Lex {
                    reason: "expected digit in exponent",
                    position: self.position,
                });
            }
        }
        Ok(Token {
            kind: TokenKind::Number,
            text: std::mem::take(&mut self.scratch),
        })
    }

    fn copy_digits(&mut self) -> Result<usize, ScanError<R::Error>> {
        let mut n = 0;
        loop {
            match self.peek_char()? {
                Some(c @ '0'..='9') => {
                    self.consume_char()?;
                    self.scratch.push(c);
                    n += 1;
                }
                _ => break,
            }
        }
        Ok(n)
    }

    // ---- typed scalar readers (coerce-or-zero, spec.md §4.2.4) ----------

    /// Reads a string scalar, coercing any other scalar token to `""`.
    pub fn read_string(&mut self) -> Result<String, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::String => Ok(tok.text),
            _ if tok.kind.is_scalar() => Ok(String::new()),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    /// Reads an `i32`, coercing a non-numeric scalar to `0` and a malformed
    /// numeric literal to `0`.
    pub fn read_int(&mut self) -> Result<i32, ScanError<R::Error>> {
        Ok(self.read_int64()? as i32)
    }

    /// As [`Self::read_int`], for `i64`.
    pub fn read_int64(&mut self) -> Result<i64, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Number => Ok(tok.text.parse().unwrap_or(0)),
            _ if tok.kind.is_scalar() => Ok(0),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    /// As [`Self::read_int`], for `u32`.
    pub fn read_uint(&mut self) -> Result<u32, ScanError<R::Error>> {
        Ok(self.read_uint64()? as u32)
    }

    /// As [`Self::read_int`], for `u64`.
    pub fn read_uint64(&mut self) -> Result<u64, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Number => Ok(tok.text.parse().unwrap_or(0)),
            _ if tok.kind.is_scalar() => Ok(0),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    /// As [`Self::read_int`], for `f32`.
    pub fn read_float32(&mut self) -> Result<f32, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Number => Ok(tok.text.parse().unwrap_or(0.0)),
            _ if tok.kind.is_scalar() => Ok(0.0),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    /// As [`Self::read_int`], for `f64`.
    pub fn read_float64(&mut self) -> Result<f64, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Number => Ok(tok.text.parse().unwrap_or(0.0)),
            _ if tok.kind.is_scalar() => Ok(0.0),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    /// Reads a `bool`, coercing `NULL`/`FALSE`/any non-boolean scalar to
    /// `false`.
    pub fn read_bool(&mut self) -> Result<bool, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::True => Ok(true),
            _ if tok.kind.is_scalar() => Ok(false),
            other => Err(unexpected_scalar(other, self.position)),
        }
    }

    // ---- dynamic object decode (spec.md §4.2.5) --------------------------

    /// Reads a JSON object into a dynamic mapping, or `None` for `null`.
    /// Array-valued entries are not supported in this version and produce
    /// [`ScanError::UnexpectedToken`], per `spec.md` §4.2.5.
    pub fn read_map(&mut self) -> Result<Option<DynMap>, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Null => Ok(None),
            TokenKind::LBrace => {
                self.unscan(tok);
                Ok(Some(self.read_map_body()?))
            }
            other => Err(ScanError::UnexpectedToken {
                expected: "'{' or null",
                got: other.name(),
                position: self.position,
            }),
        }
    }

    fn read_map_body(&mut self) -> Result<DynMap, ScanError<R::Error>> {
        let mut out = DynMap::new();
        self.decode_object(|s, key| {
            let value = s.read_dyn_value()?;
            out.insert(key.to_string(), value);
            Ok(())
        })?;
        Ok(out)
    }

    /// Drives a generated record decoder's field dispatch: expects `{`,
    /// then for each `"key": value` pair calls `visit_field(self, key)` with
    /// the colon already consumed and the value not yet consumed —
    /// `visit_field` must consume exactly one value, via a typed read, a
    /// nested `decode`, or [`Self::skip_value`] for an unrecognized key.
    /// Generated decoders use this directly rather than duplicating the
    /// object-framing loop per record, per `spec.md` §4.3's "field-by-field
    /// dispatch keyed on the JSON field name".
    pub fn decode_object(
        &mut self,
        mut visit_field: impl FnMut(&mut Self, &str) -> Result<(), ScanError<R::Error>>,
    ) -> Result<(), ScanError<R::Error>> {
        self.expect(TokenKind::LBrace)?;
        let mut index = 0usize;
        loop {
            let tok = self.scan()?;
            let key = match tok.kind {
                TokenKind::RBrace => break,
                TokenKind::Comma if index > 0 => {
                    let key_tok = self.expect(TokenKind::String)?;
                    key_tok.text
                }
                TokenKind::String if index == 0 => tok.text,
                other => {
                    return Err(ScanError::UnexpectedToken {
                        expected: "key, ',' or '}'",
                        got: other.name(),
                        position: self.position,
                    })
                }
            };
            self.expect(TokenKind::Colon)?;
            visit_field(self, &key)?;
            index += 1;
        }
        Ok(())
    }

    fn read_dyn_value(&mut self) -> Result<DynValue, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::String => Ok(DynValue::Str(tok.text)),
            TokenKind::Number => Ok(DynValue::F64(tok.text.parse().unwrap_or(0.0))),
            TokenKind::True => Ok(DynValue::Bool(true)),
            TokenKind::False => Ok(DynValue::Bool(false)),
            TokenKind::Null => Ok(DynValue::Null),
            TokenKind::LBrace => {
                self.unscan(tok);
                Ok(DynValue::Map(self.read_map_body()?))
            }
            other => Err(ScanError::UnexpectedToken {
                expected: "scalar or object",
                got: other.name(),
                position: self.position,
            }),
        }
    }

    // ---- shared helpers for generated decoders --------------------------

    /// Reads and discards one complete JSON value (scalar, object, or
    /// array), tracking structural depth so the stream stays aligned.
    /// Generated decoders call this to skip unknown object keys, per
    /// `spec.md` §4.3 ("Unknown keys MUST be tolerated").
    pub fn skip_value(&mut self) -> Result<(), ScanError<R::Error>> {
        let tok = self.scan()?;
        self.skip_value_from(tok)
    }

    fn skip_value_from(&mut self, tok: Token) -> Result<(), ScanError<R::Error>> {
        match tok.kind {
            _ if tok.kind.is_scalar() => Ok(()),
            TokenKind::LBrace => {
                self.unscan(tok);
                self.skip_object()
            }
            TokenKind::LBracket => self.skip_array(),
            other => Err(ScanError::UnexpectedToken {
                expected: "value",
                got: other.name(),
                position: self.position,
            }),
        }
    }

    fn skip_object(&mut self) -> Result<(), ScanError<R::Error>> {
        self.decode_object(|s, _key| s.skip_value())
    }

    fn skip_array(&mut self) -> Result<(), ScanError<R::Error>> {
        let mut index = 0usize;
        loop {
            let tok = self.scan()?;
            if tok.kind == TokenKind::RBracket {
                return Ok(());
            }
            if index > 0 {
                if tok.kind != TokenKind::Comma {
                    return Err(ScanError::UnexpectedToken {
                        expected: "',' or ']'",
                        got: tok.kind.name(),
                        position: self.position,
                    });
                }
                let v = self.scan()?;
                self.skip_value_from(v)?;
            } else {
                self.skip_value_from(tok)?;
            }
            index += 1;
        }
    }

    /// Decodes an `Option<Box<Nested>>` field: `null` yields `None`,
    /// otherwise `decode_fn` runs against the still-unconsumed value.
    /// Mirrors [`Self::read_map`]'s null-vs-object disambiguation (scan one
    /// token, `unscan` it back if it wasn't `null`) so a missing key and an
    /// explicit JSON `null` collapse to the same `None`, per `SPEC_FULL.md`
    /// §4.3.
    pub fn decode_nested<T>(
        &mut self,
        decode_fn: impl FnOnce(&mut Self) -> Result<T, ScanError<R::Error>>,
    ) -> Result<Option<T>, ScanError<R::Error>> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Null => Ok(None),
            _ => {
                self.unscan(tok);
                Ok(Some(decode_fn(self)?))
            }
        }
    }

    /// Decodes a JSON array whose elements are each decoded by
    /// `decode_elem`. Shared by every generated record's `decode_array`
    /// (`spec.md` §4.3), since the structural logic is identical across
    /// element shapes and only the per-element decode differs. Peeks one
    /// token via [`Self::unscan`] to disambiguate an empty array from the
    /// first element, per `spec.md` §9 ("arrays peek one token").
    pub fn decode_array<T>(
        &mut self,
        mut decode_elem: impl FnMut(&mut Self) -> Result<T, ScanError<R::Error>>,
    ) -> Result<Vec<T>, ScanError<R::Error>> {
        self.expect(TokenKind::LBracket)?;
        let mut out = Vec::new();
        let first = self.scan()?;
        if first.kind == TokenKind::RBracket {
            return Ok(out);
        }
        self.unscan(first);
        loop {
            out.push(decode_elem(self)?);
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::RBracket => break,
                TokenKind::Comma => continue,
                other => {
                    return Err(ScanError::UnexpectedToken {
                        expected: "',' or ']'",
                        got: other.name(),
                        position: self.position,
                    })
                }
            }
        }
        Ok(out)
    }
}

fn unexpected_scalar<E: std::error::Error + 'static>(
    got: TokenKind,
    position: usize,
) -> ScanError<E> {
    ScanError::UnexpectedToken {
        expected: "scalar",
        got: got.name(),
        position,
    }
}
