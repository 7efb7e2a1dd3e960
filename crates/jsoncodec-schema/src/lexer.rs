//! Hand-written lexer for `.jsonrec` source. Whitespace and `//` line
//! comments are insignificant, per `SPEC_FULL.md` §3.1.

use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    At,
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub(crate) struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            src,
            line: 1,
        }
    }

    /// The current line, for tagging an error returned from `next_token`.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    fn skip_insignificant(&mut self) {
        loop {
            match self.chars.peek().copied() {
                Some((_, '\n')) => {
                    self.line += 1;
                    self.chars.next();
                }
                Some((_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some((_, '/')) => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some((_, '/'))) {
                        while !matches!(self.chars.peek(), Some((_, '\n')) | None) {
                            self.chars.next();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_insignificant();
        let line = self.line;
        let Some((start, c)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
            });
        };
        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '@' => TokenKind::At,
            '"' => TokenKind::Str(self.lex_string()?),
            c if c == '_' || c.is_alphabetic() => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, c2)) = self.chars.peek() {
                    if c2 == '_' || c2.is_alphanumeric() {
                        self.chars.next();
                        end = i + c2.len_utf8();
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(self.src[start..end].to_string())
            }
            other => return Err(SyntaxError::UnexpectedCharacter(other)),
        };
        Ok(Token { kind, line })
    }

    fn lex_string(&mut self) -> Result<String, SyntaxError> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(out),
                Some((_, '\n')) => return Err(SyntaxError::UnterminatedString),
                Some((_, c)) => out.push(c),
                None => return Err(SyntaxError::UnterminatedString),
            }
        }
    }
}
