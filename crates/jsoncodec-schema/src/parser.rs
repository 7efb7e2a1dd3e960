//! Recursive-descent parser from `.jsonrec` source to the [`crate::model`]
//! tree. See `SPEC_FULL.md` §3.1 for the concrete grammar.

use std::collections::HashSet;

use crate::error::{SchemaError, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::model::{Field, File, Primitive, Record, Shape};

/// Parses a complete `.jsonrec` source string. `path` is used only to tag
/// error messages with the originating file.
pub fn parse_file(path: &str, src: &str) -> Result<File, SchemaError> {
    Parser {
        lexer: Lexer::new(src),
        path,
        peeked: None,
    }
    .parse_file()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    path: &'a str,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    fn err(&self, line: usize, source: SyntaxError) -> SchemaError {
        SchemaError {
            path: self.path.to_string(),
            line,
            source,
        }
    }

    fn next(&mut self) -> Result<Token, SchemaError> {
        if let Some(tok) = self.peeked.take() {
            return Ok(tok);
        }
        let line = self.lexer.line();
        self.lexer.next_token().map_err(|e| self.err(line, e))
    }

    fn peek(&mut self) -> Result<&Token, SchemaError> {
        if self.peeked.is_none() {
            let tok = self.next()?;
            self.peeked = Some(tok);
        }
        Ok(self.peeked.as_ref().expect("just filled"))
    }

    fn expect_ident(&mut self, what: &'static str) -> Result<String, SchemaError> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            other => Err(self.err(
                tok.line,
                SyntaxError::Expected {
                    expected: what,
                    found: describe(&other),
                },
            )),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<(), SchemaError> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(())
        } else {
            Err(self.err(
                tok.line,
                SyntaxError::Expected {
                    expected: what,
                    found: describe(&tok.kind),
                },
            ))
        }
    }

    fn parse_file(&mut self) -> Result<File, SchemaError> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        loop {
            let tok = self.peek()?.clone();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Ident(ref kw) if kw == "record" => {
                    self.next()?;
                    let record = self.parse_record()?;
                    if !seen.insert(record.name.clone()) {
                        return Err(self.err(
                            tok.line,
                            SyntaxError::DuplicateRecord(record.name.clone()),
                        ));
                    }
                    records.push(record);
                }
                other => {
                    return Err(self.err(
                        tok.line,
                        SyntaxError::Expected {
                            expected: "'record' or end of input",
                            found: describe(&other),
                        },
                    ))
                }
            }
        }
        Ok(File { records })
    }

    fn parse_record(&mut self) -> Result<Record, SchemaError> {
        let name = self.expect_ident("record name")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        loop {
            if matches!(self.peek()?.kind, TokenKind::RBrace) {
                self.next()?;
                break;
            }
            let field_line = self.peek()?.line;
            let field = self.parse_field()?;
            if !seen.insert(field.declared_name.clone()) {
                return Err(self.err(
                    field_line,
                    SyntaxError::DuplicateField(field.declared_name.clone(), name.clone()),
                ));
            }
            fields.push(field);
            match self.peek()?.kind {
                TokenKind::Comma => {
                    self.next()?;
                }
                TokenKind::RBrace => {
                    self.next()?;
                    break;
                }
                ref other => {
                    let line = self.peek()?.line;
                    return Err(self.err(
                        line,
                        SyntaxError::Expected {
                            expected: "',' or '}'",
                            found: describe(other),
                        },
                    ));
                }
            }
        }
        Ok(Record { name, fields })
    }

    fn parse_field(&mut self) -> Result<Field, SchemaError> {
        let declared_name = self.expect_ident("field name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let shape = self.parse_shape()?;
        let mut wire_key = declared_name.clone();
        let mut ignored = false;
        if matches!(self.peek()?.kind, TokenKind::At) {
            self.next()?;
            let tok = self.next()?;
            let annotation = match tok.kind {
                TokenKind::Ident(s) => s,
                other => {
                    return Err(self.err(
                        tok.line,
                        SyntaxError::Expected {
                            expected: "annotation name",
                            found: describe(&other),
                        },
                    ))
                }
            };
            if annotation != "key" {
                return Err(self.err(tok.line, SyntaxError::UnknownAnnotation(annotation)));
            }
            self.expect(TokenKind::LParen, "'('")?;
            let value_tok = self.next()?;
            let value = match value_tok.kind {
                TokenKind::Str(s) => s,
                other => {
                    return Err(self.err(
                        value_tok.line,
                        SyntaxError::Expected {
                            expected: "string literal",
                            found: describe(&other),
                        },
                    ))
                }
            };
            self.expect(TokenKind::RParen, "')'")?;
            ignored = value == "ignore";
            wire_key = value;
        }
        Ok(Field {
            declared_name,
            wire_key,
            shape,
            ignored,
        })
    }

    fn parse_shape(&mut self) -> Result<Shape, SchemaError> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::LBracket => {
                let elem = self.parse_shape()?;
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Shape::Array(Box::new(elem)))
            }
            TokenKind::Ident(name) => Ok(match Primitive::from_keyword(&name) {
                Some(p) => Shape::Primitive(p),
                None => Shape::Nested(name),
            }),
            other => Err(self.err(
                tok.line,
                SyntaxError::Expected {
                    expected: "a shape",
                    found: describe(&other),
                },
            )),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => s.clone(),
        TokenKind::Str(s) => format!("\"{s}\""),
        TokenKind::LBrace => "{".to_string(),
        TokenKind::RBrace => "}".to_string(),
        TokenKind::LBracket => "[".to_string(),
        TokenKind::RBracket => "]".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
        TokenKind::Colon => ":".to_string(),
        TokenKind::Comma => ",".to_string(),
        TokenKind::At => "@".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}
