//! Error kinds for the streaming writer and scanner.
//!
//! Both error enums are generic over the downstream I/O error type so that
//! callers keep the original [`std::error::Error`] from their sink/source
//! instead of it being erased into a string.

use thiserror::Error;

/// Errors produced by [`crate::Writer`].
///
/// Per the coerce-or-zero philosophy of the scanner, the writer side has no
/// equivalent leniency: a [`WriterError`] always means either the input was
/// not valid UTF-8, or the downstream sink failed.
#[derive(Debug, Error)]
pub enum WriterError<E: std::error::Error + 'static> {
    /// `write_string`/`write_str` was given bytes that are not valid UTF-8.
    #[error("invalid utf-8 in writer input")]
    InvalidUtf8,
    /// The downstream sink returned an error while flushing.
    #[error("sink error: {0}")]
    Sink(#[from] E),
}

impl<E: std::error::Error + PartialEq + 'static> PartialEq for WriterError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidUtf8, Self::InvalidUtf8) => true,
            (Self::Sink(a), Self::Sink(b)) => a == b,
            _ => false,
        }
    }
}

/// Errors produced by [`crate::Scanner`].
///
/// Type-mismatch between a scalar token and a requested typed reader is
/// deliberately **not** represented here: the typed readers coerce to zero
/// per `spec.md` §4.2.4 rather than erroring.
#[derive(Debug, Error)]
pub enum ScanError<E: std::error::Error + 'static> {
    /// The source was exhausted while the scanner expected another token.
    #[error("end of input")]
    EndOfInput,
    /// A malformed token: bad escape, invalid `\u` digits, unterminated
    /// string, invalid number syntax, or an unrecognized literal.
    #[error("{reason} at character {position}")]
    Lex {
        reason: &'static str,
        position: usize,
    },
    /// A structural mismatch while decoding an object or array.
    #[error("expected {expected}, found {got} at character {position}")]
    UnexpectedToken {
        expected: &'static str,
        got: &'static str,
        position: usize,
    },
    /// The byte source produced a sequence that is not valid UTF-8.
    #[error("invalid utf-8 in input")]
    InvalidUtf8,
    /// The downstream source returned an error while refilling.
    #[error("source error: {0}")]
    Source(#[from] E),
}

impl<E: std::error::Error + PartialEq + 'static> PartialEq for ScanError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EndOfInput, Self::EndOfInput) | (Self::InvalidUtf8, Self::InvalidUtf8) => true,
            (
                Self::Lex {
                    reason: r1,
                    position: p1,
                },
                Self::Lex {
                    reason: r2,
                    position: p2,
                },
            ) => r1 == r2 && p1 == p2,
            (
                Self::UnexpectedToken {
                    expected: e1,
                    got: g1,
                    position: p1,
                },
                Self::UnexpectedToken {
                    expected: e2,
                    got: g2,
                    position: p2,
                },
            ) => e1 == e2 && g1 == g2 && p1 == p2,
            (Self::Source(a), Self::Source(b)) => a == b,
            _ => false,
        }
    }
}
