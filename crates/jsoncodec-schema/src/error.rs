use thiserror::Error;

/// A malformed `.jsonrec` file, reported with file/line context (`spec.md`
/// §7's error-handling policy, generalized to the schema front end).
#[derive(Error, Debug, PartialEq)]
#[error("{path}:{line}: {source}")]
pub struct SchemaError {
    pub path: String,
    pub line: usize,
    #[source]
    pub source: SyntaxError,
}

#[derive(Error, Debug, PartialEq)]
pub enum SyntaxError {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("expected {expected}, found '{found}'")]
    Expected {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEndOfInput(&'static str),
    #[error("duplicate record name '{0}'")]
    DuplicateRecord(String),
    #[error("duplicate field name '{0}' in record '{1}'")]
    DuplicateField(String, String),
    #[error("unknown annotation '@{0}'")]
    UnknownAnnotation(String),
}
