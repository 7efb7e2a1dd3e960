//! `File`/`Record`/`Field`/`Shape` schema model, plus a parser for the
//! `.jsonrec` textual surface that gives that model a concrete source
//! format. [`jsoncodec_gen`](https://docs.rs/jsoncodec-gen) consumes
//! [`File`] values produced by [`parse_file`] (or built directly) and turns
//! them into generated encoder/decoder source.

mod error;
mod lexer;
mod model;
mod parser;

pub use error::{SchemaError, SyntaxError};
pub use model::{Field, File, Primitive, Record, Shape};
pub use parser::parse_file;
