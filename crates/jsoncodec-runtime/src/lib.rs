//! Streaming JSON writer and scanner underlying `jsoncodec`-generated
//! encoders and decoders.
//!
//! This crate is the run-time half of the system: it has no notion of
//! record types or schemas. [`jsoncodec_gen`](https://docs.rs/jsoncodec-gen)
//! emits, per record, an encoder and decoder that drive [`Writer`] and
//! [`Scanner`] with field-by-field dispatch keyed on the JSON field name.
//!
//! Neither [`Writer`] nor [`Scanner`] is safe for concurrent use from
//! multiple threads; independent instances on independent sinks/sources may
//! run in parallel without coordination.

mod error;
mod float;
mod io;
mod scanner;
mod token;
mod utf8;
mod value;
mod writer;

pub use error::{ScanError, WriterError};
pub use io::{Sink, Source};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
pub use value::{DynMap, DynValue};
pub use writer::{Writer, BUF_CAP};
