//! Byte sink/source abstractions the writer and scanner are generic over.
//!
//! Blanket impls over [`std::io::Write`]/[`std::io::Read`] mean any file,
//! socket, or `Vec<u8>` works out of the box; the trait indirection exists so
//! the error type isn't forced to be [`std::io::Error`] for in-memory or
//! test sinks/sources that can't fail.

use std::io;

/// A blocking byte sink. See `spec.md` §3.2 (`sink`).
pub trait Sink {
    /// The error type this sink can fail with.
    type Error: std::error::Error + 'static;

    /// Writes the entirety of `buf`, blocking until done.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

impl<W: io::Write> Sink for W {
    type Error = io::Error;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        io::Write::write_all(self, buf)
    }
}

/// A blocking byte source. See `spec.md` §3.3 (`source`).
pub trait Source {
    /// The error type this source can fail with.
    type Error: std::error::Error + 'static;

    /// Reads at least one byte into `buf`, returning the number read, or
    /// `Ok(0)` at end of input.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: io::Read> Source for R {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        io::Read::read(self, buf)
    }
}
