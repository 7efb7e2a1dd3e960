//! Buffered JSON writer. See `spec.md` §3.2/§4.1.

use crate::error::WriterError;
use crate::float;
use crate::io::Sink;
use crate::utf8::{is_continuation_byte, utf8_seq_len};
use crate::value::{DynMap, DynValue};

/// Tuning constant for [`Writer`]'s internal buffer. `spec.md` §9 notes the
/// source vacillates between 4 KiB and 16 KiB; either is correct as long as
/// `BUF_CAP - SAFETY` leaves room for the worst-case scalar/escape growth.
pub const BUF_CAP: usize = 4096;

/// Headroom reserved below `BUF_CAP` so a single scalar write never
/// straddles a flush.
const SAFETY: usize = 64;

/// Worst-case expansion of one input byte when escaped (`\u00XX`).
const MAX_ESCAPE_GROWTH: usize = 6;

/// Maximum additional bytes a UTF-8 continuation sequence can extend a
/// string chunk by, when a chunk boundary would otherwise split it.
const UTF8_MAX: usize = 4;

/// A buffered, streaming JSON emitter over a byte [`Sink`].
///
/// The buffer is a fixed-capacity byte array (`buf`, length `BUF_CAP`) with
/// `pos` marking its valid prefix; `flush` drains `buf[..pos]` to the sink.
/// No method other than `flush` is guaranteed to have pushed bytes past the
/// buffer, matching `spec.md` §3.2/§4.1's contract.
pub struct Writer<S: Sink> {
    sink: S,
    buf: Vec<u8>,
    pos: usize,
}

impl<S: Sink> Writer<S> {
    /// Wraps `sink` in a new writer with an empty buffer.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buf: vec![0u8; BUF_CAP],
            pos: 0,
        }
    }

    /// Drains any buffered bytes into the sink. Must be called (directly or
    /// via a generated encoder's owning entry point) before the writer is
    /// dropped, or buffered output is lost.
    pub fn flush(&mut self) -> Result<(), WriterError<S::Error>> {
        if self.pos == 0 {
            return Ok(());
        }
        self.sink.write_all(&self.buf[..self.pos])?;
        self.pos = 0;
        Ok(())
    }

    /// Consumes the writer, flushing and returning the sink.
    pub fn into_inner(mut self) -> Result<S, WriterError<S::Error>> {
        self.flush()?;
        Ok(self.sink)
    }

    fn ensure_room(&mut self, n: usize) -> Result<(), WriterError<S::Error>> {
        if self.pos + n > BUF_CAP.saturating_sub(SAFETY) {
            self.flush()?;
        }
        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) {
        debug_assert!(self.pos + bytes.len() <= self.buf.len());
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Appends a single raw byte, flushing first if the buffer is nearly
    /// full.
    pub fn write_byte(&mut self, c: u8) -> Result<(), WriterError<S::Error>> {
        self.ensure_room(1)?;
        self.put(&[c]);
        Ok(())
    }

    fn write_raw_ascii(&mut self, bytes: &[u8]) -> Result<(), WriterError<S::Error>> {
        self.ensure_room(bytes.len())?;
        self.put(bytes);
        Ok(())
    }

    /// Emits `true`/`false`.
    pub fn write_bool(&mut self, v: bool) -> Result<(), WriterError<S::Error>> {
        self.write_raw_ascii(if v { b"true" } else { b"false" })
    }

    /// Emits `null`.
    pub fn write_null(&mut self) -> Result<(), WriterError<S::Error>> {
        self.write_raw_ascii(b"null")
    }

    /// Emits a base-10 `i32` literal.
    pub fn write_int(&mut self, v: i32) -> Result<(), WriterError<S::Error>> {
        self.write_int64(i64::from(v))
    }

    /// Emits a base-10 `i64` literal.
    pub fn write_int64(&mut self, v: i64) -> Result<(), WriterError<S::Error>> {
        let mut buf = itoa::Buffer::new();
        let s = buf.format(v);
        self.write_raw_ascii(s.as_bytes())
    }

    /// Emits a base-10 `u32` literal.
    pub fn write_uint(&mut self, v: u32) -> Result<(), WriterError<S::Error>> {
        self.write_uint64(u64::from(v))
    }

    /// Emits a base-10 `u64` literal.
    pub fn write_uint64(&mut self, v: u64) -> Result<(), WriterError<S::Error>> {
        let mut buf = itoa::Buffer::new();
        let s = buf.format(v);
        self.write_raw_ascii(s.as_bytes())
    }

    /// Emits a shortest-round-trip `f32` literal, or `null` if `v` is not
    /// finite (JSON has no NaN/Infinity literal).
    pub fn write_float32(&mut self, v: f32) -> Result<(), WriterError<S::Error>> {
        match float::format_f32(v) {
            Some(s) => self.write_raw_ascii(s.as_bytes()),
            None => self.write_null(),
        }
    }

    /// Emits a shortest-round-trip `f64` literal, or `null` if `v` is not
    /// finite.
    pub fn write_float64(&mut self, v: f64) -> Result<(), WriterError<S::Error>> {
        match float::format_f64(v) {
            Some(s) => self.write_raw_ascii(s.as_bytes()),
            None => self.write_null(),
        }
    }

    /// Emits `s` as a quoted, escaped JSON string. Infallible beyond sink
    /// errors, since a `&str` is valid UTF-8 by construction.
    pub fn write_str(&mut self, s: &str) -> Result<(), WriterError<S::Error>> {
        match self.write_string(s.as_bytes()) {
            Err(WriterError::InvalidUtf8) => unreachable!("&str is always valid utf-8"),
            other => other,
        }
    }

    /// Emits `s` (interpreted as UTF-8) as a quoted, escaped JSON string.
    /// Fails with [`WriterError::InvalidUtf8`] if `s` is not valid UTF-8.
    ///
    /// Input is walked in slices sized so that, even under worst-case
    /// escape growth (`MAX_ESCAPE_GROWTH`), the slice's escaped form still
    /// fits in the remaining buffer; a slice that would straddle a flush
    /// boundary is shrunk, and a slice boundary that would split a UTF-8
    /// continuation sequence is extended forward by up to `UTF8_MAX` bytes.
    pub fn write_string(&mut self, s: &[u8]) -> Result<(), WriterError<S::Error>> {
        self.write_byte(b'"')?;
        let mut i = 0;
        while i < s.len() {
            let avail = BUF_CAP.saturating_sub(SAFETY).saturating_sub(self.pos);
            let max_chunk = avail / MAX_ESCAPE_GROWTH;
            if max_chunk == 0 {
                self.flush()?;
                continue;
            }
            let mut end = (i + max_chunk).min(s.len());
            let mut extended = 0;
            while end < s.len() && is_continuation_byte(s[end]) && extended < UTF8_MAX {
                end += 1;
                extended += 1;
            }
            self.emit_escaped_slice(&s[i..end])?;
            i = end;
        }
        self.write_byte(b'"')?;
        Ok(())
    }

    fn emit_escaped_slice(&mut self, chunk: &[u8]) -> Result<(), WriterError<S::Error>> {
        std::str::from_utf8(chunk).map_err(|_| WriterError::InvalidUtf8)?;
        let mut i = 0;
        while i < chunk.len() {
            let b = chunk[i];
            if b < 0x80 {
                match b {
                    b'\\' => self.put(b"\\\\"),
                    b'"' => self.put(b"\\\""),
                    b'\n' => self.put(b"\\n"),
                    b'\r' => self.put(b"\\r"),
                    0x00..=0x1F | b'<' | b'>' => {
                        static HEX: &[u8; 16] = b"0123456789abcdef";
                        self.put(&[
                            b'\\',
                            b'u',
                            b'0',
                            b'0',
                            HEX[(b >> 4) as usize],
                            HEX[(b & 0x0F) as usize],
                        ]);
                    }
                    _ => self.put(&[b]),
                }
                i += 1;
            } else {
                let len = utf8_seq_len(b);
                self.put(&chunk[i..i + len]);
                i += len;
            }
        }
        Ok(())
    }

    /// Emits a dynamic JSON object from a key-sorted mapping. `spec.md`
    /// §4.1 leaves iteration order unspecified beyond "iteration order of
    /// `m`"; a `BTreeMap` naturally iterates in key order.
    pub fn write_map(&mut self, m: &DynMap) -> Result<(), WriterError<S::Error>> {
        self.write_byte(b'{')?;
        for (i, (k, v)) in m.iter().enumerate() {
            if i > 0 {
                self.write_byte(b',')?;
            }
            self.write_str(k)?;
            self.write_byte(b':')?;
            self.write_dyn_value(v)?;
        }
        self.write_byte(b'}')?;
        Ok(())
    }

    fn write_dyn_value(&mut self, v: &DynValue) -> Result<(), WriterError<S::Error>> {
        match v {
            DynValue::Null => self.write_null(),
            DynValue::Bool(b) => self.write_bool(*b),
            DynValue::F64(n) => self.write_float64(*n),
            DynValue::Str(s) => self.write_str(s),
            DynValue::Map(m) => self.write_map(m),
        }
    }
}
