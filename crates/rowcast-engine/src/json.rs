//! Buffered JSON writer and the downstream byte sink.
//!
//! The writer appends UTF-8 JSON tokens to an internal `BytesMut` and never
//! allocates per value; the driver drains the buffer into a [`ByteSink`] at
//! flush points. Output is compact (no insignificant whitespace) and matches
//! standard JSON escaping, so the bytes are indistinguishable from a
//! serde_json-compact rendering of the same data.

use crate::error::WriterError;
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write as _;

const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;
const DEFAULT_DEPTH: usize = 8;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Escape `s` into `buf` without the surrounding quotes.
fn escape_into(buf: &mut BytesMut, s: &str) {
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if byte >= 0x20 && byte != b'"' && byte != b'\\' {
            continue;
        }
        if start < i {
            buf.extend_from_slice(&bytes[start..i]);
        }
        match byte {
            b'"' => buf.extend_from_slice(b"\\\""),
            b'\\' => buf.extend_from_slice(b"\\\\"),
            0x08 => buf.extend_from_slice(b"\\b"),
            0x0c => buf.extend_from_slice(b"\\f"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            other => {
                buf.extend_from_slice(b"\\u00");
                buf.put_u8(HEX_DIGITS[(other >> 4) as usize]);
                buf.put_u8(HEX_DIGITS[(other & 0x0f) as usize]);
            }
        }
        start = i + 1;
    }
    if start < bytes.len() {
        buf.extend_from_slice(&bytes[start..]);
    }
}

/// Pre-encode a property name as `"name":` bytes.
///
/// Plans store keys in this form so per-row emission is a plain byte copy
/// with no escaping work.
pub fn encode_key(name: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(name.len() + 3);
    buf.put_u8(b'"');
    escape_into(&mut buf, name);
    buf.extend_from_slice(b"\":");
    buf.freeze()
}

/// Streaming JSON token writer over an internal byte buffer.
pub struct JsonWriter {
    buf: BytesMut,
    /// Comma state per open container: `true` until the first item lands.
    first: Vec<bool>,
    /// Set after a key; suppresses the separator of the following value.
    after_key: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY, DEFAULT_DEPTH)
    }

    pub fn with_capacity(buffer: usize, depth: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(buffer),
            first: Vec::with_capacity(depth),
            after_key: false,
        }
    }

    fn sep(&mut self) {
        if self.after_key {
            self.after_key = false;
            return;
        }
        if let Some(first) = self.first.last_mut() {
            if *first {
                *first = false;
            } else {
                self.buf.put_u8(b',');
            }
        }
    }

    pub fn begin_array(&mut self) {
        self.sep();
        self.buf.put_u8(b'[');
        self.first.push(true);
    }

    pub fn end_array(&mut self) {
        self.first.pop();
        self.buf.put_u8(b']');
    }

    pub fn begin_object(&mut self) {
        self.sep();
        self.buf.put_u8(b'{');
        self.first.push(true);
    }

    pub fn end_object(&mut self) {
        self.first.pop();
        self.buf.put_u8(b'}');
    }

    /// Write a pre-encoded `"name":` key (see [`encode_key`]).
    pub fn key(&mut self, key: &Bytes) {
        self.sep();
        self.buf.extend_from_slice(key);
        self.after_key = true;
    }

    pub fn put_null(&mut self) {
        self.sep();
        self.buf.extend_from_slice(b"null");
    }

    pub fn put_bool(&mut self, value: bool) {
        self.sep();
        self.buf
            .extend_from_slice(if value { b"true" } else { b"false" });
    }

    pub fn put_i64(&mut self, value: i64) {
        self.sep();
        let _ = write!(self.buf, "{}", value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.sep();
        let _ = write!(self.buf, "{}", value);
    }

    /// Non-finite floats have no JSON number form and are written as null.
    pub fn put_f32(&mut self, value: f32) {
        if !value.is_finite() {
            self.put_null();
            return;
        }
        self.sep();
        let _ = write!(self.buf, "{}", value);
    }

    pub fn put_f64(&mut self, value: f64) {
        if !value.is_finite() {
            self.put_null();
            return;
        }
        self.sep();
        let _ = write!(self.buf, "{}", value);
    }

    /// Fixed-point decimal as a JSON number, trailing fraction zeros trimmed.
    pub fn put_decimal(&mut self, unscaled: i128, scale: i8) {
        self.sep();
        if scale <= 0 {
            let _ = write!(self.buf, "{}", unscaled);
            for _ in 0..(-scale) {
                self.buf.put_u8(b'0');
            }
            return;
        }
        let magnitude = unscaled.unsigned_abs();
        let divisor = 10u128.pow(scale as u32);
        let integer = magnitude / divisor;
        let mut fraction = magnitude % divisor;
        if unscaled < 0 && (integer != 0 || fraction != 0) {
            self.buf.put_u8(b'-');
        }
        let _ = write!(self.buf, "{}", integer);
        if fraction != 0 {
            let mut digits = scale as usize;
            while fraction % 10 == 0 {
                fraction /= 10;
                digits -= 1;
            }
            self.buf.put_u8(b'.');
            let _ = write!(self.buf, "{:0width$}", fraction, width = digits);
        }
    }

    /// ISO-8601 UTC string with microsecond precision.
    pub fn put_timestamp_micros(&mut self, micros: i64) {
        match chrono::DateTime::from_timestamp_micros(micros) {
            Some(dt) => {
                self.sep();
                self.buf.put_u8(b'"');
                let _ = write!(self.buf, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6fZ"));
                self.buf.put_u8(b'"');
            }
            // Out-of-range micros cannot be rendered as a timestamp.
            None => self.put_null(),
        }
    }

    pub fn put_uuid(&mut self, value: &uuid::Uuid) {
        self.sep();
        self.buf.put_u8(b'"');
        let _ = write!(self.buf, "{}", value);
        self.buf.put_u8(b'"');
    }

    pub fn put_str(&mut self, value: &str) {
        self.sep();
        self.buf.put_u8(b'"');
        escape_into(&mut self.buf, value);
        self.buf.put_u8(b'"');
    }

    pub fn put_char(&mut self, value: char) {
        let mut scratch = [0u8; 4];
        self.put_str(value.encode_utf8(&mut scratch));
    }

    /// Bytes currently buffered and not yet taken.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Drain the buffer for sending downstream.
    pub fn take(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Downstream consumer of the writer's buffered bytes.
///
/// `send` is a suspension point: it parks the stream until the transport
/// accepts the chunk, which is how client backpressure reaches the read
/// loop.
#[async_trait]
pub trait ByteSink: Send {
    async fn send(&mut self, chunk: Bytes) -> Result<(), WriterError>;
}

/// Sink collecting everything in memory; test suites and tooling only.
#[derive(Default)]
pub struct BufferSink {
    bytes: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[async_trait]
impl ByteSink for BufferSink {
    async fn send(&mut self, chunk: Bytes) -> Result<(), WriterError> {
        self.bytes.extend_from_slice(&chunk);
        Ok(())
    }
}
