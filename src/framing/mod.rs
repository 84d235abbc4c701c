//! Framing of back-to-back JSON objects.
//!
//! Streaming endpoints write one JSON object per fragment with no delimiter,
//! no length prefix and no enclosing array:
//!
//! ```text
//! {"response":"Hi","done":false}{"response":"!","done":true}
//! ```
//!
//! The scanner here tracks string literals and escapes so that braces inside
//! strings never move the nesting depth, and splits a growing buffer into
//! whole top-level objects as soon as each one closes.

mod decoder;

pub use decoder::ObjectDecoder;

use bytes::{Bytes, BytesMut};

use crate::{OllamaKitError, Result};

/// Literal-aware brace scanner.
///
/// `position` is the next byte to inspect; `start` is where the current
/// top-level object opened.
#[derive(Debug, Default, Clone)]
struct Scanner {
    escaped: bool,
    in_string: bool,
    depth: usize,
    start: usize,
    position: usize,
}

impl Scanner {
    /// Continue scanning `buf` from the saved position.
    ///
    /// Returns the `(start, end)` byte range (end inclusive) of the first
    /// top-level object that closes, or `None` after consuming all of `buf`.
    fn scan(&mut self, buf: &[u8]) -> Option<(usize, usize)> {
        while self.position < buf.len() {
            let index = self.position;
            self.position += 1;
            let byte = buf[index];

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => self.in_string = true,
                b'{' => {
                    if self.depth == 0 {
                        self.start = index;
                    }
                    self.depth += 1;
                }
                // a '}' with no open object is stray leading data
                b'}' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Some((self.start, index));
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Extract the next complete top-level JSON object from `buffer`.
///
/// On success the object's bytes are returned and removed from the front of
/// the buffer together with anything that preceded its opening brace. When no
/// object has closed yet the buffer is left untouched and `None` is returned;
/// append more bytes and call again.
///
/// ```rust
/// use bytes::BytesMut;
/// use ollama_kit::framing::extract_next_object;
///
/// let mut buf = BytesMut::from(&br#"{"a":1}{"b":"#[..]);
/// assert_eq!(extract_next_object(&mut buf).unwrap(), &br#"{"a":1}"#[..]);
/// assert_eq!(&buf[..], br#"{"b":"#);
/// assert!(extract_next_object(&mut buf).is_none());
/// ```
pub fn extract_next_object(buffer: &mut BytesMut) -> Option<Bytes> {
    let (start, end) = Scanner::default().scan(buffer)?;
    Some(split_object(buffer, start, end))
}

fn split_object(buffer: &mut BytesMut, start: usize, end: usize) -> Bytes {
    let mut prefix = buffer.split_to(end + 1);
    prefix.split_off(start).freeze()
}

/// Stateful framer over an append-only buffer.
///
/// Equivalent to calling [`extract_next_object`] after every append, but the
/// scanner resumes where it stopped instead of rescanning the partial object
/// from byte zero each time.
#[derive(Debug, Default)]
pub struct JsonFramer {
    buffer: BytesMut,
    scanner: Scanner,
}

impl JsonFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly arrived bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Take the next complete object, if one has closed.
    pub fn next_object(&mut self) -> Option<Bytes> {
        let (start, end) = self.scanner.scan(&self.buffer)?;
        self.scanner = Scanner::default();
        Some(split_object(&mut self.buffer, start, end))
    }

    /// Bytes buffered but not yet framed.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer
    }

    /// Check the buffer at end of stream.
    ///
    /// Trailing whitespace is ignored; anything else means the stream ended
    /// in the middle of an object (or with garbage) and is a framing error.
    pub fn finish(&self) -> Result<()> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            Ok(())
        } else {
            Err(OllamaKitError::Framing {
                remaining: self.buffer.len(),
            })
        }
    }
}
