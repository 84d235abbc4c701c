use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::trace;

use super::JsonFramer;
use crate::{Result, codec};

/// Incremental decoder: framer plus typed decode of each framed object.
///
/// A decode failure poisons the decoder. The error is returned once and every
/// later call yields `None`, even if further complete objects are buffered.
#[derive(Debug)]
pub struct ObjectDecoder<T> {
    framer: JsonFramer,
    failed: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for ObjectDecoder<T> {
    fn default() -> Self {
        Self {
            framer: JsonFramer::new(),
            failed: false,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ObjectDecoder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly arrived bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        if !self.failed {
            self.framer.push(chunk);
        }
    }

    /// Decode the next complete object, if one is available.
    pub fn next_value(&mut self) -> Option<Result<T>> {
        if self.failed {
            return None;
        }
        let span = self.framer.next_object()?;
        trace!(len = span.len(), "framed object");
        let decoded = codec::decode(&span);
        self.failed = decoded.is_err();
        Some(decoded)
    }

    /// Whether a decode error has already been returned.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Validate the unconsumed remainder at end of stream.
    pub fn finish(&self) -> Result<()> {
        self.framer.finish()
    }

    /// Bytes buffered but not yet framed.
    pub fn remaining(&self) -> &[u8] {
        self.framer.remaining()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::OllamaKitError;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Fragment {
        n: u32,
    }

    #[test]
    fn decodes_in_order() {
        let mut decoder = ObjectDecoder::<Fragment>::new();
        decoder.push(br#"{"n":1}{"n":2}{"n""#);
        assert_eq!(decoder.next_value().unwrap().unwrap(), Fragment { n: 1 });
        assert_eq!(decoder.next_value().unwrap().unwrap(), Fragment { n: 2 });
        assert!(decoder.next_value().is_none());
        decoder.push(br#":3}"#);
        assert_eq!(decoder.next_value().unwrap().unwrap(), Fragment { n: 3 });
    }

    #[test]
    fn decode_error_poisons_decoder() {
        let mut decoder = ObjectDecoder::<Fragment>::new();
        decoder.push(br#"{"n":"one"}{"n":2}"#);
        assert!(matches!(
            decoder.next_value(),
            Some(Err(OllamaKitError::Decode(_)))
        ));
        assert!(decoder.is_failed());
        assert!(decoder.next_value().is_none());
    }
}
