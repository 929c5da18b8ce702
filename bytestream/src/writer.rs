//! Byte sinks and the growable in-memory writer.

use crate::error::StreamResult;

/// Destination for encoded bytes.
///
/// Object safe so compiled codecs can write through `&mut dyn ByteSink`
/// regardless of where the bytes end up.
pub trait ByteSink {
    /// Appends `bytes` verbatim.
    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()>;

    /// Appends a single byte.
    fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        self.write_bytes(&[value])
    }
}

/// A growable in-memory byte writer.
///
/// Writes never fail. Call [`finish`](Self::finish) to take the buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteSink for ByteWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        self.bytes.push(value);
        Ok(())
    }
}
