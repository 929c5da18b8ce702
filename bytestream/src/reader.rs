//! Byte sources and the bounded slice reader.

use crate::error::{StreamError, StreamResult};

/// Origin of encoded bytes.
///
/// Object safe so compiled codecs can read through `&mut dyn ByteSource`.
pub trait ByteSource {
    /// Fills `out` completely or fails with [`StreamError::EndOfStream`].
    fn read_into(&mut self, out: &mut [u8]) -> StreamResult<()>;

    /// Reads a single byte.
    fn read_u8(&mut self) -> StreamResult<u8> {
        let mut byte = [0u8; 1];
        self.read_into(&mut byte)?;
        Ok(byte[0])
    }
}

/// A byte reader over a borrowed slice.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads `len` bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> StreamResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn ensure_bytes(&self, len: usize) -> StreamResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(StreamError::EndOfStream {
                requested: len,
                available,
            });
        }
        Ok(())
    }
}

impl ByteSource for ByteReader<'_> {
    fn read_into(&mut self, out: &mut [u8]) -> StreamResult<()> {
        let bytes = self.read_bytes(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    fn read_u8(&mut self) -> StreamResult<u8> {
        self.ensure_bytes(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(
            result,
            Err(StreamError::EndOfStream {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn read_bytes_advances() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn short_read_does_not_advance() {
        let mut reader = ByteReader::new(&[1, 2]);
        let err = reader.read_bytes(4).unwrap_err();
        assert_eq!(
            err,
            StreamError::EndOfStream {
                requested: 4,
                available: 2
            }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_into_through_trait_object() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        let source: &mut dyn ByteSource = &mut reader;
        let mut out = [0u8; 4];
        source.read_into(&mut out).unwrap();
        assert_eq!(u32::from_le_bytes(out), 0x1234_5678);
        assert!(reader.is_empty());
    }
}
