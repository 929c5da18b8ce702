//! Adapters from `std::io` readers and writers.

use std::io::{self, Read, Write};

use crate::error::{StreamError, StreamResult};
use crate::reader::ByteSource;
use crate::writer::ByteSink;

/// A [`ByteSink`] over any [`Write`] implementation.
///
/// Bytes go straight to the writer; wrap it in a `BufWriter` for small writes.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
    written: u64,
}

impl<W: Write> IoSink<W> {
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Returns the number of bytes written through this sink.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// A [`ByteSource`] over any [`Read`] implementation.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    read: u64,
}

impl<R: Read> IoSource<R> {
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner, read: 0 }
    }

    /// Returns the number of bytes consumed from the reader.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.read
    }

    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_into(&mut self, out: &mut [u8]) -> StreamResult<()> {
        let mut filled = 0;
        while filled < out.len() {
            match self.inner.read(&mut out[filled..]) {
                Ok(0) => {
                    return Err(StreamError::EndOfStream {
                        requested: out.len(),
                        available: filled,
                    });
                }
                Ok(n) => {
                    filled += n;
                    self.read += n as u64;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
