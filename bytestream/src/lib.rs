//! Byte-level primitives for the bindata codec.
//!
//! This crate provides the [`ByteSink`] and [`ByteSource`] seams that compiled
//! codecs write to and read from, an in-memory [`ByteWriter`] / [`ByteReader`]
//! pair, `std::io` adapters, and the fixed-width encodings of every leaf kind.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No type knowledge** - This crate knows nothing about records, sequences, or presence.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter, Primitive};
//!
//! let mut writer = ByteWriter::new();
//! 5i8.write_fixed(&mut writer).unwrap();
//! 0x0102u16.write_fixed(&mut writer).unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0x85, 0x02, 0x01]);
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(i8::read_fixed(&mut reader).unwrap(), 5);
//! assert_eq!(u16::read_fixed(&mut reader).unwrap(), 0x0102);
//! ```

mod decimal;
mod error;
mod io;
mod primitive;
mod reader;
mod writer;

pub use decimal::Decimal;
pub use error::{StreamError, StreamResult};
pub use io::{IoSink, IoSource};
pub use primitive::{
    read_integer_bits, read_len, write_integer_bits, write_len, IntegerKind, Primitive,
    PrimitiveKind,
};
pub use reader::{ByteReader, ByteSource};
pub use writer::{ByteSink, ByteWriter};
