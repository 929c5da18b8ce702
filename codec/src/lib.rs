//! Type-directed binary encoding and decoding for the bindata codec.
//!
//! This is the main codec crate that ties together bytestream and shape:
//! a type's description is compiled once into a [`CompiledCodec`], cached,
//! and reused for every later value of that type.
//!
//! # Features
//!
//! - Bit-exact leaf encodings for integers, floats, bools, chars and decimals
//! - Strings, byte blobs, sequences, tuples, optionals and records
//! - Process-wide or isolated codec caches
//! - Decode limits checked before allocation
//! - Layout descriptions with structural fingerprints
//!
//! # Example
//!
//! ```
//! let bytes = codec::serialize(&vec![1i32, 2, 3]).unwrap();
//! assert_eq!(bytes.len(), 17);
//! let back: Vec<i32> = codec::deserialize(&bytes).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```
//!
//! # Design Principles
//!
//! - **Compile once** - Type shape is derived on first use and never again.
//! - **No embedded schema** - The caller names the type on both ends.
//! - **Fail the same way** - Unsupported types are rejected on every attempt.
//! - **Deterministic** - Same inputs produce same outputs.

mod builder;
mod cache;
mod compiled;
mod error;
mod facade;
mod limits;

pub use cache::CodecCache;
pub use compiled::CompiledCodec;
pub use error::{
    CodecError, CodecResult, ConstructionReason, FormatReason, LimitKind, ValueReason,
};
pub use facade::{
    deserialize, deserialize_exact, deserialize_from, deserialize_with_limits, serialize,
    serialize_into,
};
pub use limits::CodecLimits;

pub use bytestream::{ByteReader, ByteSink, ByteSource, ByteWriter, Decimal, IoSink, IoSource};
pub use shape::{
    BinEnum, BinType, Layout, Member, MemberLayout, Record, TypeInfo, TypeKey, TypeRef,
    UnsupportedReason,
};
