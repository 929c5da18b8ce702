//! Fixed-width little-endian leaf encodings.
//!
//! | kind | bytes | encoding |
//! |---|---|---|
//! | `i8` | 1 | `value + 128` stored as `u8` (excess-128, not two's complement) |
//! | `u8` | 1 | verbatim |
//! | `i16`..`u64` | 2/4/8 | two's complement or unsigned, little-endian |
//! | `f32`/`f64` | 4/8 | IEEE-754 little-endian |
//! | [`Decimal`] | 16 | `flags, hi, lo, mid` as little-endian `u32` words |
//! | `bool` | 1 | `0` or `1`; any other byte is rejected |
//! | `char` | 2 | one UTF-16 code unit, little-endian |
//!
//! The `i8` bias differs from the wider signed kinds. It is kept for
//! compatibility with existing encoded data.

use crate::decimal::Decimal;
use crate::error::{StreamError, StreamResult};
use crate::reader::ByteSource;
use crate::writer::ByteSink;

const I8_BIAS: u8 = 0x80;

/// Leaf value kinds with a fixed wire width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrimitiveKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    Char,
    Decimal,
}

impl PrimitiveKind {
    /// Number of bytes on the wire.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::I16 | Self::U16 | Self::Char => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::Decimal => 16,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Decimal => "decimal",
        }
    }
}

/// Integer kinds usable as an enum representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntegerKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntegerKind {
    #[must_use]
    pub const fn primitive(self) -> PrimitiveKind {
        match self {
            Self::I8 => PrimitiveKind::I8,
            Self::U8 => PrimitiveKind::U8,
            Self::I16 => PrimitiveKind::I16,
            Self::U16 => PrimitiveKind::U16,
            Self::I32 => PrimitiveKind::I32,
            Self::U32 => PrimitiveKind::U32,
            Self::I64 => PrimitiveKind::I64,
            Self::U64 => PrimitiveKind::U64,
        }
    }

    #[must_use]
    pub const fn size(self) -> usize {
        self.primitive().size()
    }
}

impl From<IntegerKind> for PrimitiveKind {
    fn from(kind: IntegerKind) -> Self {
        kind.primitive()
    }
}

/// A leaf value with a fixed-width encoding.
pub trait Primitive: Copy + 'static {
    const KIND: PrimitiveKind;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()>;

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self>;
}

fn read_le<const N: usize>(source: &mut dyn ByteSource) -> StreamResult<[u8; N]> {
    let mut bytes = [0u8; N];
    source.read_into(&mut bytes)?;
    Ok(bytes)
}

macro_rules! le_primitive {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$kind;

                fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
                    sink.write_bytes(&self.to_le_bytes())
                }

                fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
                    Ok(<$ty>::from_le_bytes(read_le(source)?))
                }
            }
        )+
    };
}

le_primitive! {
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Primitive for u8 {
    const KIND: PrimitiveKind = PrimitiveKind::U8;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
        sink.write_u8(self)
    }

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
        source.read_u8()
    }
}

impl Primitive for i8 {
    const KIND: PrimitiveKind = PrimitiveKind::I8;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
        sink.write_u8((self as u8).wrapping_add(I8_BIAS))
    }

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
        Ok(source.read_u8()?.wrapping_sub(I8_BIAS) as Self)
    }
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
        sink.write_u8(u8::from(self))
    }

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
        match source.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(StreamError::InvalidBool { value }),
        }
    }
}

impl Primitive for char {
    const KIND: PrimitiveKind = PrimitiveKind::Char;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
        let unit = u16::try_from(u32::from(self))
            .map_err(|_| StreamError::CharOutsideBmp { ch: self })?;
        unit.write_fixed(sink)
    }

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
        let unit = u16::read_fixed(source)?;
        Self::from_u32(u32::from(unit)).ok_or(StreamError::InvalidChar { unit })
    }
}

impl Primitive for Decimal {
    const KIND: PrimitiveKind = PrimitiveKind::Decimal;

    fn write_fixed(self, sink: &mut dyn ByteSink) -> StreamResult<()> {
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.to_words()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        sink.write_bytes(&bytes)
    }

    fn read_fixed(source: &mut dyn ByteSource) -> StreamResult<Self> {
        let bytes: [u8; 16] = read_le(source)?;
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Decimal::from_words(words)
    }
}

/// Writes the low bits of `bits` as an integer of the given kind.
///
/// Used for enum representations; `i8` gets the same excess-128 bias as a
/// plain `i8` value.
#[allow(clippy::cast_possible_truncation)]
pub fn write_integer_bits(kind: IntegerKind, bits: u64, sink: &mut dyn ByteSink) -> StreamResult<()> {
    match kind {
        IntegerKind::I8 => (bits as i8).write_fixed(sink),
        IntegerKind::U8 => (bits as u8).write_fixed(sink),
        IntegerKind::I16 => (bits as i16).write_fixed(sink),
        IntegerKind::U16 => (bits as u16).write_fixed(sink),
        IntegerKind::I32 => (bits as i32).write_fixed(sink),
        IntegerKind::U32 => (bits as u32).write_fixed(sink),
        IntegerKind::I64 => (bits as i64).write_fixed(sink),
        IntegerKind::U64 => bits.write_fixed(sink),
    }
}

/// Reads an integer of the given kind, sign- or zero-extended to 64 bits.
#[allow(clippy::cast_sign_loss)]
pub fn read_integer_bits(kind: IntegerKind, source: &mut dyn ByteSource) -> StreamResult<u64> {
    Ok(match kind {
        IntegerKind::I8 => i64::from(i8::read_fixed(source)?) as u64,
        IntegerKind::U8 => u64::from(u8::read_fixed(source)?),
        IntegerKind::I16 => i64::from(i16::read_fixed(source)?) as u64,
        IntegerKind::U16 => u64::from(u16::read_fixed(source)?),
        IntegerKind::I32 => i64::from(i32::read_fixed(source)?) as u64,
        IntegerKind::U32 => u64::from(u32::read_fixed(source)?),
        IntegerKind::I64 => i64::read_fixed(source)? as u64,
        IntegerKind::U64 => u64::read_fixed(source)?,
    })
}

/// Writes a 4-byte signed little-endian length or element count.
pub fn write_len(sink: &mut dyn ByteSink, len: usize) -> StreamResult<()> {
    let raw = i32::try_from(len).map_err(|_| StreamError::LengthOverflow { len })?;
    raw.write_fixed(sink)
}

/// Reads a 4-byte signed little-endian length, rejecting negative values.
pub fn read_len(source: &mut dyn ByteSource) -> StreamResult<usize> {
    let raw = i32::read_fixed(source)?;
    usize::try_from(raw).map_err(|_| StreamError::NegativeLength { raw })
}
