//! Entry points backed by the global codec cache.

use bytestream::{ByteReader, ByteSink, ByteSource, ByteWriter};
use shape::BinType;

use crate::cache::CodecCache;
use crate::error::{CodecError, CodecResult, FormatReason};
use crate::limits::CodecLimits;

/// Encodes `value` into a new buffer.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedType`] if no codec can be built for `T`,
/// or [`CodecError::InvalidValue`] if the value cannot be represented.
pub fn serialize<T: BinType>(value: &T) -> CodecResult<Vec<u8>> {
    let mut writer = ByteWriter::new();
    serialize_into(value, &mut writer)?;
    Ok(writer.finish())
}

/// Encodes `value` into `sink`.
///
/// Bytes already written stay written if encoding fails part way.
pub fn serialize_into<T: BinType>(value: &T, sink: &mut dyn ByteSink) -> CodecResult<()> {
    CodecCache::global().encode(value, sink)
}

/// Decodes a `T` from the start of `bytes`.
///
/// No length limits apply, so anything [`serialize`] produced decodes back.
/// Bytes after the value are ignored; see [`deserialize_exact`].
pub fn deserialize<T: BinType>(bytes: &[u8]) -> CodecResult<T> {
    deserialize_with_limits(bytes, &CodecLimits::unlimited())
}

/// Decodes a `T` from the start of `bytes`, rejecting lengths over `limits`.
pub fn deserialize_with_limits<T: BinType>(bytes: &[u8], limits: &CodecLimits) -> CodecResult<T> {
    let mut reader = ByteReader::new(bytes);
    deserialize_from(&mut reader, limits)
}

/// Decodes one `T` from `source`, consuming exactly its encoding.
pub fn deserialize_from<T: BinType>(
    source: &mut dyn ByteSource,
    limits: &CodecLimits,
) -> CodecResult<T> {
    CodecCache::global().decode(source, limits)
}

/// Decodes a `T` that must span all of `bytes`, without length limits.
///
/// # Errors
///
/// Returns [`FormatReason::TrailingBytes`] if input remains after the value.
pub fn deserialize_exact<T: BinType>(bytes: &[u8]) -> CodecResult<T> {
    let mut reader = ByteReader::new(bytes);
    let value = deserialize_from(&mut reader, &CodecLimits::unlimited())?;
    if !reader.is_empty() {
        return Err(CodecError::InvalidFormat {
            reason: FormatReason::TrailingBytes {
                remaining: reader.remaining(),
            },
        });
    }
    Ok(value)
}
