//! Recursive construction of compiled codecs.
//!
//! Building is a pure function of the type: each step receives the chain of
//! types currently being built and returns its codec together with every
//! codec it had to compile on the way. The cache publishes those afterwards.

use std::any::Any;
use std::sync::Arc;

use bytestream::{
    read_integer_bits, read_len, write_integer_bits, write_len, ByteSink, ByteSource, Decimal,
    Primitive, PrimitiveKind, StreamError,
};
use shape::{
    classify, EnumInfo, Layout, MemberAccess, MemberLayout, MemberList, OptionalInfo, RecordInfo,
    SequenceInfo, Shape, TupleInfo, TypeInfo, TypeKey, TypeRef, UnsupportedReason,
};
use tracing::trace;

use crate::cache::CodecCache;
use crate::compiled::{decoder, encoder, CompiledCodec, Plan};
use crate::error::{
    CodecError, CodecResult, ConstructionReason, FormatReason, LimitKind, ValueReason,
};
use crate::limits::CodecLimits;

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

/// Most elements or bytes reserved before any of them are decoded.
const PREALLOC_LIMIT: usize = 4096;

const READ_CHUNK: usize = 8192;

type EmptyFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// A built codec plus every codec compiled while building it, root last.
#[derive(Debug)]
pub(crate) struct Built {
    pub(crate) codec: Arc<CompiledCodec>,
    pub(crate) fresh: Vec<Arc<CompiledCodec>>,
}

/// The types currently under construction, outermost first.
#[derive(Debug, Clone, Default)]
struct BuildPath(Vec<TypeKey>);

impl BuildPath {
    fn contains(&self, key: TypeKey) -> bool {
        self.0.contains(&key)
    }

    fn extended(&self, key: TypeKey) -> Self {
        let mut chain = self.0.clone();
        chain.push(key);
        Self(chain)
    }
}

pub(crate) fn build(cache: &CodecCache, info: &TypeInfo) -> CodecResult<Built> {
    build_at(cache, info, BuildPath::default())
}

fn build_at(cache: &CodecCache, info: &TypeInfo, path: BuildPath) -> CodecResult<Built> {
    let key = info.key();
    let type_name = info.type_name();
    if path.contains(key) {
        return Err(CodecError::UnsupportedType {
            type_name,
            reason: UnsupportedReason::RecursiveType,
        });
    }
    let path = path.extended(key);

    let shape = classify(info)?;
    trace!(type_name, shape = shape.name(), "building codec");

    let mut fresh = Vec::new();
    let (layout, plan, payload) = match &shape {
        Shape::Primitive(kind) => (
            Layout::Primitive { kind: *kind },
            primitive_plan(*kind, type_name),
            None,
        ),
        Shape::Enum(info) => (
            Layout::Enum {
                name: type_name,
                repr: info.repr(),
            },
            enum_plan(*info, type_name),
            None,
        ),
        Shape::String => wrapped(
            Layout::String,
            string_payload(type_name),
            Some(Arc::new(|| boxed(String::new()))),
            type_name,
        ),
        Shape::ByteBlob => wrapped(
            Layout::ByteBlob,
            blob_payload(type_name),
            Some(Arc::new(|| boxed(Vec::<u8>::new()))),
            type_name,
        ),
        Shape::Tuple(tuple) => {
            let mut elements = Vec::with_capacity(tuple.elements().len());
            for ty in tuple.elements() {
                elements.push(nested(cache, *ty, &path, &mut fresh)?);
            }
            let layout = Layout::Tuple {
                by_ref: tuple.by_ref(),
                elements: elements.iter().map(|c| c.layout().clone()).collect(),
            };
            let plan = tuple_plan(tuple.clone(), elements, type_name);
            if tuple.by_ref() {
                wrapped(layout, plan, None, type_name)
            } else {
                (layout, plan, None)
            }
        }
        Shape::Sequence(seq) => {
            let element = nested(cache, seq.element(), &path, &mut fresh)?;
            let layout = Layout::Sequence {
                element: Box::new(element.layout().clone()),
            };
            let seq = *seq;
            wrapped(
                layout,
                sequence_payload(seq, element, type_name),
                Some(Arc::new(move || seq.with_capacity(0))),
                type_name,
            )
        }
        Shape::OptionalValue(opt) => {
            let inner = nested(cache, opt.inner(), &path, &mut fresh)?;
            let layout = Layout::Optional {
                inner: Box::new(inner.layout().clone()),
            };
            (layout, optional_plan(*opt, inner.plan().clone(), type_name), None)
        }
        Shape::Nullable(opt) => {
            let inner = nested(cache, opt.inner(), &path, &mut fresh)?;
            let Some(inner_payload) = inner.payload().cloned() else {
                return Err(CodecError::UnsupportedType {
                    type_name,
                    reason: UnsupportedReason::Unclassified,
                });
            };
            (
                inner.layout().clone(),
                optional_plan(*opt, inner_payload, type_name),
                None,
            )
        }
        Shape::Record { info, members } => {
            let mut codecs = Vec::with_capacity(members.len());
            for member in members.iter() {
                codecs.push(nested(cache, member.ty(), &path, &mut fresh)?);
            }
            let layout = Layout::Record {
                name: type_name,
                members: members
                    .iter()
                    .zip(&codecs)
                    .map(|(member, codec)| MemberLayout {
                        name: member.name(),
                        ordinal: member.ordinal(),
                        layout: codec.layout().clone(),
                    })
                    .collect(),
            };
            let empty_info = info.clone();
            wrapped(
                layout,
                record_payload(info.clone(), members, codecs, type_name),
                Some(Arc::new(move || empty_info.construct())),
                type_name,
            )
        }
    };

    let codec = Arc::new(CompiledCodec::new(key, shape.name(), layout, plan, payload));
    fresh.push(Arc::clone(&codec));
    Ok(Built { codec, fresh })
}

/// Resolves a contained type, reusing codecs already cached or built here.
fn nested(
    cache: &CodecCache,
    ty: TypeRef,
    path: &BuildPath,
    fresh: &mut Vec<Arc<CompiledCodec>>,
) -> CodecResult<Arc<CompiledCodec>> {
    if let Some(codec) = fresh.iter().find(|codec| codec.key() == ty.key()) {
        return Ok(Arc::clone(codec));
    }
    if let Some(codec) = cache.get(ty.key()) {
        return Ok(codec);
    }
    let built = build_at(cache, &ty.resolve(), path.clone())?;
    fresh.extend(built.fresh);
    Ok(built.codec)
}

fn boxed<T: 'static>(value: T) -> Box<dyn Any> {
    Box::new(value)
}

const fn mismatch(type_name: &'static str) -> CodecError {
    CodecError::InvalidValue {
        type_name,
        reason: ValueReason::TypeMismatch,
    }
}

const fn assembly_failed(type_name: &'static str) -> CodecError {
    CodecError::ConstructionFailure {
        type_name,
        reason: ConstructionReason::AssemblyFailed,
    }
}

const fn invalid_presence(value: u8) -> CodecError {
    CodecError::InvalidFormat {
        reason: FormatReason::InvalidPresence { value },
    }
}

/// Attributes encode-side stream errors to the type being written.
fn encode_error(type_name: &'static str, err: StreamError) -> CodecError {
    match err {
        StreamError::CharOutsideBmp { ch } => CodecError::InvalidValue {
            type_name,
            reason: ValueReason::CharOutsideBmp { ch },
        },
        StreamError::LengthOverflow { len } => CodecError::InvalidValue {
            type_name,
            reason: ValueReason::LengthOverflow { len },
        },
        other => other.into(),
    }
}

fn write_length(sink: &mut dyn ByteSink, len: usize, type_name: &'static str) -> CodecResult<()> {
    write_len(sink, len).map_err(|err| encode_error(type_name, err))
}

const fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> CodecResult<()> {
    if actual > limit {
        return Err(CodecError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

/// Reads `len` bytes, growing the buffer as data actually arrives.
fn read_vec(source: &mut dyn ByteSource, len: usize) -> CodecResult<Vec<u8>> {
    let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    let mut chunk = [0u8; READ_CHUNK];
    let mut remaining = len;
    while remaining > 0 {
        let step = remaining.min(READ_CHUNK);
        source.read_into(&mut chunk[..step])?;
        out.extend_from_slice(&chunk[..step]);
        remaining -= step;
    }
    Ok(out)
}

/// Prefixes `payload` with a presence byte.
///
/// Decoding an absent marker yields `empty()`, or fails when there is none.
fn wrapped(
    layout: Layout,
    payload: Plan,
    empty: Option<EmptyFn>,
    type_name: &'static str,
) -> (Layout, Plan, Option<Plan>) {
    let encode_payload = Arc::clone(&payload.encode);
    let decode_payload = Arc::clone(&payload.decode);
    let plan = Plan {
        encode: encoder(move |value, sink| {
            sink.write_u8(PRESENT)?;
            encode_payload(value, sink)
        }),
        decode: decoder(move |source, limits| match source.read_u8()? {
            ABSENT => empty
                .as_deref()
                .map(|empty| empty())
                .ok_or(CodecError::ConstructionFailure {
                    type_name,
                    reason: ConstructionReason::NoEmptyValue,
                }),
            PRESENT => decode_payload(source, limits),
            value => Err(invalid_presence(value)),
        }),
    };
    (layout, plan, Some(payload))
}

fn primitive_plan(kind: PrimitiveKind, type_name: &'static str) -> Plan {
    match kind {
        PrimitiveKind::I8 => fixed::<i8>(type_name),
        PrimitiveKind::U8 => fixed::<u8>(type_name),
        PrimitiveKind::I16 => fixed::<i16>(type_name),
        PrimitiveKind::U16 => fixed::<u16>(type_name),
        PrimitiveKind::I32 => fixed::<i32>(type_name),
        PrimitiveKind::U32 => fixed::<u32>(type_name),
        PrimitiveKind::I64 => fixed::<i64>(type_name),
        PrimitiveKind::U64 => fixed::<u64>(type_name),
        PrimitiveKind::F32 => fixed::<f32>(type_name),
        PrimitiveKind::F64 => fixed::<f64>(type_name),
        PrimitiveKind::Bool => fixed::<bool>(type_name),
        PrimitiveKind::Char => fixed::<char>(type_name),
        PrimitiveKind::Decimal => fixed::<Decimal>(type_name),
    }
}

fn fixed<P: Primitive>(type_name: &'static str) -> Plan {
    Plan {
        encode: encoder(move |value, sink| {
            let value = value
                .downcast_ref::<P>()
                .ok_or_else(|| mismatch(type_name))?;
            value
                .write_fixed(sink)
                .map_err(|err| encode_error(type_name, err))
        }),
        decode: decoder(|source, _| Ok(boxed(P::read_fixed(source)?))),
    }
}

fn enum_plan(info: EnumInfo, type_name: &'static str) -> Plan {
    let repr = info.repr();
    Plan {
        encode: encoder(move |value, sink| {
            let bits = info.to_bits(value).ok_or_else(|| mismatch(type_name))?;
            Ok(write_integer_bits(repr, bits, sink)?)
        }),
        decode: decoder(move |source, _| {
            let bits = read_integer_bits(repr, source)?;
            info.from_bits(bits).ok_or(CodecError::InvalidFormat {
                reason: FormatReason::UnknownEnumValue { type_name, bits },
            })
        }),
    }
}

fn string_payload(type_name: &'static str) -> Plan {
    Plan {
        encode: encoder(move |value, sink| {
            let text = value
                .downcast_ref::<String>()
                .ok_or_else(|| mismatch(type_name))?;
            write_length(sink, text.len(), type_name)?;
            Ok(sink.write_bytes(text.as_bytes())?)
        }),
        decode: decoder(|source, limits: &CodecLimits| {
            let len = read_len(source)?;
            check_limit(LimitKind::StringBytes, limits.max_string_bytes, len)?;
            let bytes = read_vec(source, len)?;
            let text = String::from_utf8(bytes).map_err(|_| CodecError::InvalidFormat {
                reason: FormatReason::InvalidUtf8,
            })?;
            Ok(boxed(text))
        }),
    }
}

fn blob_payload(type_name: &'static str) -> Plan {
    Plan {
        encode: encoder(move |value, sink| {
            let bytes = value
                .downcast_ref::<Vec<u8>>()
                .ok_or_else(|| mismatch(type_name))?;
            write_length(sink, bytes.len(), type_name)?;
            Ok(sink.write_bytes(bytes)?)
        }),
        decode: decoder(|source, limits: &CodecLimits| {
            let len = read_len(source)?;
            check_limit(LimitKind::BlobBytes, limits.max_blob_bytes, len)?;
            Ok(boxed(read_vec(source, len)?))
        }),
    }
}

fn tuple_plan(info: TupleInfo, elements: Vec<Arc<CompiledCodec>>, type_name: &'static str) -> Plan {
    let elements: Arc<[Arc<CompiledCodec>]> = elements.into();
    let decode_elements = Arc::clone(&elements);
    let decode_info = info.clone();
    Plan {
        encode: encoder(move |value, sink| {
            for (index, codec) in elements.iter().enumerate() {
                let part = info
                    .element(value, index)
                    .ok_or_else(|| mismatch(type_name))?;
                codec.encode(part, sink)?;
            }
            Ok(())
        }),
        decode: decoder(move |source, limits| {
            let mut parts = Vec::with_capacity(decode_elements.len());
            for codec in decode_elements.iter() {
                parts.push(codec.decode(source, limits)?);
            }
            decode_info
                .assemble(parts)
                .ok_or_else(|| assembly_failed(type_name))
        }),
    }
}

fn sequence_payload(
    info: SequenceInfo,
    element: Arc<CompiledCodec>,
    type_name: &'static str,
) -> Plan {
    let decode_element = Arc::clone(&element);
    Plan {
        encode: encoder(move |value, sink| {
            let len = info.len(value).ok_or_else(|| mismatch(type_name))?;
            write_length(sink, len, type_name)?;
            for index in 0..len {
                let item = info
                    .item(value, index)
                    .ok_or_else(|| mismatch(type_name))?;
                element.encode(item, sink)?;
            }
            Ok(())
        }),
        decode: decoder(move |source, limits| {
            let count = read_len(source)?;
            check_limit(LimitKind::SequenceLength, limits.max_sequence_len, count)?;
            let mut sequence = info.with_capacity(count.min(PREALLOC_LIMIT));
            for _ in 0..count {
                let item = decode_element.decode(source, limits)?;
                if !info.push(sequence.as_mut(), item) {
                    return Err(assembly_failed(type_name));
                }
            }
            Ok(sequence)
        }),
    }
}

/// `inner` is the full inner plan for optional values, or the inner payload
/// for nullable ones.
fn optional_plan(info: OptionalInfo, inner: Plan, type_name: &'static str) -> Plan {
    let Plan {
        encode: encode_inner,
        decode: decode_inner,
    } = inner;
    Plan {
        encode: encoder(move |value, sink| {
            match info.get(value).ok_or_else(|| mismatch(type_name))? {
                None => sink.write_u8(ABSENT)?,
                Some(inner) => {
                    sink.write_u8(PRESENT)?;
                    encode_inner(inner, sink)?;
                }
            }
            Ok(())
        }),
        decode: decoder(move |source, limits| match source.read_u8()? {
            ABSENT => Ok(info.none()),
            PRESENT => {
                let inner = decode_inner(source, limits)?;
                info.some(inner).ok_or_else(|| assembly_failed(type_name))
            }
            value => Err(invalid_presence(value)),
        }),
    }
}

fn record_payload(
    info: RecordInfo,
    members: &MemberList,
    codecs: Vec<Arc<CompiledCodec>>,
    type_name: &'static str,
) -> Plan {
    let slots: Arc<[(MemberAccess, Arc<CompiledCodec>)]> =
        members.iter().cloned().zip(codecs).collect();
    let decode_slots = Arc::clone(&slots);
    Plan {
        encode: encoder(move |value, sink| {
            for (member, codec) in slots.iter() {
                let part = member.get(value).ok_or_else(|| mismatch(type_name))?;
                codec.encode(part, sink)?;
            }
            Ok(())
        }),
        decode: decoder(move |source, limits| {
            let mut record = info.construct();
            for (member, codec) in decode_slots.iter() {
                let part = codec.decode(source, limits)?;
                if !member.set(record.as_mut(), part) {
                    return Err(CodecError::ConstructionFailure {
                        type_name,
                        reason: ConstructionReason::MemberRejected {
                            member: member.name(),
                        },
                    });
                }
            }
            Ok(record)
        }),
    }
}
