//! Mapping from type descriptions to codec shapes.

use std::sync::Arc;

use bytestream::PrimitiveKind;

use crate::error::{ShapeError, ShapeResult, UnsupportedReason};
use crate::info::{EnumInfo, OptionalInfo, SequenceInfo, TupleInfo, TypeInfo, TypeKind};
use crate::key::TypeKey;
use crate::members::{members_of, MemberList};
use crate::record::RecordInfo;

/// The encoding strategy for one type.
#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(PrimitiveKind),
    Enum(EnumInfo),
    String,
    Tuple(TupleInfo),
    /// `Vec<u8>`, encoded as raw bytes.
    ByteBlob,
    Sequence(SequenceInfo),
    /// `Option<T>` with its own discriminator byte.
    OptionalValue(OptionalInfo),
    /// `Option<T>` sharing the presence byte of a presence-wrapped `T`.
    Nullable(OptionalInfo),
    Record {
        info: RecordInfo,
        members: Arc<MemberList>,
    },
}

impl Shape {
    /// Returns `true` if values of this shape start with a presence byte.
    #[must_use]
    pub const fn is_presence_wrapped(&self) -> bool {
        match self {
            Self::String | Self::ByteBlob | Self::Sequence(_) | Self::Record { .. } => true,
            Self::Tuple(tuple) => tuple.by_ref(),
            Self::Primitive(_)
            | Self::Enum(_)
            | Self::OptionalValue(_)
            | Self::Nullable(_) => false,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Enum(_) => "enum",
            Self::String => "string",
            Self::Tuple(_) => "tuple",
            Self::ByteBlob => "byte_blob",
            Self::Sequence(_) => "sequence",
            Self::OptionalValue(_) => "optional_value",
            Self::Nullable(_) => "nullable",
            Self::Record { .. } => "record",
        }
    }
}

/// Picks the shape of `info`.
///
/// Records capture their member list here, so the first classification of a
/// record fixes its member order.
pub fn classify(info: &TypeInfo) -> ShapeResult<Shape> {
    let unsupported = |reason| ShapeError::Unsupported {
        type_name: info.type_name(),
        reason,
    };

    match info.kind() {
        TypeKind::Enum(e) => Ok(Shape::Enum(*e)),
        TypeKind::Primitive(kind) => Ok(Shape::Primitive(*kind)),
        TypeKind::String => Ok(Shape::String),
        TypeKind::Tuple(tuple) => Ok(Shape::Tuple(tuple.clone())),
        TypeKind::Sequence(_) if info.key() == TypeKey::of::<Vec<u8>>() => Ok(Shape::ByteBlob),
        TypeKind::Sequence(seq) => Ok(Shape::Sequence(*seq)),
        TypeKind::Optional(opt) => classify_optional(opt),
        TypeKind::Record(record) => classify_record(info.key(), record),
        TypeKind::Map { .. } => Err(unsupported(UnsupportedReason::AssociativeContainer)),
        TypeKind::Iterable => Err(unsupported(UnsupportedReason::UntypedSequence)),
        TypeKind::Opaque => Err(unsupported(UnsupportedReason::Unclassified)),
    }
}

fn classify_optional(opt: &OptionalInfo) -> ShapeResult<Shape> {
    let inner = classify(&opt.inner().resolve())?;
    if inner.is_presence_wrapped() {
        Ok(Shape::Nullable(*opt))
    } else {
        Ok(Shape::OptionalValue(*opt))
    }
}

fn classify_record(key: TypeKey, record: &RecordInfo) -> ShapeResult<Shape> {
    let members = members_of(key, record)?;
    Ok(Shape::Record {
        info: record.clone(),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::BinType;
    use crate::record::{Member, Record};
    use std::collections::{HashMap, VecDeque};

    fn shape_of<T: BinType>() -> ShapeResult<Shape> {
        classify(&T::type_info())
    }

    #[derive(Debug, Default)]
    struct Pair {
        left: u8,
    }

    impl BinType for Pair {
        fn type_info() -> TypeInfo {
            Record::<Self>::new()
                .member(Member::property("left", |p: &Pair| &p.left, |p: &mut Pair, v| p.left = v))
                .into_type_info()
        }
    }

    struct Bag;

    impl BinType for Bag {
        fn type_info() -> TypeInfo {
            TypeInfo::new(TypeKey::of::<Self>(), TypeKind::Iterable)
        }
    }

    struct Handle;

    impl BinType for Handle {
        fn type_info() -> TypeInfo {
            TypeInfo::new(TypeKey::of::<Self>(), TypeKind::Opaque)
        }
    }

    #[test]
    fn leaves() {
        assert!(matches!(
            shape_of::<u64>().unwrap(),
            Shape::Primitive(PrimitiveKind::U64)
        ));
        assert!(matches!(shape_of::<String>().unwrap(), Shape::String));
    }

    #[test]
    fn byte_vectors_are_blobs() {
        assert!(matches!(shape_of::<Vec<u8>>().unwrap(), Shape::ByteBlob));
        assert!(matches!(
            shape_of::<Vec<i8>>().unwrap(),
            Shape::Sequence(_)
        ));
        assert!(matches!(
            shape_of::<VecDeque<u8>>().unwrap(),
            Shape::Sequence(_)
        ));
    }

    #[test]
    fn optional_over_presence_wrapped_is_nullable() {
        assert!(matches!(
            shape_of::<Option<String>>().unwrap(),
            Shape::Nullable(_)
        ));
        assert!(matches!(
            shape_of::<Option<Vec<u8>>>().unwrap(),
            Shape::Nullable(_)
        ));
        assert!(matches!(
            shape_of::<Option<Pair>>().unwrap(),
            Shape::Nullable(_)
        ));
        assert!(matches!(
            shape_of::<Option<Box<(u8, u8)>>>().unwrap(),
            Shape::Nullable(_)
        ));
    }

    #[test]
    fn optional_over_values_has_own_discriminator() {
        assert!(matches!(
            shape_of::<Option<i32>>().unwrap(),
            Shape::OptionalValue(_)
        ));
        assert!(matches!(
            shape_of::<Option<(u8, u8)>>().unwrap(),
            Shape::OptionalValue(_)
        ));
        assert!(matches!(
            shape_of::<Option<Option<String>>>().unwrap(),
            Shape::OptionalValue(_)
        ));
    }

    #[test]
    fn presence_wrapping() {
        assert!(shape_of::<Pair>().unwrap().is_presence_wrapped());
        assert!(shape_of::<Box<(u8,)>>().unwrap().is_presence_wrapped());
        assert!(!shape_of::<(u8,)>().unwrap().is_presence_wrapped());
        assert!(!shape_of::<Option<String>>().unwrap().is_presence_wrapped());
    }

    #[test]
    fn records_carry_members() {
        let Shape::Record { members, .. } = shape_of::<Pair>().unwrap() else {
            panic!("expected record");
        };
        assert_eq!(members.names(), vec!["left"]);
    }

    #[test]
    fn unsupported_kinds() {
        let map = shape_of::<HashMap<u8, u8>>().unwrap_err();
        assert!(matches!(
            map,
            ShapeError::Unsupported {
                reason: UnsupportedReason::AssociativeContainer,
                ..
            }
        ));
        let bag = shape_of::<Bag>().unwrap_err();
        assert!(matches!(
            bag,
            ShapeError::Unsupported {
                reason: UnsupportedReason::UntypedSequence,
                ..
            }
        ));
        let handle = shape_of::<Handle>().unwrap_err();
        assert!(matches!(
            handle,
            ShapeError::Unsupported {
                reason: UnsupportedReason::Unclassified,
                ..
            }
        ));
        assert!(shape_of::<Option<HashMap<u8, u8>>>().is_err());
    }
}
