//! Type descriptions supplied by participating host types.
//!
//! A type takes part in encoding by implementing [`BinType`]. The returned
//! [`TypeInfo`] carries the type's key plus type-erased accessors and
//! factories, so codecs built later never need to name the concrete type.

use std::any::Any;
use std::fmt;

use bytestream::{IntegerKind, Primitive, PrimitiveKind};

use crate::key::TypeKey;
use crate::record::RecordInfo;

/// A host type that can describe itself to the codec.
pub trait BinType: 'static {
    /// Returns the description of `Self`.
    ///
    /// Called at most a handful of times per type and process; results are
    /// cached by the codec.
    fn type_info() -> TypeInfo;
}

/// A lazily resolved reference to another participating type.
///
/// Element, member and inner types are stored as `TypeRef`s so that
/// describing a type never requires describing everything it contains.
#[derive(Clone, Copy)]
pub struct TypeRef {
    key: TypeKey,
    info: fn() -> TypeInfo,
}

impl TypeRef {
    #[must_use]
    pub fn of<T: BinType>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            info: T::type_info,
        }
    }

    #[must_use]
    pub const fn key(self) -> TypeKey {
        self.key
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.key.name()
    }

    /// Produces the referenced type's description.
    #[must_use]
    pub fn resolve(self) -> TypeInfo {
        (self.info)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.key.name())
    }
}

/// Description of one host type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    key: TypeKey,
    kind: TypeKind,
}

/// What a type declares itself to be.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A fixed-width leaf value.
    Primitive(PrimitiveKind),
    /// A fieldless enum backed by an integer representation.
    Enum(EnumInfo),
    /// Owned UTF-8 text.
    String,
    /// A fixed-arity heterogeneous tuple.
    Tuple(TupleInfo),
    /// A homogeneous, growable sequence.
    Sequence(SequenceInfo),
    /// A value that may be absent.
    Optional(OptionalInfo),
    /// A record with named members.
    Record(RecordInfo),
    /// A key/value container.
    Map { key: TypeRef, value: TypeRef },
    /// A sequence whose element type is not known.
    Iterable,
    /// A type with no encodable structure.
    Opaque,
}

impl TypeInfo {
    #[must_use]
    pub const fn new(key: TypeKey, kind: TypeKind) -> Self {
        Self { key, kind }
    }

    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    #[must_use]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Describes a fixed-width leaf type.
    #[must_use]
    pub fn primitive<T: Primitive>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Primitive(T::KIND))
    }

    /// Describes a fieldless enum.
    #[must_use]
    pub fn enumeration<E: BinEnum>() -> Self {
        Self::new(TypeKey::of::<E>(), TypeKind::Enum(EnumInfo::of::<E>()))
    }

    /// Describes a value tuple such as `(u8, String)`.
    #[must_use]
    pub fn tuple<T: TupleLike>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Tuple(TupleInfo::of::<T>()))
    }

    /// Describes a boxed tuple such as `Box<(u8, String)>`.
    ///
    /// Boxed tuples are reference tuples: they carry a presence byte.
    #[must_use]
    pub fn boxed_tuple<T: TupleLike>() -> Self {
        Self::new(
            TypeKey::of::<Box<T>>(),
            TypeKind::Tuple(TupleInfo::boxed::<T>()),
        )
    }

    /// Describes a growable sequence.
    #[must_use]
    pub fn sequence<C: SequenceLike>() -> Self {
        Self::new(
            TypeKey::of::<C>(),
            TypeKind::Sequence(SequenceInfo::of::<C>()),
        )
    }

    /// Describes `Option<T>`.
    #[must_use]
    pub fn optional<T: BinType>() -> Self {
        Self::new(
            TypeKey::of::<Option<T>>(),
            TypeKind::Optional(OptionalInfo::of::<T>()),
        )
    }

    /// Describes a key/value container `M`.
    #[must_use]
    pub fn map<M: 'static, K: BinType, V: BinType>() -> Self {
        Self::new(
            TypeKey::of::<M>(),
            TypeKind::Map {
                key: TypeRef::of::<K>(),
                value: TypeRef::of::<V>(),
            },
        )
    }
}

/// Integer types usable as an enum representation.
pub trait EnumRepr: Copy + 'static {
    const KIND: IntegerKind;

    /// Widens to 64 bits, sign-extending signed types.
    fn to_bits(self) -> u64;

    /// Truncates 64 bits to `Self`.
    fn from_bits(bits: u64) -> Self;
}

macro_rules! enum_repr {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap,
                clippy::cast_sign_loss
            )]
            impl EnumRepr for $ty {
                const KIND: IntegerKind = IntegerKind::$kind;

                fn to_bits(self) -> u64 {
                    self as u64
                }

                fn from_bits(bits: u64) -> Self {
                    bits as Self
                }
            }
        )+
    };
}

enum_repr! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

/// A fieldless enum with a fixed integer representation.
///
/// `from_repr` returns `None` for values the enum does not declare; decoding
/// such a value fails.
pub trait BinEnum: Copy + 'static {
    type Repr: EnumRepr;

    fn to_repr(self) -> Self::Repr;

    fn from_repr(repr: Self::Repr) -> Option<Self>;
}

/// Erased enum accessors.
#[derive(Clone, Copy)]
pub struct EnumInfo {
    repr: IntegerKind,
    to_bits: fn(&dyn Any) -> Option<u64>,
    from_bits: fn(u64) -> Option<Box<dyn Any>>,
}

impl EnumInfo {
    #[must_use]
    pub fn of<E: BinEnum>() -> Self {
        Self {
            repr: <E::Repr as EnumRepr>::KIND,
            to_bits: enum_to_bits::<E>,
            from_bits: enum_from_bits::<E>,
        }
    }

    #[must_use]
    pub const fn repr(&self) -> IntegerKind {
        self.repr
    }

    /// Returns the representation bits, or `None` if `value` is not this enum.
    #[must_use]
    pub fn to_bits(&self, value: &dyn Any) -> Option<u64> {
        (self.to_bits)(value)
    }

    /// Returns the enum value for `bits`, or `None` if it is undeclared.
    #[must_use]
    pub fn from_bits(&self, bits: u64) -> Option<Box<dyn Any>> {
        (self.from_bits)(bits)
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo").field("repr", &self.repr).finish()
    }
}

fn enum_to_bits<E: BinEnum>(value: &dyn Any) -> Option<u64> {
    value.downcast_ref::<E>().map(|e| e.to_repr().to_bits())
}

fn enum_from_bits<E: BinEnum>(bits: u64) -> Option<Box<dyn Any>> {
    let value = E::from_repr(<E::Repr as EnumRepr>::from_bits(bits))?;
    Some(Box::new(value))
}

/// A fixed-arity tuple whose elements are participating types.
///
/// Implemented for tuples of arity 1 through 8.
pub trait TupleLike: Sized + 'static {
    fn element_types() -> Vec<TypeRef>;

    fn element(&self, index: usize) -> Option<&dyn Any>;

    /// Rebuilds the tuple from decoded elements, in order.
    fn assemble(parts: Vec<Box<dyn Any>>) -> Option<Self>;
}

/// Erased tuple accessors.
#[derive(Clone)]
pub struct TupleInfo {
    elements: Vec<TypeRef>,
    by_ref: bool,
    element: fn(&dyn Any, usize) -> Option<&dyn Any>,
    assemble: fn(Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>,
}

impl TupleInfo {
    #[must_use]
    pub fn of<T: TupleLike>() -> Self {
        Self {
            elements: T::element_types(),
            by_ref: false,
            element: tuple_element::<T>,
            assemble: tuple_assemble::<T>,
        }
    }

    #[must_use]
    pub fn boxed<T: TupleLike>() -> Self {
        Self {
            elements: T::element_types(),
            by_ref: true,
            element: boxed_tuple_element::<T>,
            assemble: boxed_tuple_assemble::<T>,
        }
    }

    #[must_use]
    pub fn elements(&self) -> &[TypeRef] {
        &self.elements
    }

    /// Returns `true` for reference tuples, which carry a presence byte.
    #[must_use]
    pub const fn by_ref(&self) -> bool {
        self.by_ref
    }

    #[must_use]
    pub fn element<'a>(&self, tuple: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.element)(tuple, index)
    }

    #[must_use]
    pub fn assemble(&self, parts: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
        (self.assemble)(parts)
    }
}

impl fmt::Debug for TupleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleInfo")
            .field("elements", &self.elements)
            .field("by_ref", &self.by_ref)
            .finish()
    }
}

fn tuple_element<T: TupleLike>(tuple: &dyn Any, index: usize) -> Option<&dyn Any> {
    tuple.downcast_ref::<T>()?.element(index)
}

fn boxed_tuple_element<T: TupleLike>(tuple: &dyn Any, index: usize) -> Option<&dyn Any> {
    tuple.downcast_ref::<Box<T>>()?.element(index)
}

fn tuple_assemble<T: TupleLike>(parts: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
    Some(Box::new(T::assemble(parts)?))
}

fn boxed_tuple_assemble<T: TupleLike>(parts: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
    Some(Box::new(Box::new(T::assemble(parts)?)))
}

/// A growable homogeneous sequence.
pub trait SequenceLike: 'static {
    type Item: BinType;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item(&self, index: usize) -> Option<&Self::Item>;

    fn with_capacity(capacity: usize) -> Self;

    fn push(&mut self, item: Self::Item);
}

/// Erased sequence accessors.
#[derive(Clone, Copy)]
pub struct SequenceInfo {
    element: TypeRef,
    len: fn(&dyn Any) -> Option<usize>,
    item: fn(&dyn Any, usize) -> Option<&dyn Any>,
    with_capacity: fn(usize) -> Box<dyn Any>,
    push: fn(&mut dyn Any, Box<dyn Any>) -> bool,
}

impl SequenceInfo {
    #[must_use]
    pub fn of<C: SequenceLike>() -> Self {
        Self {
            element: TypeRef::of::<C::Item>(),
            len: sequence_len::<C>,
            item: sequence_item::<C>,
            with_capacity: sequence_with_capacity::<C>,
            push: sequence_push::<C>,
        }
    }

    #[must_use]
    pub const fn element(&self) -> TypeRef {
        self.element
    }

    #[must_use]
    pub fn len(&self, sequence: &dyn Any) -> Option<usize> {
        (self.len)(sequence)
    }

    #[must_use]
    pub fn item<'a>(&self, sequence: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.item)(sequence, index)
    }

    #[must_use]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Any> {
        (self.with_capacity)(capacity)
    }

    /// Appends `item`; returns `false` if either value has the wrong type.
    #[must_use]
    pub fn push(&self, sequence: &mut dyn Any, item: Box<dyn Any>) -> bool {
        (self.push)(sequence, item)
    }
}

impl fmt::Debug for SequenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceInfo")
            .field("element", &self.element)
            .finish()
    }
}

fn sequence_len<C: SequenceLike>(sequence: &dyn Any) -> Option<usize> {
    sequence.downcast_ref::<C>().map(SequenceLike::len)
}

fn sequence_item<C: SequenceLike>(sequence: &dyn Any, index: usize) -> Option<&dyn Any> {
    let item = sequence.downcast_ref::<C>()?.item(index)?;
    Some(item as &dyn Any)
}

fn sequence_with_capacity<C: SequenceLike>(capacity: usize) -> Box<dyn Any> {
    Box::new(C::with_capacity(capacity))
}

fn sequence_push<C: SequenceLike>(sequence: &mut dyn Any, item: Box<dyn Any>) -> bool {
    match (sequence.downcast_mut::<C>(), item.downcast::<C::Item>()) {
        (Some(sequence), Ok(item)) => {
            sequence.push(*item);
            true
        }
        _ => false,
    }
}

/// Erased accessors for `Option<T>`.
#[derive(Clone, Copy)]
pub struct OptionalInfo {
    inner: TypeRef,
    get: fn(&dyn Any) -> Option<Option<&dyn Any>>,
    none: fn() -> Box<dyn Any>,
    some: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
}

impl OptionalInfo {
    #[must_use]
    pub fn of<T: BinType>() -> Self {
        Self {
            inner: TypeRef::of::<T>(),
            get: optional_get::<T>,
            none: optional_none::<T>,
            some: optional_some::<T>,
        }
    }

    #[must_use]
    pub const fn inner(&self) -> TypeRef {
        self.inner
    }

    /// Returns the contained value, or `None` if `value` has the wrong type.
    #[must_use]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        (self.get)(value)
    }

    #[must_use]
    pub fn none(&self) -> Box<dyn Any> {
        (self.none)()
    }

    #[must_use]
    pub fn some(&self, inner: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.some)(inner)
    }
}

impl fmt::Debug for OptionalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalInfo")
            .field("inner", &self.inner)
            .finish()
    }
}

fn optional_get<T: BinType>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    let value = value.downcast_ref::<Option<T>>()?;
    Some(value.as_ref().map(|inner| inner as &dyn Any))
}

fn optional_none<T: BinType>() -> Box<dyn Any> {
    Box::new(None::<T>)
}

fn optional_some<T: BinType>(inner: Box<dyn Any>) -> Option<Box<dyn Any>> {
    let inner = inner.downcast::<T>().ok()?;
    Some(Box::new(Some(*inner)))
}
