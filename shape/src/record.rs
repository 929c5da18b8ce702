//! Record declarations.
//!
//! Records list their members explicitly through [`Record`] and [`Member`].
//! Member inclusion follows two rules:
//!
//! - A **property** (getter and setter) is included unless marked
//!   [`Member::not_serialized`]. Read-only properties are never included.
//! - A **field** is included only when marked [`Member::serialized`].
//!
//! Included properties come first, then included fields, each group in
//! declaration order.
//!
//! ```
//! use shape::{BinType, Member, Record, TypeInfo};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: String,
//! }
//!
//! impl BinType for Point {
//!     fn type_info() -> TypeInfo {
//!         Record::<Self>::new()
//!             .member(Member::property("x", |p: &Point| &p.x, |p: &mut Point, v| p.x = v))
//!             .member(Member::property("y", |p: &Point| &p.y, |p: &mut Point, v| p.y = v))
//!             .member(
//!                 Member::property("label", |p: &Point| &p.label, |p: &mut Point, v| p.label = v)
//!                     .not_serialized(),
//!             )
//!             .into_type_info()
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::info::{BinType, TypeInfo, TypeKind, TypeRef};
use crate::key::TypeKey;

/// Erased member getter.
pub(crate) type Getter = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Erased member setter; returns `false` on a type mismatch.
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;

/// How a member was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MemberSource {
    /// Accessor pair, included by default.
    Property,
    /// Storage slot, included only when opted in.
    Field,
}

#[derive(Clone)]
pub(crate) struct MemberDecl {
    pub(crate) name: &'static str,
    pub(crate) ty: TypeRef,
    pub(crate) source: MemberSource,
    pub(crate) excluded: bool,
    pub(crate) opted_in: bool,
    pub(crate) getter: Getter,
    pub(crate) setter: Option<Setter>,
}

impl MemberDecl {
    pub(crate) const fn is_included(&self) -> bool {
        match self.source {
            MemberSource::Property => self.setter.is_some() && !self.excluded,
            MemberSource::Field => self.opted_in && !self.excluded,
        }
    }
}

/// One declared member of a record `R`.
pub struct Member<R> {
    decl: MemberDecl,
    _record: PhantomData<fn(&R)>,
}

impl<R: 'static> Member<R> {
    /// Declares a property with a getter and a setter.
    pub fn property<V, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        V: BinType,
        G: Fn(&R) -> &V + Send + Sync + 'static,
        S: Fn(&mut R, V) + Send + Sync + 'static,
    {
        Self::declare(name, MemberSource::Property, get, Some(erase_setter(set)))
    }

    /// Declares a property without a setter. It is never encoded.
    pub fn read_only<V, G>(name: &'static str, get: G) -> Self
    where
        V: BinType,
        G: Fn(&R) -> &V + Send + Sync + 'static,
    {
        Self::declare(name, MemberSource::Property, get, None)
    }

    /// Declares a field. It is encoded only after [`serialized`](Self::serialized).
    pub fn field<V, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        V: BinType,
        G: Fn(&R) -> &V + Send + Sync + 'static,
        S: Fn(&mut R, V) + Send + Sync + 'static,
    {
        Self::declare(name, MemberSource::Field, get, Some(erase_setter(set)))
    }

    /// Excludes this member from encoding.
    #[must_use]
    pub fn not_serialized(mut self) -> Self {
        self.decl.excluded = true;
        self
    }

    /// Opts this member into encoding. Needed for fields only.
    #[must_use]
    pub fn serialized(mut self) -> Self {
        self.decl.opted_in = true;
        self
    }

    fn declare<V, G>(
        name: &'static str,
        source: MemberSource,
        get: G,
        setter: Option<Setter>,
    ) -> Self
    where
        V: BinType,
        G: Fn(&R) -> &V + Send + Sync + 'static,
    {
        Self {
            decl: MemberDecl {
                name,
                ty: TypeRef::of::<V>(),
                source,
                excluded: false,
                opted_in: false,
                getter: erase_getter(get),
                setter,
            },
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Member<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.decl.name)
            .field("ty", &self.decl.ty)
            .field("source", &self.decl.source)
            .finish_non_exhaustive()
    }
}

fn getter<F>(f: F) -> Getter
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn erase_getter<R, V, G>(get: G) -> Getter
where
    R: 'static,
    V: BinType,
    G: Fn(&R) -> &V + Send + Sync + 'static,
{
    getter(move |record| {
        let record = record.downcast_ref::<R>()?;
        Some(get(record) as &dyn Any)
    })
}

fn erase_setter<R, V, S>(set: S) -> Setter
where
    R: 'static,
    V: BinType,
    S: Fn(&mut R, V) + Send + Sync + 'static,
{
    Arc::new(
        move |record: &mut dyn Any, value: Box<dyn Any>| match (
            record.downcast_mut::<R>(),
            value.downcast::<V>(),
        ) {
            (Some(record), Ok(value)) => {
                set(record, *value);
                true
            }
            _ => false,
        },
    )
}

/// Erased record description: a default constructor plus declared members.
#[derive(Clone)]
pub struct RecordInfo {
    construct: fn() -> Box<dyn Any>,
    declared: Vec<MemberDecl>,
}

impl RecordInfo {
    /// Returns a default-constructed instance.
    #[must_use]
    pub fn construct(&self) -> Box<dyn Any> {
        (self.construct)()
    }

    /// Number of declared members, included or not.
    #[must_use]
    pub fn declared_len(&self) -> usize {
        self.declared.len()
    }

    pub(crate) fn declarations(&self) -> &[MemberDecl] {
        &self.declared
    }
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.declared.iter().map(|m| m.name).collect();
        f.debug_struct("RecordInfo")
            .field("declared", &names)
            .finish_non_exhaustive()
    }
}

fn construct_default<R: Default + 'static>() -> Box<dyn Any> {
    Box::new(R::default())
}

/// Builder for a record's [`TypeInfo`].
pub struct Record<R> {
    declared: Vec<MemberDecl>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Default + 'static> Record<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declared: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Appends a member declaration.
    #[must_use]
    pub fn member(mut self, member: Member<R>) -> Self {
        self.declared.push(member.decl);
        self
    }

    #[must_use]
    pub fn into_type_info(self) -> TypeInfo {
        TypeInfo::new(
            TypeKey::of::<R>(),
            TypeKind::Record(RecordInfo {
                construct: construct_default::<R>,
                declared: self.declared,
            }),
        )
    }
}

impl<R: Default + 'static> Default for Record<R> {
    fn default() -> Self {
        Self::new()
    }
}
