//! Type descriptions and shape classification for the bindata codec.
//!
//! This crate decides *how* a type is encoded without encoding anything:
//! - [`BinType`] and [`TypeInfo`] let host types describe themselves
//! - [`classify`] maps a description onto a closed set of [`Shape`]s
//! - [`members_of`] captures and freezes a record's member order
//! - [`Layout`] and [`layout_hash`] describe the resulting wire layout
//!
//! # Design Principles
//!
//! - **Explicit registration** - Types opt in by implementing [`BinType`]; nothing is inferred.
//! - **Type-erased accessors** - Descriptions carry plain function pointers and shared closures.
//! - **Frozen member order** - The first capture of a record's members holds for the process.
//! - **Deterministic hashing** - A layout hash depends on structure only, never on names.

mod builtin;
mod classify;
mod error;
mod info;
mod key;
mod layout;
mod members;
mod record;

pub use classify::{classify, Shape};
pub use error::{ShapeError, ShapeResult, UnsupportedReason};
pub use info::{
    BinEnum, BinType, EnumInfo, EnumRepr, OptionalInfo, SequenceInfo, SequenceLike, TupleInfo,
    TupleLike, TypeInfo, TypeKind, TypeRef,
};
pub use key::TypeKey;
pub use layout::{layout_hash, Layout, MemberLayout};
pub use members::{members_of, MemberAccess, MemberList};
pub use record::{Member, MemberSource, Record, RecordInfo};
