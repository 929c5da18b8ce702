//! Process-wide cache of captured record member lists.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::trace;

use crate::error::{ShapeError, ShapeResult};
use crate::info::TypeRef;
use crate::key::TypeKey;
use crate::record::{Getter, MemberDecl, MemberSource, RecordInfo, Setter};

/// An included record member with resolved accessors.
#[derive(Clone)]
pub struct MemberAccess {
    name: &'static str,
    ty: TypeRef,
    source: MemberSource,
    ordinal: usize,
    getter: Getter,
    setter: Setter,
}

impl MemberAccess {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the member.
    #[must_use]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[must_use]
    pub const fn source(&self) -> MemberSource {
        self.source
    }

    /// Position in the encoded member order.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Reads the member from `record`; `None` if `record` has the wrong type.
    #[must_use]
    pub fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.getter)(record)
    }

    /// Writes the member into `record`; `false` on a type mismatch.
    #[must_use]
    pub fn set(&self, record: &mut dyn Any, value: Box<dyn Any>) -> bool {
        (self.setter)(record, value)
    }
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccess")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("source", &self.source)
            .field("ordinal", &self.ordinal)
            .finish_non_exhaustive()
    }
}

/// The ordered, included members of one record type.
#[derive(Debug, Clone)]
pub struct MemberList {
    type_name: &'static str,
    members: Vec<MemberAccess>,
}

impl MemberList {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&MemberAccess> {
        self.members.get(ordinal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberAccess> {
        self.members.iter()
    }

    /// Member names in encoded order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.members.iter().map(MemberAccess::name).collect()
    }
}

impl<'a> IntoIterator for &'a MemberList {
    type Item = &'a MemberAccess;
    type IntoIter = std::slice::Iter<'a, MemberAccess>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

fn member_cache() -> &'static DashMap<TypeKey, Arc<MemberList>> {
    static CACHE: OnceLock<DashMap<TypeKey, Arc<MemberList>>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Returns the member list of the record `key`, capturing it on first use.
///
/// The first successful capture wins for the rest of the process: later
/// calls return the same list even if `record` declares something else.
pub fn members_of(key: TypeKey, record: &RecordInfo) -> ShapeResult<Arc<MemberList>> {
    let cache = member_cache();
    if let Some(found) = cache.get(&key) {
        return Ok(Arc::clone(found.value()));
    }

    let captured = Arc::new(capture(key, record)?);
    let published = Arc::clone(&cache.entry(key).or_insert(captured));
    trace!(
        type_name = key.name(),
        members = published.len(),
        "captured record members"
    );
    Ok(published)
}

fn capture(key: TypeKey, record: &RecordInfo) -> ShapeResult<MemberList> {
    let declared = record.declarations();

    let mut seen = HashSet::new();
    for decl in declared {
        if !seen.insert(decl.name) {
            return Err(ShapeError::DuplicateMember {
                type_name: key.name(),
                member: decl.name,
            });
        }
    }

    let properties = declared
        .iter()
        .filter(|decl| decl.source == MemberSource::Property);
    let fields = declared
        .iter()
        .filter(|decl| decl.source == MemberSource::Field);

    let members = properties
        .chain(fields)
        .filter(|decl| decl.is_included())
        .filter_map(|decl: &MemberDecl| {
            let setter = decl.setter.clone()?;
            Some((decl, setter))
        })
        .enumerate()
        .map(|(ordinal, (decl, setter))| MemberAccess {
            name: decl.name,
            ty: decl.ty,
            source: decl.source,
            ordinal,
            getter: Arc::clone(&decl.getter),
            setter,
        })
        .collect();

    Ok(MemberList {
        type_name: key.name(),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{BinType, TypeInfo, TypeKind};
    use crate::record::{Member, Record};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Default, PartialEq)]
    struct Mixed {
        a: u8,
        hidden: u16,
        b: String,
        computed: u32,
        slot: i64,
        skipped_slot: i64,
    }

    impl BinType for Mixed {
        fn type_info() -> TypeInfo {
            Record::<Self>::new()
                .member(Member::field("slot", |m: &Mixed| &m.slot, |m: &mut Mixed, v| m.slot = v).serialized())
                .member(Member::property("a", |m: &Mixed| &m.a, |m: &mut Mixed, v| m.a = v))
                .member(
                    Member::property("hidden", |m: &Mixed| &m.hidden, |m: &mut Mixed, v| {
                        m.hidden = v;
                    })
                    .not_serialized(),
                )
                .member(Member::read_only("computed", |m: &Mixed| &m.computed))
                .member(Member::property("b", |m: &Mixed| &m.b, |m: &mut Mixed, v| m.b = v))
                .member(Member::field("skipped_slot", |m: &Mixed| &m.skipped_slot, |m: &mut Mixed, v| {
                    m.skipped_slot = v;
                }))
                .into_type_info()
        }
    }

    fn record_of(info: &TypeInfo) -> &RecordInfo {
        match info.kind() {
            TypeKind::Record(record) => record,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn properties_then_opted_in_fields() {
        let info = Mixed::type_info();
        let list = members_of(info.key(), record_of(&info)).unwrap();
        assert_eq!(list.names(), vec!["a", "b", "slot"]);
        let ordinals: Vec<usize> = list.iter().map(MemberAccess::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(list.get(2).unwrap().source(), MemberSource::Field);
    }

    #[test]
    fn accessors_read_and_write() {
        let info = Mixed::type_info();
        let list = members_of(info.key(), record_of(&info)).unwrap();
        let mut value = Mixed::default();
        let b = list.get(1).unwrap();
        assert!(b.set(&mut value, Box::new("hi".to_string())));
        assert_eq!(value.b, "hi");
        assert_eq!(
            b.get(&value).unwrap().downcast_ref::<String>().unwrap(),
            "hi"
        );
    }

    #[test]
    fn repeated_calls_share_one_list() {
        let info = Mixed::type_info();
        let first = members_of(info.key(), record_of(&info)).unwrap();
        let second = members_of(info.key(), record_of(&info)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    static GROW: AtomicBool = AtomicBool::new(false);

    #[derive(Debug, Default)]
    struct Shifting {
        x: u8,
        y: u8,
    }

    impl BinType for Shifting {
        fn type_info() -> TypeInfo {
            let record = Record::<Self>::new()
                .member(Member::property("x", |s: &Shifting| &s.x, |s: &mut Shifting, v| s.x = v));
            if GROW.load(Ordering::SeqCst) {
                record
                    .member(Member::property("y", |s: &Shifting| &s.y, |s: &mut Shifting, v| s.y = v))
                    .into_type_info()
            } else {
                record.into_type_info()
            }
        }
    }

    #[test]
    fn member_list_is_frozen_after_first_capture() {
        let before = Shifting::type_info();
        let first = members_of(before.key(), record_of(&before)).unwrap();
        assert_eq!(first.names(), vec!["x"]);

        GROW.store(true, Ordering::SeqCst);
        let after = Shifting::type_info();
        assert_eq!(record_of(&after).declared_len(), 2);
        let second = members_of(after.key(), record_of(&after)).unwrap();
        assert_eq!(second.names(), vec!["x"]);
    }

    #[derive(Debug, Default)]
    struct Twice {
        a: u8,
    }

    impl BinType for Twice {
        fn type_info() -> TypeInfo {
            Record::<Self>::new()
                .member(Member::property("a", |t: &Twice| &t.a, |t: &mut Twice, v| t.a = v))
                .member(Member::read_only("a", |t: &Twice| &t.a))
                .into_type_info()
        }
    }

    #[test]
    fn duplicate_names_are_rejected_and_not_cached() {
        let info = Twice::type_info();
        for _ in 0..2 {
            let err = members_of(info.key(), record_of(&info)).unwrap_err();
            assert_eq!(
                err,
                ShapeError::DuplicateMember {
                    type_name: info.type_name(),
                    member: "a",
                }
            );
        }
        assert!(!member_cache().contains_key(&info.key()));
    }
}
