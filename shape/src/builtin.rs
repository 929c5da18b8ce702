//! [`BinType`] implementations for standard library types.

use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};

use bytestream::Decimal;

use crate::info::{BinType, SequenceLike, TupleLike, TypeInfo, TypeKind, TypeRef};
use crate::key::TypeKey;

macro_rules! primitive_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl BinType for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::primitive::<Self>()
                }
            }
        )+
    };
}

primitive_types!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, bool, char, Decimal);

impl BinType for String {
    fn type_info() -> TypeInfo {
        TypeInfo::new(TypeKey::of::<Self>(), TypeKind::String)
    }
}

macro_rules! tuple_types {
    ($( ($($name:ident . $idx:tt),+) )+) => {
        $(
            impl<$($name: BinType),+> TupleLike for ($($name,)+) {
                fn element_types() -> Vec<TypeRef> {
                    vec![$(TypeRef::of::<$name>()),+]
                }

                fn element(&self, index: usize) -> Option<&dyn Any> {
                    match index {
                        $($idx => Some(&self.$idx as &dyn Any),)+
                        _ => None,
                    }
                }

                fn assemble(parts: Vec<Box<dyn Any>>) -> Option<Self> {
                    let mut parts = parts.into_iter();
                    let tuple = ($(*parts.next()?.downcast::<$name>().ok()?,)+);
                    if parts.next().is_some() {
                        return None;
                    }
                    Some(tuple)
                }
            }

            impl<$($name: BinType),+> BinType for ($($name,)+) {
                fn type_info() -> TypeInfo {
                    TypeInfo::tuple::<Self>()
                }
            }

            impl<$($name: BinType),+> BinType for Box<($($name,)+)> {
                fn type_info() -> TypeInfo {
                    TypeInfo::boxed_tuple::<($($name,)+)>()
                }
            }
        )+
    };
}

tuple_types! {
    (A.0)
    (A.0, B.1)
    (A.0, B.1, C.2)
    (A.0, B.1, C.2, D.3)
    (A.0, B.1, C.2, D.3, E.4)
    (A.0, B.1, C.2, D.3, E.4, F.5)
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6)
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7)
}

impl<T: BinType> SequenceLike for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }
}

impl<T: BinType> BinType for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self>()
    }
}

impl<T: BinType> SequenceLike for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn with_capacity(capacity: usize) -> Self {
        VecDeque::with_capacity(capacity)
    }

    fn push(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: BinType> BinType for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self>()
    }
}

impl<T: BinType> BinType for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::optional::<T>()
    }
}

impl<K: BinType, V: BinType, S: 'static> BinType for HashMap<K, V, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::map::<Self, K, V>()
    }
}

impl<K: BinType, V: BinType> BinType for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::map::<Self, K, V>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::TupleInfo;
    use bytestream::PrimitiveKind;

    #[test]
    fn primitives_report_their_kind() {
        assert!(matches!(
            i8::type_info().kind(),
            TypeKind::Primitive(PrimitiveKind::I8)
        ));
        assert!(matches!(
            Decimal::type_info().kind(),
            TypeKind::Primitive(PrimitiveKind::Decimal)
        ));
        assert!(matches!(
            char::type_info().kind(),
            TypeKind::Primitive(PrimitiveKind::Char)
        ));
    }

    #[test]
    fn tuple_access_and_assembly() {
        let info = <(u8, String)>::type_info();
        let TypeKind::Tuple(tuple) = info.kind() else {
            panic!("expected tuple");
        };
        assert!(!tuple.by_ref());
        assert_eq!(tuple.elements().len(), 2);

        let value = (3u8, "x".to_string());
        let second = tuple.element(&value, 1).unwrap();
        assert_eq!(second.downcast_ref::<String>().unwrap(), "x");
        assert!(tuple.element(&value, 2).is_none());

        let parts: Vec<Box<dyn Any>> = vec![Box::new(4u8), Box::new("y".to_string())];
        let rebuilt = tuple.assemble(parts).unwrap();
        assert_eq!(
            *rebuilt.downcast::<(u8, String)>().unwrap(),
            (4, "y".to_string())
        );
    }

    #[test]
    fn tuple_assembly_rejects_wrong_parts() {
        let info = TupleInfo::of::<(u8, u16)>();
        let wrong: Vec<Box<dyn Any>> = vec![Box::new(1u16), Box::new(2u16)];
        assert!(info.assemble(wrong).is_none());
        let extra: Vec<Box<dyn Any>> = vec![Box::new(1u8), Box::new(2u16), Box::new(3u8)];
        assert!(info.assemble(extra).is_none());
        let short: Vec<Box<dyn Any>> = vec![Box::new(1u8)];
        assert!(info.assemble(short).is_none());
    }

    #[test]
    fn boxed_tuples_are_by_ref() {
        let info = <Box<(i32, bool)>>::type_info();
        assert_eq!(info.key(), TypeKey::of::<Box<(i32, bool)>>());
        let TypeKind::Tuple(tuple) = info.kind() else {
            panic!("expected tuple");
        };
        assert!(tuple.by_ref());

        let value: Box<(i32, bool)> = Box::new((5, true));
        let first = tuple.element(&value, 0).unwrap();
        assert_eq!(first.downcast_ref::<i32>(), Some(&5));

        let parts: Vec<Box<dyn Any>> = vec![Box::new(6i32), Box::new(false)];
        let rebuilt = tuple.assemble(parts).unwrap();
        assert_eq!(*rebuilt.downcast::<Box<(i32, bool)>>().unwrap(), Box::new((6, false)));
    }

    #[test]
    fn sequences_grow_through_erased_push() {
        for info in [Vec::<u16>::type_info(), VecDeque::<u16>::type_info()] {
            let TypeKind::Sequence(seq) = info.kind() else {
                panic!("expected sequence");
            };
            assert_eq!(seq.element().key(), TypeKey::of::<u16>());

            let mut built = seq.with_capacity(2);
            assert!(seq.push(built.as_mut(), Box::new(1u16)));
            assert!(seq.push(built.as_mut(), Box::new(2u16)));
            assert!(!seq.push(built.as_mut(), Box::new(3u8)));
            assert_eq!(seq.len(built.as_ref()), Some(2));
            let second = seq.item(built.as_ref(), 1).unwrap();
            assert_eq!(second.downcast_ref::<u16>(), Some(&2));
        }
    }

    #[test]
    fn maps_are_described_as_maps() {
        let info = HashMap::<String, u32>::type_info();
        let TypeKind::Map { key, value } = info.kind() else {
            panic!("expected map");
        };
        assert_eq!(key.key(), TypeKey::of::<String>());
        assert_eq!(value.key(), TypeKey::of::<u32>());
        assert!(matches!(
            BTreeMap::<u8, u8>::type_info().kind(),
            TypeKind::Map { .. }
        ));
    }
}
