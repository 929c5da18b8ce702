use bytestream::{IntegerKind, PrimitiveKind};
use proptest::prelude::*;
use shape::{layout_hash, Layout, MemberLayout};

fn leaf_strategy() -> impl Strategy<Value = Layout> {
    prop_oneof![
        prop_oneof![
            Just(PrimitiveKind::I8),
            Just(PrimitiveKind::U16),
            Just(PrimitiveKind::I32),
            Just(PrimitiveKind::F64),
            Just(PrimitiveKind::Bool),
            Just(PrimitiveKind::Char),
            Just(PrimitiveKind::Decimal),
        ]
        .prop_map(|kind| Layout::Primitive { kind }),
        prop_oneof![Just(IntegerKind::U8), Just(IntegerKind::I64)]
            .prop_map(|repr| Layout::Enum { name: "E", repr }),
        Just(Layout::String),
        Just(Layout::ByteBlob),
    ]
}

fn layout_strategy() -> impl Strategy<Value = Layout> {
    leaf_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (any::<bool>(), prop::collection::vec(inner.clone(), 1..4))
                .prop_map(|(by_ref, elements)| Layout::Tuple { by_ref, elements }),
            inner.clone().prop_map(|element| Layout::Sequence {
                element: Box::new(element)
            }),
            inner.clone().prop_map(|inner| Layout::Optional {
                inner: Box::new(inner)
            }),
            prop::collection::vec(inner, 0..4).prop_map(|layouts| Layout::Record {
                name: "R",
                members: layouts
                    .into_iter()
                    .enumerate()
                    .map(|(ordinal, layout)| MemberLayout {
                        name: "m",
                        ordinal,
                        layout,
                    })
                    .collect(),
            }),
        ]
    })
}

fn rename(layout: &Layout) -> Layout {
    match layout {
        Layout::Enum { repr, .. } => Layout::Enum {
            name: "Renamed",
            repr: *repr,
        },
        Layout::Tuple { by_ref, elements } => Layout::Tuple {
            by_ref: *by_ref,
            elements: elements.iter().map(rename).collect(),
        },
        Layout::Sequence { element } => Layout::Sequence {
            element: Box::new(rename(element)),
        },
        Layout::Optional { inner } => Layout::Optional {
            inner: Box::new(rename(inner)),
        },
        Layout::Record { members, .. } => Layout::Record {
            name: "Renamed",
            members: members
                .iter()
                .map(|m| MemberLayout {
                    name: "other",
                    ordinal: m.ordinal,
                    layout: rename(&m.layout),
                })
                .collect(),
        },
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn prop_hash_ignores_names(layout in layout_strategy()) {
        prop_assert_eq!(layout_hash(&layout), layout_hash(&rename(&layout)));
    }

    #[test]
    fn prop_optional_wrapping_changes_hash(layout in layout_strategy()) {
        let wrapped = Layout::Optional { inner: Box::new(layout.clone()) };
        prop_assert_ne!(layout_hash(&layout), layout_hash(&wrapped));
    }

    #[test]
    fn prop_display_never_empty(layout in layout_strategy()) {
        prop_assert!(!layout.to_string().is_empty());
    }
}
