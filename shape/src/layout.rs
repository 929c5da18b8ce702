//! Wire layout descriptions and structural fingerprints.

use std::fmt;

use blake3::Hasher;
use bytestream::{IntegerKind, PrimitiveKind};

/// The wire layout of one type, including everything it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum Layout {
    Primitive {
        kind: PrimitiveKind,
    },
    Enum {
        name: &'static str,
        repr: IntegerKind,
    },
    String,
    Tuple {
        by_ref: bool,
        elements: Vec<Layout>,
    },
    ByteBlob,
    Sequence {
        element: Box<Layout>,
    },
    /// A discriminator byte followed by the inner layout.
    Optional {
        inner: Box<Layout>,
    },
    Record {
        name: &'static str,
        members: Vec<MemberLayout>,
    },
}

/// One encoded record member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemberLayout {
    pub name: &'static str,
    pub ordinal: usize,
    pub layout: Layout,
}

impl Layout {
    /// Returns `true` if the layout starts with a presence byte.
    #[must_use]
    pub const fn is_presence_wrapped(&self) -> bool {
        match self {
            Self::String | Self::ByteBlob | Self::Sequence { .. } | Self::Record { .. } => true,
            Self::Tuple { by_ref, .. } => *by_ref,
            Self::Primitive { .. } | Self::Enum { .. } | Self::Optional { .. } => false,
        }
    }

    /// Returns the encoded size if it is the same for every value.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Primitive { kind } => Some(kind.size()),
            Self::Enum { repr, .. } => Some(repr.size()),
            Self::Tuple {
                by_ref: false,
                elements,
            } => elements.iter().map(Self::fixed_size).sum(),
            _ => None,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self, 0)
    }
}

fn write_tree(f: &mut fmt::Formatter<'_>, layout: &Layout, depth: usize) -> fmt::Result {
    let pad = depth * 2;
    match layout {
        Layout::Primitive { kind } => writeln!(f, "{:pad$}{}", "", kind.name()),
        Layout::Enum { name, repr } => {
            writeln!(f, "{:pad$}enum {name} as {}", "", repr.primitive().name())
        }
        Layout::String => writeln!(f, "{:pad$}string", ""),
        Layout::ByteBlob => writeln!(f, "{:pad$}bytes", ""),
        Layout::Tuple { by_ref, elements } => {
            let label = if *by_ref { "tuple (ref)" } else { "tuple" };
            writeln!(f, "{:pad$}{label}", "")?;
            for element in elements {
                write_tree(f, element, depth + 1)?;
            }
            Ok(())
        }
        Layout::Sequence { element } => {
            writeln!(f, "{:pad$}sequence", "")?;
            write_tree(f, element, depth + 1)
        }
        Layout::Optional { inner } => {
            writeln!(f, "{:pad$}optional", "")?;
            write_tree(f, inner, depth + 1)
        }
        Layout::Record { name, members } => {
            writeln!(f, "{:pad$}record {name}", "")?;
            for member in members {
                writeln!(f, "{:width$}[{}] {}:", "", member.ordinal, member.name, width = pad + 2)?;
                write_tree(f, &member.layout, depth + 2)?;
            }
            Ok(())
        }
    }
}

/// Computes a deterministic hash of a layout's structure.
///
/// Type and member names are ignored: equal fingerprints mean the encodings
/// are interchangeable.
#[must_use]
pub fn layout_hash(layout: &Layout) -> u64 {
    let mut hasher = Hasher::new();
    write_layout(&mut hasher, layout);
    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(head)
}

fn write_layout(hasher: &mut Hasher, layout: &Layout) {
    match layout {
        Layout::Primitive { kind } => {
            write_u8(hasher, 0);
            write_u8(hasher, primitive_tag(*kind));
        }
        Layout::Enum { repr, .. } => {
            write_u8(hasher, 1);
            write_u8(hasher, primitive_tag(repr.primitive()));
        }
        Layout::String => {
            write_u8(hasher, 2);
        }
        Layout::Tuple { by_ref, elements } => {
            write_u8(hasher, 3);
            write_u8(hasher, u8::from(*by_ref));
            write_len(hasher, elements.len());
            for element in elements {
                write_layout(hasher, element);
            }
        }
        Layout::ByteBlob => {
            write_u8(hasher, 4);
        }
        Layout::Sequence { element } => {
            write_u8(hasher, 5);
            write_layout(hasher, element);
        }
        Layout::Optional { inner } => {
            write_u8(hasher, 6);
            write_layout(hasher, inner);
        }
        Layout::Record { members, .. } => {
            write_u8(hasher, 7);
            write_len(hasher, members.len());
            for member in members {
                write_layout(hasher, &member.layout);
            }
        }
    }
}

const fn primitive_tag(kind: PrimitiveKind) -> u8 {
    match kind {
        PrimitiveKind::I8 => 0,
        PrimitiveKind::U8 => 1,
        PrimitiveKind::I16 => 2,
        PrimitiveKind::U16 => 3,
        PrimitiveKind::I32 => 4,
        PrimitiveKind::U32 => 5,
        PrimitiveKind::I64 => 6,
        PrimitiveKind::U64 => 7,
        PrimitiveKind::F32 => 8,
        PrimitiveKind::F64 => 9,
        PrimitiveKind::Bool => 10,
        PrimitiveKind::Char => 11,
        PrimitiveKind::Decimal => 12,
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}
