//! Shape classification errors.

use std::fmt;

/// Result type for shape operations.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Why a type has no codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The type declares no encodable structure.
    Unclassified,
    /// Maps and other key/value containers.
    AssociativeContainer,
    /// A sequence whose element type cannot be recovered.
    UntypedSequence,
    /// The type contains itself, directly or through other types.
    RecursiveType,
    /// A record declares two members with the same name.
    DuplicateMember { member: &'static str },
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified => f.write_str("no encodable shape"),
            Self::AssociativeContainer => f.write_str("associative containers are not supported"),
            Self::UntypedSequence => f.write_str("sequence element type is unknown"),
            Self::RecursiveType => f.write_str("recursive types are not supported"),
            Self::DuplicateMember { member } => write!(f, "member '{member}' is declared twice"),
        }
    }
}

/// Errors that can occur while classifying a type or capturing its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// No shape applies to the type.
    Unsupported {
        type_name: &'static str,
        reason: UnsupportedReason,
    },

    /// Two members of one record share a name.
    DuplicateMember {
        type_name: &'static str,
        member: &'static str,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { type_name, reason } => {
                write!(f, "type {type_name} is unsupported: {reason}")
            }
            Self::DuplicateMember { type_name, member } => {
                write!(f, "type {type_name} declares member '{member}' twice")
            }
        }
    }
}

impl std::error::Error for ShapeError {}
