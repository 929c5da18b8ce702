//! Error types for codec operations.

use std::fmt;
use std::io;

use bytestream::StreamError;
use shape::{ShapeError, UnsupportedReason};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building a codec or encoding/decoding a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes were available than the current step requires.
    EndOfStream { requested: usize, available: usize },

    /// A byte sequence that no valid encoding produces.
    InvalidFormat { reason: FormatReason },

    /// No codec can be built for the type.
    UnsupportedType {
        type_name: &'static str,
        reason: UnsupportedReason,
    },

    /// A decoded value could not be assembled.
    ConstructionFailure {
        type_name: &'static str,
        reason: ConstructionReason,
    },

    /// A value cannot be encoded.
    InvalidValue {
        type_name: &'static str,
        reason: ValueReason,
    },

    /// Decode limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The underlying reader or writer failed.
    Io { kind: io::ErrorKind, message: String },
}

/// Details for invalid format errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatReason {
    InvalidPresence { value: u8 },
    InvalidBool { value: u8 },
    InvalidChar { unit: u16 },
    InvalidDecimal { flags: u32 },
    NegativeLength { raw: i32 },
    UnknownEnumValue { type_name: &'static str, bits: u64 },
    InvalidUtf8,
    TrailingBytes { remaining: usize },
}

/// Details for construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionReason {
    /// An absent value was decoded for a type without an empty value.
    NoEmptyValue,
    /// Decoded parts did not fit the type's factory.
    AssemblyFailed,
    /// A record member setter refused its value.
    MemberRejected { member: &'static str },
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    /// The value handed to the codec is not of the codec's type.
    TypeMismatch,
    /// A length does not fit the 32-bit length prefix.
    LengthOverflow { len: usize },
    /// A character needs more than one UTF-16 code unit.
    CharOutsideBmp { ch: char },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    SequenceLength,
    StringBytes,
    BlobBytes,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream {
                requested,
                available,
            } => {
                write!(
                    f,
                    "unexpected end of stream: need {requested} bytes, have {available}"
                )
            }
            Self::InvalidFormat { reason } => write!(f, "invalid format: {reason}"),
            Self::UnsupportedType { type_name, reason } => {
                write!(f, "unsupported type {type_name}: {reason}")
            }
            Self::ConstructionFailure { type_name, reason } => {
                write!(f, "cannot construct {type_name}: {reason}")
            }
            Self::InvalidValue { type_name, reason } => {
                write!(f, "invalid value for {type_name}: {reason}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Io { kind, message } => write!(f, "i/o error ({kind:?}): {message}"),
        }
    }
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPresence { value } => {
                write!(f, "presence byte 0x{value:02X} is neither 0 nor 1")
            }
            Self::InvalidBool { value } => write!(f, "boolean byte 0x{value:02X} is neither 0 nor 1"),
            Self::InvalidChar { unit } => write!(f, "lone surrogate 0x{unit:04X}"),
            Self::InvalidDecimal { flags } => write!(f, "decimal flags 0x{flags:08X}"),
            Self::NegativeLength { raw } => write!(f, "negative length {raw}"),
            Self::UnknownEnumValue { type_name, bits } => {
                write!(f, "value 0x{bits:X} is not declared by {type_name}")
            }
            Self::InvalidUtf8 => write!(f, "string bytes are not valid UTF-8"),
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} bytes left after the value")
            }
        }
    }
}

impl fmt::Display for ConstructionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEmptyValue => write!(f, "absent value decoded but the type has no empty value"),
            Self::AssemblyFailed => write!(f, "decoded parts do not match the type"),
            Self::MemberRejected { member } => write!(f, "member '{member}' rejected its value"),
        }
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "value has a different type"),
            Self::LengthOverflow { len } => {
                write!(f, "length {len} exceeds the 32-bit length prefix")
            }
            Self::CharOutsideBmp { ch } => {
                write!(
                    f,
                    "character U+{:04X} does not fit in one UTF-16 code unit",
                    u32::from(*ch)
                )
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SequenceLength => "sequence length",
            Self::StringBytes => "string bytes",
            Self::BlobBytes => "blob bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {}

impl From<StreamError> for CodecError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::EndOfStream {
                requested,
                available,
            } => Self::EndOfStream {
                requested,
                available,
            },
            StreamError::InvalidBool { value } => Self::InvalidFormat {
                reason: FormatReason::InvalidBool { value },
            },
            StreamError::InvalidChar { unit } => Self::InvalidFormat {
                reason: FormatReason::InvalidChar { unit },
            },
            StreamError::InvalidDecimal { flags } => Self::InvalidFormat {
                reason: FormatReason::InvalidDecimal { flags },
            },
            StreamError::NegativeLength { raw } => Self::InvalidFormat {
                reason: FormatReason::NegativeLength { raw },
            },
            StreamError::CharOutsideBmp { ch } => Self::InvalidValue {
                type_name: "char",
                reason: ValueReason::CharOutsideBmp { ch },
            },
            StreamError::LengthOverflow { len } => Self::InvalidValue {
                type_name: "length prefix",
                reason: ValueReason::LengthOverflow { len },
            },
            StreamError::Io { kind, message } => Self::Io { kind, message },
        }
    }
}

impl From<ShapeError> for CodecError {
    fn from(err: ShapeError) -> Self {
        match err {
            ShapeError::Unsupported { type_name, reason } => {
                Self::UnsupportedType { type_name, reason }
            }
            ShapeError::DuplicateMember { type_name, member } => Self::UnsupportedType {
                type_name,
                reason: UnsupportedReason::DuplicateMember { member },
            },
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        StreamError::from(err).into()
    }
}
