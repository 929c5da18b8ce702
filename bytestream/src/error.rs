//! Error types for byte stream operations.

use std::fmt;
use std::io;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while writing or reading fixed-width leaf values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Attempted to read past the end of the source.
    EndOfStream {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes that were available.
        available: usize,
    },

    /// A boolean byte was neither `0` nor `1`.
    InvalidBool { value: u8 },

    /// A UTF-16 code unit was a lone surrogate.
    InvalidChar { unit: u16 },

    /// A character cannot be written as a single UTF-16 code unit.
    CharOutsideBmp { ch: char },

    /// Decimal flags carry bits outside the sign and scale fields, or the scale exceeds 28.
    InvalidDecimal { flags: u32 },

    /// A length prefix decoded to a negative value.
    NegativeLength { raw: i32 },

    /// A length does not fit the 32-bit signed length prefix.
    LengthOverflow { len: usize },

    /// The underlying reader or writer failed.
    Io { kind: io::ErrorKind, message: String },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::InvalidBool { value } => {
                write!(f, "invalid boolean byte 0x{value:02X}")
            }
            Self::InvalidChar { unit } => {
                write!(f, "UTF-16 code unit 0x{unit:04X} is a lone surrogate")
            }
            Self::CharOutsideBmp { ch } => {
                write!(
                    f,
                    "character U+{:04X} does not fit in one UTF-16 code unit",
                    u32::from(*ch)
                )
            }
            Self::InvalidDecimal { flags } => {
                write!(f, "invalid decimal flags 0x{flags:08X}")
            }
            Self::NegativeLength { raw } => {
                write!(f, "negative length prefix {raw}")
            }
            Self::LengthOverflow { len } => {
                write!(f, "length {len} exceeds the 32-bit length prefix")
            }
            Self::Io { kind, message } => {
                write!(f, "i/o error ({kind:?}): {message}")
            }
        }
    }
}

impl std::error::Error for StreamError {}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_end_of_stream() {
        let err = StreamError::EndOfStream {
            requested: 4,
            available: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("4 bytes"), "should mention requested bytes");
        assert!(msg.contains("1 bytes"), "should mention available bytes");
        assert!(msg.contains("read"), "should mention read operation");
    }

    #[test]
    fn error_display_invalid_bool() {
        let err = StreamError::InvalidBool { value: 2 };
        assert!(err.to_string().contains("0x02"));
    }

    #[test]
    fn error_display_char_outside_bmp() {
        let err = StreamError::CharOutsideBmp { ch: '\u{1F600}' };
        assert!(err.to_string().contains("U+1F600"));
    }

    #[test]
    fn error_display_lengths() {
        let negative = StreamError::NegativeLength { raw: -1 };
        assert!(negative.to_string().contains("-1"));

        let overflow = StreamError::LengthOverflow { len: 1 << 40 };
        assert!(overflow.to_string().contains("32-bit"));
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err: StreamError = io_err.into();
        assert!(matches!(
            err,
            StreamError::Io {
                kind: io::ErrorKind::BrokenPipe,
                ..
            }
        ));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn error_equality() {
        let err1 = StreamError::InvalidChar { unit: 0xD800 };
        let err2 = StreamError::InvalidChar { unit: 0xD800 };
        let err3 = StreamError::InvalidChar { unit: 0xDC00 };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<StreamError>();
    }
}
