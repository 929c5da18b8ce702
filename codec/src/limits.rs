//! Limits for decoding.

/// Limits enforced while decoding untrusted input.
///
/// Each limit is checked against the decoded length prefix before anything
/// is allocated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum element count of one sequence.
    pub max_sequence_len: usize,
    /// Maximum byte length of one string.
    pub max_string_bytes: usize,
    /// Maximum byte length of one byte blob.
    pub max_blob_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_sequence_len: 1 << 20,
            max_string_bytes: 16 * 1024 * 1024,
            max_blob_bytes: 64 * 1024 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_sequence_len: 64,
            max_string_bytes: 256,
            max_blob_bytes: 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_sequence_len: usize::MAX,
            max_string_bytes: usize::MAX,
            max_blob_bytes: usize::MAX,
        }
    }
}
