//! 128-bit decimal leaf value.

use std::fmt;

use crate::error::{StreamError, StreamResult};

const SCALE_SHIFT: u32 = 16;
const SCALE_MASK: u32 = 0x00FF_0000;
const SIGN_MASK: u32 = 0x8000_0000;
const MANTISSA_LIMIT: u128 = 1 << 96;

/// A decimal number: 96-bit unsigned mantissa, power-of-ten scale and sign.
///
/// The value is `(-1)^sign * mantissa / 10^scale`. The bit layout mirrors the
/// common 128-bit decimal format: a flags word holding the scale in bits
/// 16..24 and the sign in bit 31, followed by the `hi`, `lo` and `mid` words
/// of the mantissa. Equality is bitwise, so `1.0` and `1.00` differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    flags: u32,
    hi: u32,
    lo: u32,
    mid: u32,
}

impl Decimal {
    /// Largest supported scale.
    pub const MAX_SCALE: u8 = 28;

    /// Zero with scale 0.
    pub const ZERO: Self = Self {
        flags: 0,
        hi: 0,
        lo: 0,
        mid: 0,
    };

    /// Creates a decimal from a mantissa below `2^96`, a scale and a sign.
    ///
    /// Returns `None` if the mantissa or scale is out of range.
    #[must_use]
    pub const fn new(mantissa: u128, scale: u8, negative: bool) -> Option<Self> {
        if mantissa >= MANTISSA_LIMIT || scale > Self::MAX_SCALE {
            return None;
        }
        Some(Self {
            flags: flags_for(scale, negative),
            hi: (mantissa >> 64) as u32,
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
        })
    }

    /// Creates a decimal from its three mantissa words, sign and scale.
    #[must_use]
    pub const fn from_parts(lo: u32, mid: u32, hi: u32, negative: bool, scale: u8) -> Option<Self> {
        if scale > Self::MAX_SCALE {
            return None;
        }
        Some(Self {
            flags: flags_for(scale, negative),
            hi,
            lo,
            mid,
        })
    }

    /// Creates an integral decimal.
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        let mantissa = value.unsigned_abs();
        Self {
            flags: flags_for(0, value < 0),
            hi: 0,
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
        }
    }

    /// Returns the 96-bit mantissa.
    #[must_use]
    pub const fn mantissa(self) -> u128 {
        ((self.hi as u128) << 64) | ((self.mid as u128) << 32) | self.lo as u128
    }

    /// Returns the power-of-ten scale.
    #[must_use]
    pub const fn scale(self) -> u8 {
        ((self.flags & SCALE_MASK) >> SCALE_SHIFT) as u8
    }

    /// Returns `true` if the sign bit is set (including negative zero).
    #[must_use]
    pub const fn is_sign_negative(self) -> bool {
        self.flags & SIGN_MASK != 0
    }

    /// Returns the words in wire order: `flags, hi, lo, mid`.
    #[must_use]
    pub const fn to_words(self) -> [u32; 4] {
        [self.flags, self.hi, self.lo, self.mid]
    }

    /// Rebuilds a decimal from words in wire order, validating the flags word.
    pub const fn from_words(words: [u32; 4]) -> StreamResult<Self> {
        let flags = words[0];
        let scale = (flags & SCALE_MASK) >> SCALE_SHIFT;
        if flags & !(SCALE_MASK | SIGN_MASK) != 0 || scale > Self::MAX_SCALE as u32 {
            return Err(StreamError::InvalidDecimal { flags });
        }
        Ok(Self {
            flags,
            hi: words[1],
            lo: words[2],
            mid: words[3],
        })
    }
}

const fn flags_for(scale: u8, negative: bool) -> u32 {
    let sign = if negative { SIGN_MASK } else { 0 };
    sign | ((scale as u32) << SCALE_SHIFT)
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa().to_string();
        let scale = usize::from(self.scale());
        let body = if scale == 0 {
            digits
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            format!("{int}.{frac}")
        } else {
            format!("0.{digits:0>scale$}")
        };
        if self.is_sign_negative() {
            write!(f, "-{body}")
        } else {
            f.write_str(&body)
        }
    }
}
