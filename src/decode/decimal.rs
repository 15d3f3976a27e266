//! Exact conversion between the engine's arbitrary-precision decimal and the
//! fixed 96-bit decimal.
//!
//! A fixed decimal is a sign, a 96-bit unscaled magnitude stored as three
//! 32-bit words, and a scale in [0, 28]:
//!
//! ```text
//!  16-byte big-endian buffer
//!  [ 0 .. 4 ]  must be zero (magnitude <= 96 bits)
//!  [ 4 .. 8 ]  hi
//!  [ 8 .. 12]  mid
//!  [12 .. 16]  lo
//! ```
//!
//! Values that are not exactly representable are rejected, never rounded.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use rust_decimal::Decimal;

use crate::engine::constants::{FIXED_DECIMAL_MAX_BITS, FIXED_DECIMAL_MAX_SCALE};
use crate::error::{Error, Result};

/// Arbitrary-precision decimal as the engine hands it over:
/// `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeDecimal {
    pub unscaled: BigInt,
    pub scale: i32,
}

impl NativeDecimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }
}

impl FromStr for NativeDecimal {
    type Err = Error;

    /// Parse plain or exponent notation: `-12.50`, `1E+3`, `.5`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_argument(format!("invalid decimal literal: {:?}", s));
        let s = s.trim();

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(idx) => {
                let exp = s[idx + 1..].parse::<i32>().map_err(|_| invalid())?;
                (&s[..idx], exp)
            }
            None => (s, 0),
        };

        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };

        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut all_digits = String::with_capacity(int_part.len() + frac_part.len() + 1);
        if negative {
            all_digits.push('-');
        }
        all_digits.push_str(int_part);
        all_digits.push_str(frac_part);

        let unscaled = all_digits.parse::<BigInt>().map_err(|_| invalid())?;
        let frac_len = i32::try_from(frac_part.len()).map_err(|_| invalid())?;
        let scale = frac_len.checked_sub(exponent).ok_or_else(invalid)?;

        Ok(Self { unscaled, scale })
    }
}

impl fmt::Display for NativeDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        if self.is_negative() {
            f.write_str("-")?;
        }

        if self.scale <= 0 {
            f.write_str(&digits)?;
            if digits != "0" {
                for _ in 0..self.scale.unsigned_abs() {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

/// Convert an engine decimal into a fixed 96-bit decimal.
///
/// # Errors
/// Returns `Error::Overflow` if the magnitude needs more than 96 bits or the
/// scale lies outside [0, 28].
pub fn to_fixed(value: &NativeDecimal) -> Result<Decimal> {
    let magnitude = value.unscaled.magnitude();
    if magnitude.bits() > FIXED_DECIMAL_MAX_BITS {
        return Err(Error::overflow(format!(
            "decimal magnitude of {} bits exceeds {} bits",
            magnitude.bits(),
            FIXED_DECIMAL_MAX_BITS
        )));
    }
    if value.scale < 0 || value.scale as u32 > FIXED_DECIMAL_MAX_SCALE {
        return Err(Error::overflow(format!(
            "decimal scale {} outside [0, {}]",
            value.scale, FIXED_DECIMAL_MAX_SCALE
        )));
    }

    let be = magnitude.to_bytes_be();
    let mut buf = [0u8; 16];
    buf[16 - be.len()..].copy_from_slice(&be);

    let hi = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let mid = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
    let lo = u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]);

    Ok(Decimal::from_parts(
        lo,
        mid,
        hi,
        value.is_negative(),
        value.scale as u32,
    ))
}

/// Convert a fixed decimal back into the engine representation. Exact.
pub fn from_fixed(value: Decimal) -> NativeDecimal {
    NativeDecimal {
        unscaled: BigInt::from(value.mantissa()),
        scale: value.scale() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> NativeDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_negative_integer() {
        let fixed = to_fixed(&NativeDecimal::new(-65535, 0)).unwrap();
        assert_eq!(fixed, Decimal::from(-65535));
        assert!(fixed.is_sign_negative());
        assert_eq!(fixed.scale(), 0);
    }

    #[test]
    fn test_word_layout() {
        // 2^64 + 2^32 + 1 -> hi=1, mid=1, lo=1
        let one = BigInt::from(1u8);
        let unscaled = (&one << 64u32) + (&one << 32u32) + &one;
        let fixed = to_fixed(&NativeDecimal::new(unscaled, 3)).unwrap();
        let unpacked = fixed.unpack();
        assert_eq!((unpacked.hi, unpacked.mid, unpacked.lo), (1, 1, 1));
        assert_eq!(fixed.scale(), 3);
        assert!(!fixed.is_sign_negative());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let max_96 = (BigInt::from(1u8) << 96u32) - BigInt::from(1u8);
        let values = [
            NativeDecimal::new(0, 0),
            NativeDecimal::new(1, 28),
            NativeDecimal::new(-1, 28),
            NativeDecimal::new(123_456_789, 4),
            NativeDecimal::new(max_96.clone(), 0),
            NativeDecimal::new(-max_96, 10),
            dec("-1281281281231"),
            dec("3.14159265358979323846264338"),
        ];
        for value in values {
            let fixed = to_fixed(&value).unwrap();
            assert_eq!(from_fixed(fixed), value, "round trip of {}", value);
        }
    }

    #[test]
    fn test_magnitude_over_96_bits_overflows() {
        let value = NativeDecimal::new(BigInt::from(1u8) << 100u32, 0);
        assert!(matches!(to_fixed(&value), Err(Error::Overflow { .. })));

        let value = NativeDecimal::new(BigInt::from(1u8) << 96u32, 0);
        assert!(matches!(to_fixed(&value), Err(Error::Overflow { .. })));
    }

    #[test]
    fn test_scale_bounds() {
        assert!(to_fixed(&NativeDecimal::new(1, 28)).is_ok());
        assert!(matches!(
            to_fixed(&NativeDecimal::new(1, 29)),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            to_fixed(&NativeDecimal::new(1, -1)),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(dec("-12.50"), NativeDecimal::new(-1250, 2));
        assert_eq!(dec("1E+3"), NativeDecimal::new(1, -3));
        assert_eq!(dec(".5"), NativeDecimal::new(5, 1));
        assert_eq!(dec("+7"), NativeDecimal::new(7, 0));
        assert!("".parse::<NativeDecimal>().is_err());
        assert!("1.2.3".parse::<NativeDecimal>().is_err());
        assert!("abc".parse::<NativeDecimal>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(NativeDecimal::new(-1250, 2).to_string(), "-12.50");
        assert_eq!(NativeDecimal::new(5, 3).to_string(), "0.005");
        assert_eq!(NativeDecimal::new(1, -3).to_string(), "1000");
        assert_eq!(NativeDecimal::new(0, 0).to_string(), "0");
    }
}
