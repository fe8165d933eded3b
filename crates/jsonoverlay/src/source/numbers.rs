//! Numeric conversions over raw literal bytes.
//!
//! Integers are accumulated digit by digit. Floating point literals with a
//! short mantissa and a small decimal exponent are computed exactly from an
//! integer mantissa and a power of ten; everything else falls back to the
//! correctly rounded parser in `core`.

use core::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

pub(crate) const MAX_INT: &[u8] = b"2147483647";
pub(crate) const MIN_INT: &[u8] = b"-2147483648";
pub(crate) const MAX_LONG: &[u8] = b"9223372036854775807";
pub(crate) const MIN_LONG: &[u8] = b"-9223372036854775808";

/// Powers of ten that are exactly representable as `f64`.
const POW10_F64: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Powers of ten that are exactly representable as `f32`.
const POW10_F32: [f32; 11] = [1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10];

const F64_FAST_DIGITS: usize = 15;
const F32_FAST_DIGITS: usize = 7;

/// Whether an integer literal fits between the `min` and `max` boundary
/// literals.
///
/// Shorter literals always fit and longer ones never do; equal lengths compare
/// byte-wise, which for ASCII digits is numeric order.
pub(crate) fn fits(digits: &[u8], min: &[u8], max: &[u8]) -> bool {
    let bound = if digits.first() == Some(&b'-') { min } else { max };
    match digits.len().cmp(&bound.len()) {
        core::cmp::Ordering::Less => true,
        core::cmp::Ordering::Greater => false,
        core::cmp::Ordering::Equal => digits <= bound,
    }
}

/// Whether `digits` is an optionally signed run of digits.
pub(crate) fn is_plain_integer(digits: &[u8]) -> bool {
    let body = match digits.first() {
        Some(b'-' | b'+') => &digits[1..],
        _ => digits,
    };
    !body.is_empty() && body.iter().all(u8::is_ascii_digit)
}

macro_rules! accumulate {
    ($name:ident, $ty:ty) => {
        /// Accumulates an optionally signed digit run, wrapping on overflow.
        ///
        /// Negative literals accumulate downward so the minimum value is exact.
        /// On failure returns the offset of the offending byte.
        pub(crate) fn $name(digits: &[u8]) -> Result<$ty, usize> {
            let (negative, first) = match digits.first() {
                Some(b'-') => (true, 1),
                Some(b'+') => (false, 1),
                _ => (false, 0),
            };
            if digits.len() == first {
                return Err(first);
            }

            let mut num: $ty = 0;
            for (offset, &b) in digits.iter().enumerate().skip(first) {
                if !b.is_ascii_digit() {
                    return Err(offset);
                }
                let digit = <$ty>::from(b - b'0');
                num = num.wrapping_mul(10);
                num = if negative {
                    num.wrapping_sub(digit)
                } else {
                    num.wrapping_add(digit)
                };
            }
            Ok(num)
        }
    };
}

accumulate!(parse_i32, i32);
accumulate!(parse_i64, i64);

/// A decimal literal split into sign, integer mantissa and power of ten.
struct Decomposed {
    negative: bool,
    mantissa: u64,
    exponent: i32,
}

impl Decomposed {
    /// Splits `lit`, giving up when it has more than `max_digits` significant
    /// digits or is not a well-formed literal.
    fn read(lit: &[u8], max_digits: usize) -> Option<Self> {
        let mut i = 0;
        let negative = match lit.first() {
            Some(b'-') => {
                i = 1;
                true
            }
            Some(b'+') => {
                i = 1;
                false
            }
            _ => false,
        };

        let mut mantissa: u64 = 0;
        let mut significant = 0usize;
        let mut digits_seen = 0usize;
        let mut fraction_digits = 0i32;
        let mut in_fraction = false;

        while let Some(&b) = lit.get(i) {
            match b {
                b'0'..=b'9' => {
                    digits_seen += 1;
                    if mantissa != 0 || b != b'0' {
                        significant += 1;
                        if significant > max_digits {
                            return None;
                        }
                    }
                    mantissa = mantissa * 10 + u64::from(b - b'0');
                    if in_fraction {
                        fraction_digits += 1;
                    }
                }
                b'.' if !in_fraction => in_fraction = true,
                b'e' | b'E' => break,
                _ => return None,
            }
            i += 1;
        }
        if digits_seen == 0 {
            return None;
        }

        let mut exponent = 0i32;
        if matches!(lit.get(i), Some(b'e' | b'E')) {
            i += 1;
            let exp_negative = match lit.get(i) {
                Some(b'-') => {
                    i += 1;
                    true
                }
                Some(b'+') => {
                    i += 1;
                    false
                }
                _ => false,
            };
            let exp_digits = lit.get(i..)?;
            // Anything this long is far outside the fast path anyway.
            if exp_digits.is_empty() || exp_digits.len() > 4 {
                return None;
            }
            for &b in exp_digits {
                if !b.is_ascii_digit() {
                    return None;
                }
                exponent = exponent * 10 + i32::from(b - b'0');
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        Some(Self {
            negative,
            mantissa,
            exponent: exponent - fraction_digits,
        })
    }
}

/// Parses a literal as `f64`.
pub(crate) fn parse_f64(lit: &[u8]) -> Option<f64> {
    fast_f64(lit).or_else(|| core::str::from_utf8(lit).ok()?.parse().ok())
}

// The mantissa has at most 15 digits, so it is below 2^53 and converts exactly.
#[allow(clippy::cast_precision_loss)]
fn fast_f64(lit: &[u8]) -> Option<f64> {
    let parts = Decomposed::read(lit, F64_FAST_DIGITS)?;
    let scale = *POW10_F64.get(usize::try_from(parts.exponent.unsigned_abs()).ok()?)?;
    let mantissa = parts.mantissa as f64;
    let value = if parts.exponent < 0 {
        mantissa / scale
    } else {
        mantissa * scale
    };
    Some(if parts.negative { -value } else { value })
}

/// Parses a literal as `f32`.
pub(crate) fn parse_f32(lit: &[u8]) -> Option<f32> {
    fast_f32(lit).or_else(|| core::str::from_utf8(lit).ok()?.parse().ok())
}

// At most 7 digits, below 2^24.
#[allow(clippy::cast_precision_loss)]
fn fast_f32(lit: &[u8]) -> Option<f32> {
    let parts = Decomposed::read(lit, F32_FAST_DIGITS)?;
    let scale = *POW10_F32.get(usize::try_from(parts.exponent.unsigned_abs()).ok()?)?;
    let mantissa = parts.mantissa as f32;
    let value = if parts.exponent < 0 {
        mantissa / scale
    } else {
        mantissa * scale
    };
    Some(if parts.negative { -value } else { value })
}

pub(crate) fn parse_decimal(lit: &[u8]) -> Option<BigDecimal> {
    BigDecimal::from_str(core::str::from_utf8(lit).ok()?).ok()
}

/// Parses any literal as an integer, truncating fractional values toward zero.
pub(crate) fn parse_big_int(lit: &[u8]) -> Option<BigInt> {
    if is_plain_integer(lit) {
        let digits = lit.strip_prefix(b"+").unwrap_or(lit);
        return BigInt::parse_bytes(digits, 10);
    }
    let (int, _) = parse_decimal(lit)?.with_scale(0).into_bigint_and_exponent();
    Some(int)
}
