//! A 64-bit integer built from two 32-bit words.
//!
//! The arithmetic here works on 16-bit limbs with explicit carry
//! propagation, and division approximates the quotient with float
//! estimates that are corrected downward until the remainder fits. These
//! algorithms define the wire-relevant overflow semantics (for example
//! `MIN_VALUE / -1 == MIN_VALUE`), so they are not delegated to native
//! `i64` operations; `i64` and `f64` appear only at conversion boundaries.

use crate::errors::BvonError;
use failure::Error;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

const TWO_PWR_16_DBL: f64 = 65536.0;
const TWO_PWR_32_DBL: f64 = TWO_PWR_16_DBL * TWO_PWR_16_DBL;
const TWO_PWR_64_DBL: f64 = TWO_PWR_32_DBL * TWO_PWR_32_DBL;
const TWO_PWR_63_DBL: f64 = TWO_PWR_64_DBL / 2.0;

#[derive(Copy, Clone, Debug)]
/// Two's-complement 64-bit integer as a `(low, high)` word pair plus a
/// signed/unsigned interpretation flag.
///
/// The flag affects comparison, division, and text rendering but never the
/// raw bit pattern written to the wire. Values are immutable; every
/// operation returns a new instance.
///
/// # Example
///
/// ```
/// use bvon::Int64;
///
/// let a = Int64::from(40i64);
/// let b = Int64::from(2i64);
///
/// assert_eq!(a.add(b), Int64::from(42i64));
/// assert_eq!(a.to_string(), "40");
/// ```
pub struct Int64 {
    low: i32,
    high: i32,
    unsigned: bool,
}

impl Int64 {
    /// Signed zero.
    pub const ZERO: Int64 = Int64::new(0, 0, false);
    /// Unsigned zero.
    pub const UNSIGNED_ZERO: Int64 = Int64::new(0, 0, true);
    /// Signed one.
    pub const ONE: Int64 = Int64::new(1, 0, false);
    /// Unsigned one.
    pub const UNSIGNED_ONE: Int64 = Int64::new(1, 0, true);
    /// Signed negative one.
    pub const NEG_ONE: Int64 = Int64::new(-1, -1, false);
    /// Largest signed value, 2^63 - 1.
    pub const MAX_VALUE: Int64 = Int64::new(-1, 0x7fff_ffff, false);
    /// Largest unsigned value, 2^64 - 1.
    pub const MAX_UNSIGNED_VALUE: Int64 = Int64::new(-1, -1, true);
    /// Smallest signed value, -2^63.
    pub const MIN_VALUE: Int64 = Int64::new(0, -0x8000_0000, false);

    /// Builds a value from its raw word pair and interpretation flag.
    pub const fn new(low: i32, high: i32, unsigned: bool) -> Int64 {
        Int64 { low, high, unsigned }
    }

    /// Converts a float, rounding toward zero and clamping at the 64-bit
    /// range edges. `NaN` converts to zero.
    pub fn from_number(value: f64, unsigned: bool) -> Int64 {
        if value.is_nan() {
            return if unsigned { Int64::UNSIGNED_ZERO } else { Int64::ZERO };
        }

        if unsigned {
            if value < 0.0 {
                return Int64::UNSIGNED_ZERO;
            }
            if value >= TWO_PWR_64_DBL {
                return Int64::MAX_UNSIGNED_VALUE;
            }
        } else {
            if value <= -TWO_PWR_63_DBL {
                return Int64::MIN_VALUE;
            }
            if value + 1.0 >= TWO_PWR_63_DBL {
                return Int64::MAX_VALUE;
            }
        }

        if value < 0.0 {
            return Int64::from_number(-value, unsigned).negate();
        }

        Int64::new(
            ((value % TWO_PWR_32_DBL) as u32) as i32,
            ((value / TWO_PWR_32_DBL) as u32) as i32,
            unsigned,
        )
    }

    /// Reads a value from eight little-endian bytes: low word first.
    pub fn from_bytes_le(bytes: [u8; 8], unsigned: bool) -> Int64 {
        Int64::new(
            (bytes[0] as u32
                | (bytes[1] as u32) << 8
                | (bytes[2] as u32) << 16
                | (bytes[3] as u32) << 24) as i32,
            (bytes[4] as u32
                | (bytes[5] as u32) << 8
                | (bytes[6] as u32) << 16
                | (bytes[7] as u32) << 24) as i32,
            unsigned,
        )
    }

    /// Reads a value from eight big-endian bytes: high word first.
    pub fn from_bytes_be(bytes: [u8; 8], unsigned: bool) -> Int64 {
        Int64::new(
            ((bytes[4] as u32) << 24
                | (bytes[5] as u32) << 16
                | (bytes[6] as u32) << 8
                | bytes[7] as u32) as i32,
            ((bytes[0] as u32) << 24
                | (bytes[1] as u32) << 16
                | (bytes[2] as u32) << 8
                | bytes[3] as u32) as i32,
            unsigned,
        )
    }

    /// Parses a value in the given radix (2..=36), doing eight digits per
    /// multiply-and-add round.
    pub fn from_str_radix(s: &str, radix: u32, unsigned: bool) -> Result<Int64, Error> {
        if s.is_empty() {
            return Err(BvonError::Format("empty integer literal".to_string()).into());
        }
        if radix < 2 || radix > 36 {
            return Err(BvonError::Range(format!("radix {} out of range", radix)).into());
        }
        if !s.is_ascii() {
            return Err(BvonError::Format(format!("invalid integer literal {:?}", s)).into());
        }
        match s.find('-') {
            Some(0) => {
                return Ok(Int64::from_str_radix(&s[1..], radix, unsigned)?.negate());
            }
            Some(_) => {
                return Err(BvonError::Format("interior hyphen in integer literal".to_string()).into());
            }
            None => {}
        }

        let radix_to_power = Int64::from_number((radix as f64).powi(8), false);
        let mut result = Int64::ZERO;
        let mut index = 0;

        while index < s.len() {
            let size = 8.min(s.len() - index);
            let chunk = &s[index..index + size];
            let value = u64::from_str_radix(chunk, radix)
                .map_err(|_| BvonError::Format(format!("invalid integer literal {:?}", s)))?
                as f64;

            if size < 8 {
                let power = Int64::from_number((radix as f64).powi(size as i32), false);
                result = result.multiply(power).add(Int64::from_number(value, false));
            } else {
                result = result
                    .multiply(radix_to_power)
                    .add(Int64::from_number(value, false));
            }

            index += 8;
        }

        Ok(Int64::new(result.low, result.high, unsigned))
    }

    /// The low 32-bit word.
    pub fn low(self) -> i32 {
        self.low
    }

    /// The high 32-bit word.
    pub fn high(self) -> i32 {
        self.high
    }

    /// Whether the value is interpreted as unsigned.
    pub fn is_unsigned(self) -> bool {
        self.unsigned
    }

    /// Whether the value is zero.
    pub fn is_zero(self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Whether the value is negative. Unsigned values never are.
    pub fn is_negative(self) -> bool {
        !self.unsigned && self.high < 0
    }

    /// Whether the value is non-negative.
    pub fn is_positive(self) -> bool {
        self.unsigned || self.high >= 0
    }

    /// Whether the low bit is clear.
    pub fn is_even(self) -> bool {
        self.low & 1 == 0
    }

    /// Whether the low bit is set.
    pub fn is_odd(self) -> bool {
        self.low & 1 == 1
    }

    /// Structural equality with the mode special case: two values of
    /// differing interpretation that both have the sign bit set are never
    /// equal.
    pub fn equals(self, other: Int64) -> bool {
        if self.unsigned != other.unsigned
            && (self.high as u32) >> 31 == 1
            && (other.high as u32) >> 31 == 1
        {
            return false;
        }
        self.high == other.high && self.low == other.low
    }

    /// Mode-aware three-way comparison.
    pub fn compare(self, other: Int64) -> Ordering {
        if self.equals(other) {
            return Ordering::Equal;
        }
        let this_neg = self.is_negative();
        let other_neg = other.is_negative();
        if this_neg && !other_neg {
            return Ordering::Less;
        }
        if !this_neg && other_neg {
            return Ordering::Greater;
        }
        // same sign from here on
        if !self.unsigned {
            return if self.subtract(other).is_negative() {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if (other.high as u32) > (self.high as u32)
            || (other.high == self.high && (other.low as u32) > (self.low as u32))
        {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// `self > other` under [`compare`](Int64::compare).
    pub fn greater_than(self, other: Int64) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// `self >= other` under [`compare`](Int64::compare).
    pub fn greater_than_or_equal(self, other: Int64) -> bool {
        self.compare(other) != Ordering::Less
    }

    /// `self < other` under [`compare`](Int64::compare).
    pub fn less_than(self, other: Int64) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// `self <= other` under [`compare`](Int64::compare).
    pub fn less_than_or_equal(self, other: Int64) -> bool {
        self.compare(other) != Ordering::Greater
    }

    /// Sum, wrapping on 64-bit overflow. The words are split into 16-bit
    /// limbs and summed with carry propagation.
    pub fn add(self, addend: Int64) -> Int64 {
        let a48 = (self.high as u32) >> 16;
        let a32 = (self.high as u32) & 0xffff;
        let a16 = (self.low as u32) >> 16;
        let a00 = (self.low as u32) & 0xffff;

        let b48 = (addend.high as u32) >> 16;
        let b32 = (addend.high as u32) & 0xffff;
        let b16 = (addend.low as u32) >> 16;
        let b00 = (addend.low as u32) & 0xffff;

        let mut c00 = a00 + b00;
        let mut c16 = c00 >> 16;
        c00 &= 0xffff;
        c16 += a16 + b16;
        let mut c32 = c16 >> 16;
        c16 &= 0xffff;
        c32 += a32 + b32;
        let mut c48 = c32 >> 16;
        c32 &= 0xffff;
        c48 += a48 + b48;
        c48 &= 0xffff;

        Int64::new(
            ((c16 << 16) | c00) as i32,
            ((c48 << 16) | c32) as i32,
            self.unsigned,
        )
    }

    /// Difference, wrapping on 64-bit overflow.
    pub fn subtract(self, subtrahend: Int64) -> Int64 {
        self.add(subtrahend.negate())
    }

    /// Product, wrapping on 64-bit overflow. Operands that both fit in 24
    /// bits take a float fast path; otherwise the words are split into
    /// 16-bit limbs and cross-multiplied, skipping products that would
    /// only affect bits above the 64th.
    pub fn multiply(self, multiplier: Int64) -> Int64 {
        if self.is_zero() || multiplier.is_zero() {
            return Int64::ZERO;
        }

        if self.equals(Int64::MIN_VALUE) {
            return if multiplier.is_odd() {
                Int64::MIN_VALUE
            } else {
                Int64::ZERO
            };
        }
        if multiplier.equals(Int64::MIN_VALUE) {
            return if self.is_odd() { Int64::MIN_VALUE } else { Int64::ZERO };
        }

        if self.is_negative() {
            if multiplier.is_negative() {
                return self.negate().multiply(multiplier.negate());
            }
            return self.negate().multiply(multiplier).negate();
        } else if multiplier.is_negative() {
            return self.multiply(multiplier.negate()).negate();
        }

        let two_pwr_24 = Int64::new(1 << 24, 0, false);
        if self.less_than(two_pwr_24) && multiplier.less_than(two_pwr_24) {
            return Int64::from_number(self.to_f64() * multiplier.to_f64(), self.unsigned);
        }

        let a48 = (self.high as u32) >> 16;
        let a32 = (self.high as u32) & 0xffff;
        let a16 = (self.low as u32) >> 16;
        let a00 = (self.low as u32) & 0xffff;

        let b48 = (multiplier.high as u32) >> 16;
        let b32 = (multiplier.high as u32) & 0xffff;
        let b16 = (multiplier.low as u32) >> 16;
        let b00 = (multiplier.low as u32) & 0xffff;

        let mut c00 = a00.wrapping_mul(b00);
        let mut c16 = c00 >> 16;
        c00 &= 0xffff;
        c16 = c16.wrapping_add(a16.wrapping_mul(b00));
        let mut c32 = c16 >> 16;
        c16 &= 0xffff;
        c16 = c16.wrapping_add(a00.wrapping_mul(b16));
        c32 = c32.wrapping_add(c16 >> 16);
        c16 &= 0xffff;
        c32 = c32.wrapping_add(a32.wrapping_mul(b00));
        let mut c48 = c32 >> 16;
        c32 &= 0xffff;
        c32 = c32.wrapping_add(a16.wrapping_mul(b16));
        c48 = c48.wrapping_add(c32 >> 16);
        c32 &= 0xffff;
        c32 = c32.wrapping_add(a00.wrapping_mul(b32));
        c48 = c48.wrapping_add(c32 >> 16);
        c32 &= 0xffff;
        c48 = c48
            .wrapping_add(a48.wrapping_mul(b00))
            .wrapping_add(a32.wrapping_mul(b16))
            .wrapping_add(a16.wrapping_mul(b32))
            .wrapping_add(a00.wrapping_mul(b48));
        c48 &= 0xffff;

        Int64::new(
            ((c16 << 16) | c00) as i32,
            ((c48 << 16) | c32) as i32,
            self.unsigned,
        )
    }

    /// Truncating quotient.
    ///
    /// The quotient is accumulated from float estimates of
    /// `remainder / divisor`, each corrected downward until its product no
    /// longer exceeds the remainder. `MIN_VALUE / -1` wraps back to
    /// `MIN_VALUE` rather than failing; division by zero is an
    /// [`BvonError::Arithmetic`] error.
    pub fn divide(self, divisor: Int64) -> Result<Int64, Error> {
        if divisor.is_zero() {
            return Err(BvonError::Arithmetic("division by zero".to_string()).into());
        }

        if self.is_zero() {
            return Ok(if self.unsigned { Int64::UNSIGNED_ZERO } else { Int64::ZERO });
        }

        let mut divisor = divisor;
        let mut res;

        if !self.unsigned {
            if self.equals(Int64::MIN_VALUE) {
                if divisor.equals(Int64::ONE) || divisor.equals(Int64::NEG_ONE) {
                    return Ok(Int64::MIN_VALUE);
                }
                if divisor.equals(Int64::MIN_VALUE) {
                    return Ok(Int64::ONE);
                }
                // |divisor| >= 2 here, so |self / divisor| < |MIN_VALUE|
                let half = self.shift_right(1);
                let approx = half.divide(divisor)?.shift_left(1);
                if approx.equals(Int64::ZERO) {
                    return Ok(if divisor.is_negative() { Int64::ONE } else { Int64::NEG_ONE });
                }
                let rem = self.subtract(divisor.multiply(approx));
                return Ok(approx.add(rem.divide(divisor)?));
            } else if divisor.equals(Int64::MIN_VALUE) {
                return Ok(Int64::ZERO);
            }

            if self.is_negative() {
                if divisor.is_negative() {
                    return self.negate().divide(divisor.negate());
                }
                return Ok(self.negate().divide(divisor)?.negate());
            } else if divisor.is_negative() {
                return Ok(self.divide(divisor.negate())?.negate());
            }
            res = Int64::ZERO;
        } else {
            // the approximation loop below assumes a non-negative divisor
            if !divisor.unsigned {
                divisor = divisor.to_unsigned();
            }
            if divisor.greater_than(self) {
                return Ok(Int64::UNSIGNED_ZERO);
            }
            if divisor.greater_than(self.shift_right_unsigned(1)) {
                return Ok(Int64::UNSIGNED_ONE);
            }
            res = Int64::UNSIGNED_ZERO;
        }

        // Accumulate float estimates of rem / divisor from below; an
        // estimate is shrunk until its product stops exceeding rem, so the
        // remainder never goes negative.
        let mut rem = self;
        while rem.greater_than_or_equal(divisor) {
            let mut approx = (rem.to_f64() / divisor.to_f64()).floor().max(1.0);

            // tweak at the 48th digit or the smallest non-fractional one
            let log2 = (approx.ln() / std::f64::consts::LN_2).ceil();
            let delta = if log2 <= 48.0 { 1.0 } else { 2f64.powf(log2 - 48.0) };

            let mut approx_res = Int64::from_number(approx, false);
            let mut approx_rem = approx_res.multiply(divisor);
            while approx_rem.is_negative() || approx_rem.greater_than(rem) {
                approx -= delta;
                approx_res = Int64::from_number(approx, self.unsigned);
                approx_rem = approx_res.multiply(divisor);
            }

            // zero would make no progress
            if approx_res.is_zero() {
                approx_res = Int64::ONE;
            }

            res = res.add(approx_res);
            rem = rem.subtract(approx_rem);
        }

        Ok(res)
    }

    /// Remainder of the truncating division.
    pub fn remainder(self, divisor: Int64) -> Result<Int64, Error> {
        Ok(self.subtract(self.divide(divisor)?.multiply(divisor)))
    }

    /// Two's-complement negation. `MIN_VALUE` is its own negation.
    pub fn negate(self) -> Int64 {
        if !self.unsigned && self.equals(Int64::MIN_VALUE) {
            return Int64::MIN_VALUE;
        }
        self.not().add(Int64::ONE)
    }

    /// Bitwise complement.
    pub fn not(self) -> Int64 {
        Int64::new(!self.low, !self.high, self.unsigned)
    }

    /// Bitwise and.
    pub fn and(self, other: Int64) -> Int64 {
        Int64::new(self.low & other.low, self.high & other.high, self.unsigned)
    }

    /// Bitwise or.
    pub fn or(self, other: Int64) -> Int64 {
        Int64::new(self.low | other.low, self.high | other.high, self.unsigned)
    }

    /// Bitwise exclusive or.
    pub fn xor(self, other: Int64) -> Int64 {
        Int64::new(self.low ^ other.low, self.high ^ other.high, self.unsigned)
    }

    /// Left shift by `num_bits & 63`.
    pub fn shift_left(self, num_bits: u32) -> Int64 {
        let num_bits = num_bits & 63;
        if num_bits == 0 {
            self
        } else if num_bits < 32 {
            Int64::new(
                self.low << num_bits,
                (self.high << num_bits) | ((self.low as u32) >> (32 - num_bits)) as i32,
                self.unsigned,
            )
        } else {
            Int64::new(0, self.low << (num_bits - 32), self.unsigned)
        }
    }

    /// Arithmetic right shift by `num_bits & 63`.
    pub fn shift_right(self, num_bits: u32) -> Int64 {
        let num_bits = num_bits & 63;
        if num_bits == 0 {
            self
        } else if num_bits < 32 {
            Int64::new(
                (((self.low as u32) >> num_bits) as i32) | (self.high << (32 - num_bits)),
                self.high >> num_bits,
                self.unsigned,
            )
        } else {
            Int64::new(
                self.high >> (num_bits - 32),
                if self.high >= 0 { 0 } else { -1 },
                self.unsigned,
            )
        }
    }

    /// Logical right shift by `num_bits & 63`. Never sign-extends.
    pub fn shift_right_unsigned(self, num_bits: u32) -> Int64 {
        let num_bits = num_bits & 63;
        if num_bits == 0 {
            self
        } else if num_bits < 32 {
            Int64::new(
                (((self.low as u32) >> num_bits) as i32) | (self.high << (32 - num_bits)),
                ((self.high as u32) >> num_bits) as i32,
                self.unsigned,
            )
        } else if num_bits == 32 {
            Int64::new(self.high, 0, self.unsigned)
        } else {
            Int64::new(((self.high as u32) >> (num_bits - 32)) as i32, 0, self.unsigned)
        }
    }

    /// Reinterprets the bit pattern as signed.
    pub fn to_signed(self) -> Int64 {
        if !self.unsigned {
            return self;
        }
        Int64::new(self.low, self.high, false)
    }

    /// Reinterprets the bit pattern as unsigned.
    pub fn to_unsigned(self) -> Int64 {
        if self.unsigned {
            return self;
        }
        Int64::new(self.low, self.high, true)
    }

    /// The low word as an `i32`.
    pub fn to_i32(self) -> i32 {
        self.low
    }

    /// The bit pattern as a native `i64`.
    pub fn to_i64(self) -> i64 {
        ((self.high as i64) << 32) | (self.low as u32 as i64)
    }

    /// The nearest float, exact for magnitudes up to 2^53.
    pub fn to_f64(self) -> f64 {
        if self.unsigned {
            (self.high as u32 as f64) * TWO_PWR_32_DBL + (self.low as u32 as f64)
        } else {
            (self.high as f64) * TWO_PWR_32_DBL + (self.low as u32 as f64)
        }
    }

    /// The eight little-endian payload bytes: low word first.
    pub fn to_bytes_le(self) -> [u8; 8] {
        let lo = self.low as u32;
        let hi = self.high as u32;
        [
            lo as u8,
            (lo >> 8) as u8,
            (lo >> 16) as u8,
            (lo >> 24) as u8,
            hi as u8,
            (hi >> 8) as u8,
            (hi >> 16) as u8,
            (hi >> 24) as u8,
        ]
    }

    /// The eight big-endian bytes: high word first.
    pub fn to_bytes_be(self) -> [u8; 8] {
        let lo = self.low as u32;
        let hi = self.high as u32;
        [
            (hi >> 24) as u8,
            (hi >> 16) as u8,
            (hi >> 8) as u8,
            hi as u8,
            (lo >> 24) as u8,
            (lo >> 16) as u8,
            (lo >> 8) as u8,
            lo as u8,
        ]
    }

    /// Renders the value in the given radix (2..=36), producing six digits
    /// per division round. `MIN_VALUE` cannot be negated directly, so one
    /// digit is peeled off before recursing on the negated rest.
    pub fn to_string_radix(self, radix: u32) -> Result<String, Error> {
        if radix < 2 || radix > 36 {
            return Err(BvonError::Range(format!("radix {} out of range", radix)).into());
        }
        if self.is_zero() {
            return Ok("0".to_string());
        }

        if self.is_negative() {
            if self.equals(Int64::MIN_VALUE) {
                let radix64 = Int64::from_number(radix as f64, false);
                let div = self.divide(radix64)?;
                let rem = div.multiply(radix64).subtract(self);
                let mut out = div.to_string_radix(radix)?;
                out.push_str(&u32_to_radix(rem.to_i32() as u32, radix));
                return Ok(out);
            }
            return Ok(format!("-{}", self.negate().to_string_radix(radix)?));
        }

        let radix_to_power = Int64::from_number((radix as f64).powi(6), self.unsigned);
        let mut rem = self;
        let mut result = String::new();
        loop {
            let rem_div = rem.divide(radix_to_power)?;
            let intval = rem.subtract(rem_div.multiply(radix_to_power)).to_i32() as u32;
            let digits = u32_to_radix(intval, radix);
            rem = rem_div;
            if rem.is_zero() {
                return Ok(format!("{}{}", digits, result));
            }
            result = format!("{:0>6}{}", digits, result);
        }
    }
}

fn u32_to_radix(mut value: u32, radix: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % radix) as usize] as char);
        value /= radix;
    }
    digits.iter().rev().collect()
}

fn is_strict_decimal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.split_first() {
        Some((b'+', rest)) => (false, rest),
        Some((b'-', rest)) => (true, rest),
        Some(_) => (false, bytes),
        None => return false,
    };
    if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits[0] == b'0' {
        // "0" and "+0" only
        return digits.len() == 1 && !negative;
    }
    true
}

impl PartialEq for Int64 {
    fn eq(&self, other: &Int64) -> bool {
        self.equals(*other)
    }
}

impl Eq for Int64 {}

// equal values always share their word pair, so the flag stays out of the hash
impl Hash for Int64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.low.hash(state);
        self.high.hash(state);
    }
}

impl fmt::Display for Int64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_string_radix(10) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl FromStr for Int64 {
    type Err = Error;

    /// Parses a strict decimal literal: an optional sign, then either `0`
    /// or a nonzero leading digit. `-0`, leading zeros, and interior signs
    /// are rejected.
    fn from_str(s: &str) -> Result<Int64, Error> {
        if !is_strict_decimal(s) {
            return Err(BvonError::Format(format!("invalid decimal literal {:?}", s)).into());
        }
        let digits = s.strip_prefix('+').unwrap_or(s);
        Int64::from_str_radix(digits, 10, false)
    }
}

impl From<i32> for Int64 {
    fn from(value: i32) -> Int64 {
        Int64::new(value, if value < 0 { -1 } else { 0 }, false)
    }
}

impl From<i64> for Int64 {
    fn from(value: i64) -> Int64 {
        Int64::new(value as i32, (value >> 32) as i32, false)
    }
}

impl From<u64> for Int64 {
    fn from(value: u64) -> Int64 {
        Int64::new(value as u32 as i32, (value >> 32) as u32 as i32, true)
    }
}

impl Add for Int64 {
    type Output = Int64;

    fn add(self, rhs: Int64) -> Int64 {
        Int64::add(self, rhs)
    }
}

impl Sub for Int64 {
    type Output = Int64;

    fn sub(self, rhs: Int64) -> Int64 {
        self.subtract(rhs)
    }
}

impl Mul for Int64 {
    type Output = Int64;

    fn mul(self, rhs: Int64) -> Int64 {
        self.multiply(rhs)
    }
}

impl Neg for Int64 {
    type Output = Int64;

    fn neg(self) -> Int64 {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_split_round_trips() {
        for &v in &[0i64, 1, -1, 42, -42, i64::max_value(), i64::min_value(), 1 << 33] {
            assert_eq!(Int64::from(v).to_i64(), v);
        }
    }

    #[test]
    fn min_value_divided_by_negative_one_wraps() {
        let q = Int64::MIN_VALUE.divide(Int64::NEG_ONE).unwrap();
        assert_eq!(q, Int64::MIN_VALUE);
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(Int64::from(7i64).divide(Int64::ZERO).is_err());
        assert!(Int64::from(7i64).remainder(Int64::ZERO).is_err());
    }

    #[test]
    fn division_matches_native() {
        let samples = [
            (10i64, 3i64),
            (-10, 3),
            (10, -3),
            (-10, -3),
            (i64::max_value(), 2),
            (i64::min_value(), 2),
            (i64::min_value(), 3),
            (1, i64::max_value()),
            (123456789012345, 987654321),
        ];
        for &(a, b) in &samples {
            let q = Int64::from(a).divide(Int64::from(b)).unwrap();
            let r = Int64::from(a).remainder(Int64::from(b)).unwrap();
            assert_eq!(q.to_i64(), a / b, "{} / {}", a, b);
            assert_eq!(r.to_i64(), a % b, "{} % {}", a, b);
        }
    }

    #[test]
    fn unsigned_division_uses_full_range() {
        let a = Int64::from(u64::max_value());
        let b = Int64::from(10u64);
        assert_eq!(
            a.divide(b).unwrap().to_i64() as u64,
            u64::max_value() / 10
        );
    }

    #[test]
    fn multiply_matches_native() {
        let samples = [
            (0i64, 5i64),
            (7, 6),
            (-7, 6),
            (1 << 30, 1 << 30),
            (123456789, -987654321),
            (i64::max_value(), 2),
        ];
        for &(a, b) in &samples {
            assert_eq!(
                Int64::from(a).multiply(Int64::from(b)).to_i64(),
                a.wrapping_mul(b),
                "{} * {}",
                a,
                b
            );
        }
    }

    #[test]
    fn mixed_mode_equality() {
        // positive patterns compare equal across modes
        assert_eq!(Int64::new(5, 0, false), Int64::new(5, 0, true));
        // sign-bit patterns never do
        assert_ne!(Int64::NEG_ONE, Int64::MAX_UNSIGNED_VALUE);
        assert_eq!(Int64::NEG_ONE.to_bytes_le(), Int64::MAX_UNSIGNED_VALUE.to_bytes_le());
    }

    #[test]
    fn radix_rendering_round_trips() {
        let values = [0i64, 1, -1, 42, -12345, i64::max_value(), i64::min_value()];
        for radix in 2..=36 {
            for &v in &values {
                let s = Int64::from(v).to_string_radix(radix).unwrap();
                let back = Int64::from_str_radix(&s, radix, false).unwrap();
                assert_eq!(back.to_i64(), v, "radix {} value {}", radix, v);
            }
        }
    }

    #[test]
    fn min_value_renders_in_decimal() {
        assert_eq!(Int64::MIN_VALUE.to_string(), "-9223372036854775808");
        assert_eq!(Int64::MAX_VALUE.to_string(), "9223372036854775807");
        assert_eq!(
            Int64::MAX_UNSIGNED_VALUE.to_string_radix(10).unwrap(),
            "18446744073709551615"
        );
    }

    #[test]
    fn strict_decimal_grammar() {
        assert!("0".parse::<Int64>().is_ok());
        assert!("+0".parse::<Int64>().is_ok());
        assert!("-17".parse::<Int64>().is_ok());
        assert!("".parse::<Int64>().is_err());
        assert!("-0".parse::<Int64>().is_err());
        assert!("007".parse::<Int64>().is_err());
        assert!("1-2".parse::<Int64>().is_err());
        assert!("+-2".parse::<Int64>().is_err());
    }

    #[test]
    fn shifts() {
        let v = Int64::from(-8i64);
        assert_eq!(v.shift_right(1).to_i64(), -4);
        assert_eq!(
            v.shift_right_unsigned(1).to_i64() as u64,
            (-8i64 as u64) >> 1
        );
        assert_eq!(Int64::from(3i64).shift_left(33).to_i64(), 3i64 << 33);
        assert_eq!(Int64::from(-1i64).shift_right_unsigned(40).to_i64(), 0xff_ffff);
    }

    #[test]
    fn byte_orders_agree() {
        let v = Int64::from(0x0102_0304_0506_0708i64);
        assert_eq!(v.to_bytes_be(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(v.to_bytes_le(), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(Int64::from_bytes_be(v.to_bytes_be(), false), v);
        assert_eq!(Int64::from_bytes_le(v.to_bytes_le(), false), v);
    }

    #[test]
    fn float_conversion_clamps() {
        assert_eq!(Int64::from_number(f64::NAN, false), Int64::ZERO);
        assert_eq!(Int64::from_number(-1.0, true), Int64::UNSIGNED_ZERO);
        assert_eq!(Int64::from_number(1e300, false), Int64::MAX_VALUE);
        assert_eq!(Int64::from_number(-1e300, false), Int64::MIN_VALUE);
        assert_eq!(Int64::from_number(-3.9, false).to_i64(), -3);
    }
}
