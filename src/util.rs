use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Computes the minimal big-endian byte length of a non-negative magnitude
/// by peeling 32-bit, then 16-bit, then 8-bit chunks off the top.
///
/// # Example
///
/// ```
/// use bvon::util::biguint_byte_length;
/// use num_bigint::BigUint;
///
/// assert_eq!(biguint_byte_length(&BigUint::from(0u32)), 0);
/// assert_eq!(biguint_byte_length(&BigUint::from(0xffu32)), 1);
/// assert_eq!(biguint_byte_length(&BigUint::from(0x1_0000_0000u64)), 5);
/// ```
pub fn biguint_byte_length(n: &BigUint) -> usize {
    let word_max = BigUint::from(0xffff_ffffu32);
    let mut left = n.clone();
    let mut bytes = 0;

    while left > word_max {
        bytes += 4;
        left >>= 32;
    }

    // at most 32 bits remain
    let mut small = left.to_u32().unwrap_or(0);

    while small > 0xffff {
        bytes += 2;
        small >>= 16;
    }

    while small > 0 {
        bytes += 1;
        small >>= 8;
    }

    bytes
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}
