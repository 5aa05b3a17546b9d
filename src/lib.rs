//! # BVON
//!
//! BVON (Binary Value Object Notation) is a binary serialization format
//! for structured values, designed for payloads that are smaller and
//! faster to parse than text formats, with cross-document key compression
//! through reusable schemas.
//!
//! # Usage
//!
//! Values move through the codec as the [`Bvon`] union. Most Rust values
//! convert with `From`/`Into`, or through the [`BvonRep`](rep::BvonRep)
//! trait:
//!
//! ```
//! use bvon::prelude::*;
//!
//! let value = Bvon::from(vec![1, 2, 3]);
//!
//! // encode
//! let bytes = serialize(&value).unwrap();
//!
//! // and then immediately decode, because this is a silly example
//! let decoded = deserialize(&bytes).unwrap();
//!
//! assert_eq!(decoded, value);
//! ```
//!
//! # An overview of BVON types
//!
//! ## Integers
//!
//! Whole numbers travel as INT32 when they fit in 32 bits, as INT64 up to
//! 64 bits ([`Int64`]), and as BIGINT beyond that (non-negative
//! [`BigUint`] magnitudes of any size).
//!
//! ```
//! use bvon::prelude::*;
//! use num_bigint::BigUint;
//!
//! let small = Bvon::from(23u8);
//! let large = Bvon::from(9_007_199_254_740_991i64);
//! let very_big = Bvon::from(BigUint::parse_bytes(b"zzzzzzzzzzzzzzzzzzzz", 36).unwrap());
//! ```
//!
//! ## Floats
//!
//! Every non-integral number is an IEEE-754 double. Safe whole-number
//! floats narrow to the integer kinds on conversion; negative zero and
//! magnitudes above 2^53 − 1 stay doubles:
//!
//! ```
//! use bvon::Bvon;
//!
//! assert_eq!(Bvon::from(3.0), Bvon::from(3));
//! assert!(match Bvon::from(-0.0) { Bvon::Double(_) => true, _ => false });
//! ```
//!
//! ## Records and containers
//!
//! Ordered records ([`VecMap`]), sequences, uniqueness-enforcing sets
//! ([`VecSet`]), and ordered key-value collections all nest freely.
//! Record field names are interned: repeated keys encode as one-byte
//! back-references, and a [`Schema`] extends that compression across
//! documents.
//!
//! ## Everything else
//!
//! Text, binary blobs, booleans, millisecond-resolution instants, regular
//! expressions (source and flags as opaque text), unique object
//! identifiers ([`Uoid`]), and extension values rebuilt through a
//! [`Constructors`] registry.
//!
//! # Specification
//!
//! Every encoded value starts with a one-byte tag:
//!
//! | Tag    | Kind        | Payload                                      |
//! | ---    | ---         | ---                                          |
//! | `0x00` | UNDEFINED   | none (accepted on decode, never emitted)     |
//! | `0x01` | NULL        | none                                         |
//! | `0x02` | INT32       | 4 bytes, signed little-endian                |
//! | `0x03` | INT64       | 8 bytes: low word, then high word, each LE   |
//! | `0x04` | DOUBLE      | 8 bytes, IEEE-754 little-endian              |
//! | `0x05` | BIGINT      | header + minimal big-endian magnitude        |
//! | `0x06` | STRING      | header + UTF-8 bytes                         |
//! | `0x07` | BOOLEAN     | 1 byte                                       |
//! | `0x08` | DATE        | INT64 payload, milliseconds since epoch      |
//! | `0x09` | OBJECT      | header(fields) + (key, value) pairs          |
//! | `0x0a` | ARRAY       | header(items) + items                        |
//! | `0x0b` | BYTEVIEW    | header + raw bytes                           |
//! | `0x0c` | SET         | header(items) + items                        |
//! | `0x0d` | MAP         | header(pairs) + (key, value) blocks          |
//! | `0x0e` | DB_REF      | header(reference id)                         |
//! | `0x0f` | REGEX       | two STRING blocks: source, flags             |
//! | `0x10` | UOID        | header + canonical base32 text               |
//! | `0xff` | CONSTRUCTOR | header(code) + one argument block            |
//!
//! Variable-length payloads are preceded by a length header: a selector
//! byte `8`, `16`, or `32`, then the length itself in that many bits,
//! little-endian. Lengths of 2^32 and above cannot be encoded.
//!
//! Inside an OBJECT, the first occurrence of a field name is a STRING
//! block and registers the next reference id (ids count from 1); later
//! occurrences are DB_REF blocks carrying the id. The table lives for one
//! top-level call, unless a shared [`Schema`] pre-registers the names on
//! both sides.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    macro_use_extern_crate,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod encoding;
pub mod errors;
pub mod int64;
pub mod prelude;
pub mod registry;
pub mod rep;
pub mod schema;
pub mod uoid;
pub mod util;
pub mod vecmap;
pub mod vecset;

pub use encoding::{
    deserialize, deserialize_collection, deserialize_with, serialize, serialize_collection,
    serialize_with, Reader, Writer,
};
pub use errors::BvonError;
pub use int64::Int64;
pub use registry::Constructors;
pub use schema::Schema;
pub use uoid::Uoid;
pub use vecmap::VecMap;
pub use vecset::VecSet;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use failure::{bail, Error};
use num_bigint::{BigInt, BigUint, Sign};
use rep::BvonRep;
use std::convert::TryFrom;

const MAX_SAFE_INTEGER_DBL: f64 = 9_007_199_254_740_991.0;
const INT32_MAX_DBL: f64 = 2_147_483_647.0;
const INT32_MIN_DBL: f64 = -2_147_483_648.0;

#[derive(Eq, PartialEq, Clone, Hash, Debug)]
/// [`Bvon`] and its variants: one per wire kind.
///
/// # Example
///
/// ```
/// use bvon::Bvon;
///
/// let b = Bvon::Bool(true);
///
/// let val = match b {
///     Bvon::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Bvon {
    /// An absent value. Encodes as NULL; only decoding a foreign
    /// UNDEFINED tag produces it.
    Undefined,
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit integer.
    Int64(Int64),
    /// IEEE-754 double, stored as its bit pattern so values hash and
    /// compare structurally.
    Double(u64),
    /// Non-negative arbitrary-precision integer.
    BigInt(BigUint),
    /// UTF-8 text.
    String(String),
    /// Binary blob.
    Bytes(Bytes),
    /// Instant with millisecond resolution.
    Date(DateTime<Utc>),
    /// Ordered record with unique field names.
    Object(VecMap<String, Bvon>),
    /// Ordered sequence.
    Array(Vec<Bvon>),
    /// Uniqueness-enforcing collection.
    Set(VecSet<Bvon>),
    /// Ordered key-value collection; keys may repeat at the wire level.
    Map(Vec<(Bvon, Bvon)>),
    /// Regular expression: source and flags as opaque text.
    Regex(Regex),
    /// Opaque unique identifier.
    Uoid(Uoid),
    /// Extension value: a registry code plus an argument value,
    /// canonically an array.
    Ext(u32, Box<Bvon>),
}

#[derive(Eq, PartialEq, Clone, Hash, Debug)]
/// A regular expression as it travels on the wire: pattern source and
/// flags, both opaque text. Compilation is the application's concern.
pub struct Regex {
    /// The pattern text.
    pub source: String,
    /// The flag characters.
    pub flags: String,
}

impl Regex {
    /// Builds a regex value from its source and flags.
    pub fn new<S: Into<String>, F: Into<String>>(source: S, flags: F) -> Regex {
        Regex {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

impl Bvon {
    /// Builds an extension value from a registry code and its positional
    /// arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::Bvon;
    ///
    /// let point = Bvon::ext(1, vec![Bvon::from(3), Bvon::from(4)]);
    /// ```
    pub fn ext(code: u32, args: Vec<Bvon>) -> Bvon {
        Bvon::Ext(code, Box::new(Bvon::Array(args)))
    }

    /// Builds an ordered key-value collection.
    pub fn map(entries: Vec<(Bvon, Bvon)>) -> Bvon {
        Bvon::Map(entries)
    }

    /// Converts a bytestring literal to [`Bvon`].
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::Bvon;
    ///
    /// let blob = Bvon::from_static(b"this is an example");
    /// ```
    pub fn from_static(bytes: &'static [u8]) -> Bvon {
        Bvon::Bytes(Bytes::from_static(bytes))
    }

    /// Indicates whether a value is [`Bvon::Null`].
    pub fn is_null(&self) -> bool {
        match self {
            Bvon::Null => true,
            _ => false,
        }
    }

    /// Indicates whether a value is [`Bvon::Undefined`].
    pub fn is_undefined(&self) -> bool {
        match self {
            Bvon::Undefined => true,
            _ => false,
        }
    }

    /// Tries to convert a value to a [`bool`].
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::Bvon;
    ///
    /// assert!(Bvon::from(true).to_bool().unwrap());
    /// ```
    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Bvon::Bool(b) => Ok(*b),
            _ => bail!("value is not `Bool`"),
        }
    }

    /// Tries to view a value as text.
    pub fn to_str(&self) -> Result<&str, Error> {
        match self {
            Bvon::String(s) => Ok(s),
            _ => bail!("value is not a string"),
        }
    }

    /// Tries to view a value as a blob.
    pub fn to_bytes(&self) -> Result<&Bytes, Error> {
        match self {
            Bvon::Bytes(b) => Ok(b),
            _ => bail!("value is not a bytestring"),
        }
    }

    /// Tries to view a value as a sequence.
    pub fn to_array(&self) -> Result<&Vec<Bvon>, Error> {
        match self {
            Bvon::Array(a) => Ok(a),
            _ => bail!("value is not an `Array`"),
        }
    }

    /// Consumes a value, converting it into a vector of [`Bvon`] values.
    /// This will return an [`Error`] if the value is not a
    /// [`Bvon::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::Bvon;
    ///
    /// let items = Bvon::from(vec![1, 2, 3]).into_array().unwrap();
    /// assert_eq!(items.len(), 3);
    /// ```
    pub fn into_array(self) -> Result<Vec<Bvon>, Error> {
        match self {
            Bvon::Array(a) => Ok(a),
            _ => bail!("value is not an `Array`"),
        }
    }

    /// Tries to view a value as an ordered record.
    pub fn to_object(&self) -> Result<&VecMap<String, Bvon>, Error> {
        match self {
            Bvon::Object(map) => Ok(map),
            _ => bail!("value is not an `Object`"),
        }
    }

    /// Consumes a value, converting it into its record map.
    pub fn into_object(self) -> Result<VecMap<String, Bvon>, Error> {
        match self {
            Bvon::Object(map) => Ok(map),
            _ => bail!("value is not an `Object`"),
        }
    }

    /// Tries to view a value as a 64-bit integer.
    pub fn to_int64(&self) -> Result<Int64, Error> {
        match self {
            Bvon::Int64(i) => Ok(*i),
            Bvon::Int32(i) => Ok(Int64::from(*i)),
            _ => bail!("value is not an integer"),
        }
    }

    /// The double value, when the variant is a double.
    pub fn to_f64(&self) -> Result<f64, Error> {
        match self {
            Bvon::Double(bits) => Ok(f64::from_bits(*bits)),
            _ => bail!("value is not a `Double`"),
        }
    }

    /// Consumes a value, converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::prelude::*;
    ///
    /// let num: u8 = Bvon::from(1).into_rep().unwrap();
    /// assert_eq!(num, 1);
    /// ```
    pub fn into_rep<T: BvonRep>(self) -> Option<T> {
        T::from_bvon(self)
    }
}

impl std::fmt::Display for Bvon {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Bvon::Undefined => write!(f, "undefined"),
            Bvon::Null => write!(f, "null"),
            Bvon::Bool(b) => write!(f, "{}", b),
            Bvon::Int32(i) => write!(f, "{}", i),
            Bvon::Int64(i) => write!(f, "{}", i),
            Bvon::Double(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Bvon::BigInt(n) => write!(f, "{}", n),
            Bvon::String(s) => write!(f, "{:?}", s),
            Bvon::Bytes(b) => {
                write!(f, "b\"")?;
                for byte in b.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "\"")
            }
            Bvon::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Bvon::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Bvon::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Bvon::Set(set) => {
                write!(f, "Set{{")?;
                for (i, member) in set.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "}}")
            }
            Bvon::Map(entries) => {
                write!(f, "Map{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
            Bvon::Regex(r) => write!(f, "/{}/{}", r.source, r.flags),
            Bvon::Uoid(id) => write!(f, "Uoid({})", id),
            Bvon::Ext(code, args) => write!(f, "Constructor({}, {})", code, args),
        }
    }
}

// bool -> Bvon, From
from_fn!(Bvon, bool, Bvon::Bool);
// Int64 -> Bvon, From
from_fn!(Bvon, Int64, Bvon::Int64);
// BigUint -> Bvon, From
from_fn!(Bvon, BigUint, Bvon::BigInt);
// Bytes -> Bvon, From
from_fn!(Bvon, Bytes, Bvon::Bytes);
// Uoid -> Bvon, From
from_fn!(Bvon, Uoid, Bvon::Uoid);
// Regex -> Bvon, From
from_fn!(Bvon, Regex, Bvon::Regex);
// record map -> Bvon, From
from_fn!(Bvon, VecMap<String, Bvon>, Bvon::Object);
// set -> Bvon, From
from_fn!(Bvon, VecSet<Bvon>, Bvon::Set);

impl From<i32> for Bvon {
    fn from(value: i32) -> Bvon {
        Bvon::Int32(value)
    }
}

impl From<i64> for Bvon {
    fn from(value: i64) -> Bvon {
        if value >= i32::min_value() as i64 && value <= i32::max_value() as i64 {
            Bvon::Int32(value as i32)
        } else {
            Bvon::Int64(Int64::from(value))
        }
    }
}

impl From<u32> for Bvon {
    fn from(value: u32) -> Bvon {
        Bvon::from(value as i64)
    }
}

impl From<u64> for Bvon {
    fn from(value: u64) -> Bvon {
        if value <= i64::max_value() as u64 {
            Bvon::from(value as i64)
        } else {
            Bvon::Int64(Int64::from(value))
        }
    }
}

impl From<f64> for Bvon {
    /// The numeric encode path: negative zero, fractions, non-finite
    /// values, and magnitudes above 2^53 − 1 stay doubles; everything
    /// else narrows to INT32 or INT64.
    fn from(value: f64) -> Bvon {
        let negative_zero = value == 0.0 && value.is_sign_negative();

        if !negative_zero && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER_DBL {
            if value >= INT32_MIN_DBL && value <= INT32_MAX_DBL {
                return Bvon::Int32(value as i32);
            }
            return Bvon::Int64(Int64::from_number(value, false));
        }

        Bvon::Double(value.to_bits())
    }
}

impl From<DateTime<Utc>> for Bvon {
    /// Truncates to the wire's millisecond resolution.
    fn from(date: DateTime<Utc>) -> Bvon {
        match Utc.timestamp_millis_opt(date.timestamp_millis()).single() {
            Some(truncated) => Bvon::Date(truncated),
            None => Bvon::Date(date),
        }
    }
}

impl From<&str> for Bvon {
    fn from(s: &str) -> Bvon {
        Bvon::String(s.to_string())
    }
}

impl From<String> for Bvon {
    fn from(s: String) -> Bvon {
        Bvon::String(s)
    }
}

impl<T: Into<Bvon>> From<Vec<T>> for Bvon {
    fn from(v: Vec<T>) -> Bvon {
        Bvon::Array(v.into_iter().map(T::into).collect())
    }
}

impl<T: Into<Bvon>> From<Option<T>> for Bvon {
    fn from(v: Option<T>) -> Bvon {
        match v {
            Some(value) => value.into(),
            None => Bvon::Null,
        }
    }
}

impl TryFrom<BigInt> for Bvon {
    type Error = Error;

    /// The wire carries magnitudes only, so negative big integers are
    /// rejected rather than encoded with an empty payload.
    fn try_from(value: BigInt) -> Result<Bvon, Error> {
        if value.sign() == Sign::Minus {
            return Err(
                BvonError::Range("negative arbitrary-precision integer".to_string()).into(),
            );
        }
        match value.to_biguint() {
            Some(magnitude) => Ok(Bvon::BigInt(magnitude)),
            None => Err(
                BvonError::Range("negative arbitrary-precision integer".to_string()).into(),
            ),
        }
    }
}

from_as!(Bvon, i8, i32);
from_as!(Bvon, i16, i32);
from_as!(Bvon, u8, i32);
from_as!(Bvon, u16, i32);
from_as!(Bvon, f32, f64);
