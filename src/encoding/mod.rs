//! # BVON binary encoder and decoder
//!
//! Encode and decode functions for BVON values.
//!
//! # Example
//!
//! ```
//! use bvon::{deserialize, serialize, Bvon};
//!
//! let value = Bvon::from(vec![1, 2, 3]);
//!
//! let bytes = serialize(&value).unwrap();
//! let decoded = deserialize(&bytes).unwrap();
//!
//! assert_eq!(decoded, value);
//! ```
//!
//! Field names repeated across documents compress through a shared
//! [`Schema`]:
//!
//! ```
//! use bvon::{Bvon, Reader, Schema, Writer};
//!
//! let doc = Bvon::Object(
//!     vec![("key".to_string(), Bvon::from(1))].into_iter().collect(),
//! );
//! let schema = Schema::build(&doc);
//!
//! let mut writer = Writer::new();
//! let bytes = writer.write_with(&doc, &schema).unwrap().to_vec();
//!
//! let reader = Reader::new();
//! assert_eq!(reader.read_with(&bytes, &schema).unwrap(), doc);
//! ```

use crate::{schema::Schema, Bvon};
use failure::Error;

mod constants;
pub mod de;
pub mod ser;

pub use de::Reader;
pub use ser::{Serializer, SerializerExt, Writer};

/// Encodes one value into a fresh byte vector.
///
/// # Example
///
/// ```
/// use bvon::{serialize, Bvon};
///
/// let bytes = serialize(&Bvon::Null).unwrap();
/// assert_eq!(bytes, vec![0x1]);
/// ```
pub fn serialize(value: &Bvon) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new();
    let bytes = writer.write(value)?;
    Ok(bytes.to_vec())
}

/// Encodes one value with field names pre-interned from a schema.
pub fn serialize_with(value: &Bvon, schema: &Schema) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new();
    let bytes = writer.write_with(value, schema)?;
    Ok(bytes.to_vec())
}

/// Encodes a sequence of values into independent byte ranges, optionally
/// applying the same schema to every element for shared compression.
pub fn serialize_collection(
    values: &[Bvon],
    schema: Option<&Schema>,
) -> Result<Vec<Vec<u8>>, Error> {
    Writer::new().write_collection(values, schema)
}

/// Decodes one complete value from the start of the buffer.
///
/// # Example
///
/// ```
/// use bvon::{deserialize, serialize, Bvon};
///
/// let bytes = serialize(&Bvon::from("hello")).unwrap();
///
/// match deserialize(&bytes) {
///     Ok(value) => assert_eq!(value, Bvon::from("hello")),
///     Err(_) => panic!("decoding failed"),
/// }
/// ```
pub fn deserialize(buffer: &[u8]) -> Result<Bvon, Error> {
    Reader::new().read(buffer)
}

/// Decodes one complete value with field names pre-interned from a schema.
pub fn deserialize_with(buffer: &[u8], schema: &Schema) -> Result<Bvon, Error> {
    Reader::new().read_with(buffer, schema)
}

/// Decodes a sequence of independently encoded values.
pub fn deserialize_collection<B: AsRef<[u8]>>(
    buffers: &[B],
    schema: Option<&Schema>,
) -> Result<Vec<Bvon>, Error> {
    Reader::new().read_collection(buffers, schema)
}

#[cfg(test)]
mod tests {
    use super::ser::SerializerExt;
    use super::*;
    use crate::{Constructors, Int64, Regex, VecMap};
    use chrono::{TimeZone, Utc};
    use num_bigint::BigUint;

    fn record(fields: Vec<(&str, Bvon)>) -> Bvon {
        Bvon::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<VecMap<_, _>>(),
        )
    }

    #[test]
    fn null_is_one_byte() {
        assert_eq!(serialize(&Bvon::Null).unwrap(), vec![0x1]);
    }

    #[test]
    fn absent_folds_into_null() {
        assert_eq!(serialize(&Bvon::Undefined).unwrap(), vec![0x1]);
        // a foreign UNDEFINED tag still decodes to the absent value
        assert_eq!(deserialize(&[0x0]).unwrap(), Bvon::Undefined);
    }

    #[test]
    fn booleans() {
        assert_eq!(serialize(&Bvon::from(true)).unwrap(), vec![0x7, 1]);
        assert_eq!(serialize(&Bvon::from(false)).unwrap(), vec![0x7, 0]);
    }

    #[test]
    fn int32_max_stays_int32() {
        let out = serialize(&Bvon::from(2_147_483_647i64)).unwrap();
        assert_eq!(out, vec![0x2, 0xff, 0xff, 0xff, 0x7f]);
    }

    #[test]
    fn int32_max_plus_one_widens_to_int64() {
        let out = serialize(&Bvon::from(2_147_483_648i64)).unwrap();
        assert_eq!(out, vec![0x3, 0, 0, 0, 0x80, 0, 0, 0, 0]);
    }

    #[test]
    fn largest_safe_integer_is_int64() {
        let out = serialize(&Bvon::from(9_007_199_254_740_991i64)).unwrap();
        assert_eq!(out[0], 0x3);
        assert_eq!(out[1..], [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x1f, 0]);
    }

    #[test]
    fn unsafe_magnitude_falls_back_to_double() {
        // 2^53 + 1 is not exactly representable
        let out = serialize(&Bvon::from(9_007_199_254_740_993.0)).unwrap();
        assert_eq!(out[0], 0x4);
    }

    #[test]
    fn negative_zero_is_double() {
        let out = serialize(&Bvon::from(-0.0)).unwrap();
        assert_eq!(out[0], 0x4);
        assert_eq!(out[1..], (-0.0f64).to_le_bytes());
    }

    #[test]
    fn fractions_are_doubles() {
        let out = serialize(&Bvon::from(1.5)).unwrap();
        assert_eq!(out[0], 0x4);
        assert_eq!(deserialize(&out).unwrap(), Bvon::from(1.5));
    }

    #[test]
    fn int64_payload_is_low_word_first() {
        let out = serialize(&Bvon::Int64(Int64::from(0x0102_0304_0506_0708i64))).unwrap();
        assert_eq!(out, vec![0x3, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn string_header_widens_at_256_and_65536() {
        let small = serialize(&Bvon::from("w".repeat(255).as_str())).unwrap();
        assert_eq!(&small[..3], &[0x6, 8, 255]);
        assert_eq!(small.len(), 3 + 255);

        let medium = serialize(&Bvon::from("w".repeat(256).as_str())).unwrap();
        assert_eq!(&medium[..4], &[0x6, 16, 0, 1]);

        let large = serialize(&Bvon::from("w".repeat(65536).as_str())).unwrap();
        assert_eq!(&large[..6], &[0x6, 32, 0, 0, 1, 0]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn four_gigabyte_lengths_are_rejected() {
        let out: &mut Vec<u8> = &mut Vec::new();
        assert!(out.put_header(0x1_0000_0000).is_err());
        assert!(out.put_header(0xffff_ffff).is_ok());
    }

    #[test]
    fn code_points_beyond_unicode_are_rejected() {
        let out: &mut Vec<u8> = &mut Vec::new();
        assert!(out.put_code_point(0x10_ffff).is_ok());
        assert!(out.put_code_point(0x11_0000).is_err());
    }

    #[test]
    fn multibyte_text_round_trips() {
        let value = Bvon::from("héllo wörld \u{1f980} 漢字");
        let out = serialize(&value).unwrap();
        assert_eq!(deserialize(&out).unwrap(), value);
    }

    #[test]
    fn bigint_chunks_are_big_endian_and_minimal() {
        let out = serialize(&Bvon::BigInt(BigUint::from(0x1_0000_0000u64))).unwrap();
        assert_eq!(out, vec![0x5, 8, 5, 1, 0, 0, 0, 0]);

        let out = serialize(&Bvon::BigInt(BigUint::from(0u32))).unwrap();
        assert_eq!(out, vec![0x5, 8, 0]);

        let big = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let enc = serialize(&Bvon::BigInt(big.clone())).unwrap();
        assert_eq!(deserialize(&enc).unwrap(), Bvon::BigInt(big));
    }

    #[test]
    fn date_round_trips_at_millisecond_resolution() {
        let date = Utc.timestamp_millis_opt(1_600_000_000_123).single().unwrap();
        let value = Bvon::Date(date);
        let out = serialize(&value).unwrap();
        assert_eq!(out[0], 0x8);
        assert_eq!(deserialize(&out).unwrap(), value);
    }

    #[test]
    fn object_keys_intern_within_one_document() {
        let doc = Bvon::Array(vec![
            record(vec![("k", Bvon::from(1))]),
            record(vec![("k", Bvon::from(2))]),
        ]);
        let out = serialize(&doc).unwrap();

        // first occurrence spelled out, second compressed to a reference
        let spelled: Vec<usize> = out
            .windows(2)
            .enumerate()
            .filter(|(_, w)| *w == [1, b'k'])
            .map(|(i, _)| i)
            .collect();
        assert_eq!(spelled.len(), 1);
        assert!(out.contains(&0xe));

        assert_eq!(deserialize(&out).unwrap(), doc);
    }

    #[test]
    fn interning_resets_between_writes() {
        let doc = record(vec![("key", Bvon::from(1))]);
        let mut writer = Writer::new();
        let first = writer.write(&doc).unwrap().to_vec();
        let second = writer.write(&doc).unwrap().to_vec();
        assert_eq!(first, second);
        // the key is spelled out, not a back-reference
        assert_eq!(second[3], 0x6);
    }

    #[test]
    fn regex_is_two_nested_strings() {
        let value = Bvon::Regex(Regex::new("a+b", "gi"));
        let out = serialize(&value).unwrap();
        assert_eq!(
            out,
            vec![0xf, 0x6, 8, 3, b'a', b'+', b'b', 0x6, 8, 2, b'g', b'i']
        );
        assert_eq!(deserialize(&out).unwrap(), value);
    }

    #[test]
    fn constructor_round_trips_through_registry() {
        let mut constructors = Constructors::new();
        constructors.register(1, |args| {
            let mut args = args.into_iter();
            Ok(Bvon::Object(
                vec![
                    ("x".to_string(), args.next().unwrap_or(Bvon::Null)),
                    ("y".to_string(), args.next().unwrap_or(Bvon::Null)),
                ]
                .into_iter()
                .collect(),
            ))
        });

        let value = Bvon::ext(1, vec![Bvon::from(3), Bvon::from(4)]);
        let out = serialize(&value).unwrap();
        assert_eq!(out[0], 0xff);

        let reader = Reader::with_constructors(constructors);
        let rebuilt = reader.read(&out).unwrap();
        assert_eq!(
            rebuilt,
            record(vec![("x", Bvon::from(3)), ("y", Bvon::from(4))])
        );
    }

    #[test]
    fn unregistered_constructor_fails() {
        let value = Bvon::ext(9, vec![]);
        let out = serialize(&value).unwrap();
        assert!(deserialize(&out).is_err());
    }

    #[test]
    fn unknown_tag_fails() {
        assert!(deserialize(&[0x42]).is_err());
    }

    #[test]
    fn unknown_length_selector_fails() {
        // STRING tag followed by a selector that is not 8/16/32
        assert!(deserialize(&[0x6, 7, 0]).is_err());
    }

    #[test]
    fn truncated_buffers_fail() {
        assert!(deserialize(&[]).is_err());
        assert!(deserialize(&[0x2, 1, 2]).is_err());
        assert!(deserialize(&[0x6, 8, 10, b'a']).is_err());
    }

    #[test]
    fn collections_reset_state_between_elements() {
        let docs = vec![
            record(vec![("a", Bvon::from(1)), ("b", Bvon::from(2))]),
            record(vec![("a", Bvon::from(3)), ("b", Bvon::from(4))]),
        ];
        let chunks = serialize_collection(&docs, None).unwrap();
        assert_eq!(chunks.len(), 2);
        // independent ranges: both spell their keys out in full
        assert_eq!(chunks[0].len(), chunks[1].len());

        let back = deserialize_collection(&chunks, None).unwrap();
        assert_eq!(back, docs);
    }
}
