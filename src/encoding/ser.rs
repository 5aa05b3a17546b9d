use super::constants::*;
use crate::{errors::BvonError, schema::Schema, util::biguint_byte_length, Bvon, Int64};
use failure::Error;
use hashbrown::HashMap;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use smallvec::SmallVec;

/// A sink for encoder output.
pub trait Serializer {
    /// The type of the finished output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) {
        self.push(u)
    }

    fn put_slice(&mut self, slice: &[u8]) {
        self.extend_from_slice(slice)
    }

    fn finalize(self) -> Self::Out {
        self
    }
}

/// Byte-level write primitives layered over any [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Add a [`u16`] in little-endian order.
    fn put_u16_le(&mut self, u: u16);
    /// Add a [`u32`] in little-endian order.
    fn put_u32_le(&mut self, u: u32);
    /// Add an [`i32`] in little-endian order.
    fn put_i32_le(&mut self, i: i32);
    /// Add an [`f64`] in IEEE-754 little-endian order.
    fn put_f64_le(&mut self, f: f64);
    /// Add an [`Int64`] payload: low word then high word, each
    /// little-endian, one byte at a time.
    fn put_int64(&mut self, i: Int64);
    /// Add a length header: a width selector byte followed by the length
    /// itself in 1, 2, or 4 little-endian bytes. Lengths of 2^32 and above
    /// do not fit any selector and fail with [`BvonError::Range`].
    fn put_header(&mut self, len: usize) -> Result<(), Error>;
    /// Add one code point as 1-4 UTF-8 bytes. Values at or above 0x110000
    /// are outside Unicode and fail with [`BvonError::Encoding`].
    fn put_code_point(&mut self, code_point: u32) -> Result<(), Error>;
    /// Add a string payload: length header then UTF-8 bytes.
    fn put_str(&mut self, s: &str) -> Result<(), Error>;
    /// Add an arbitrary-precision payload: length header then the
    /// minimal-length big-endian magnitude, emitted in 4-, 2-, then 1-byte
    /// chunks from the most-significant end inward.
    fn put_biguint(&mut self, n: &BigUint) -> Result<(), Error>;
}

impl<S: Serializer> SerializerExt for S {
    #[inline]
    fn put_u16_le(&mut self, u: u16) {
        self.put_u8(u as u8);
        self.put_u8((u >> 8) as u8);
    }

    #[inline]
    fn put_u32_le(&mut self, u: u32) {
        self.put_slice(&u32::to_le_bytes(u));
    }

    #[inline]
    fn put_i32_le(&mut self, i: i32) {
        self.put_slice(&i32::to_le_bytes(i));
    }

    #[inline]
    fn put_f64_le(&mut self, f: f64) {
        self.put_slice(&f64::to_le_bytes(f));
    }

    #[inline]
    fn put_int64(&mut self, i: Int64) {
        let low = i.low() as u32;
        let high = i.high() as u32;
        self.put_u8(low as u8);
        self.put_u8((low >> 8) as u8);
        self.put_u8((low >> 16) as u8);
        self.put_u8((low >> 24) as u8);
        self.put_u8(high as u8);
        self.put_u8((high >> 8) as u8);
        self.put_u8((high >> 16) as u8);
        self.put_u8((high >> 24) as u8);
    }

    fn put_header(&mut self, len: usize) -> Result<(), Error> {
        if len < 0x100 {
            self.put_u8(HEADER_U8);
            self.put_u8(len as u8);
        } else if len < 0x1_0000 {
            self.put_u8(HEADER_U16);
            self.put_u16_le(len as u16);
        } else if (len as u64) < 0x1_0000_0000 {
            self.put_u8(HEADER_U32);
            self.put_u32_le(len as u32);
        } else {
            return Err(BvonError::Range(format!(
                "length {} exceeds the 4-byte header limit",
                len
            ))
            .into());
        }
        Ok(())
    }

    fn put_code_point(&mut self, code_point: u32) -> Result<(), Error> {
        if code_point < 0x80 {
            self.put_u8(code_point as u8);
        } else if code_point < 0x800 {
            self.put_u8((code_point >> 6) as u8 | 0xc0);
            self.put_u8((code_point & 0x3f) as u8 | 0x80);
        } else if code_point < 0x1_0000 {
            self.put_u8((code_point >> 12) as u8 | 0xe0);
            self.put_u8((code_point >> 6 & 0x3f) as u8 | 0x80);
            self.put_u8((code_point & 0x3f) as u8 | 0x80);
        } else if code_point < 0x11_0000 {
            self.put_u8((code_point >> 18) as u8 | 0xf0);
            self.put_u8((code_point >> 12 & 0x3f) as u8 | 0x80);
            self.put_u8((code_point >> 6 & 0x3f) as u8 | 0x80);
            self.put_u8((code_point & 0x3f) as u8 | 0x80);
        } else {
            return Err(
                BvonError::Encoding(format!("invalid code point {:#x}", code_point)).into(),
            );
        }
        Ok(())
    }

    fn put_str(&mut self, s: &str) -> Result<(), Error> {
        self.put_header(s.len())?;
        for c in s.chars() {
            self.put_code_point(c as u32)?;
        }
        Ok(())
    }

    fn put_biguint(&mut self, n: &BigUint) -> Result<(), Error> {
        let byte_length = biguint_byte_length(n);
        self.put_header(byte_length)?;

        let mut digits: SmallVec<[u8; 16]> = SmallVec::from_elem(0, byte_length);
        let mut pos = byte_length;
        let word_max = BigUint::from(0xffff_ffffu32);
        let mut left = n.clone();

        while left > word_max {
            pos -= 4;
            let word = (&left & &word_max).to_u32().unwrap_or(0);
            digits[pos..pos + 4].copy_from_slice(&word.to_be_bytes());
            left >>= 32;
        }

        let mut small = left.to_u32().unwrap_or(0);

        while small > 0xffff {
            pos -= 2;
            digits[pos..pos + 2].copy_from_slice(&((small & 0xffff) as u16).to_be_bytes());
            small >>= 16;
        }

        while small > 0 {
            pos -= 1;
            digits[pos] = (small & 0xff) as u8;
            small >>= 8;
        }

        self.put_slice(&digits);
        Ok(())
    }
}

/// The serializer: walks a value and emits its tagged byte stream into a
/// reusable output buffer.
///
/// The interning table and reference counter are rebuilt for every
/// top-level call (seeded from a [`Schema`] when one is supplied), so no
/// state leaks between independent writes. The slice returned by a write
/// borrows the instance's buffer and is valid only until the next write.
#[derive(Debug, Default)]
pub struct Writer {
    out: Vec<u8>,
}

impl Writer {
    /// Creates a writer with an empty output buffer.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// Creates a writer whose buffer starts with the given capacity.
    pub fn with_capacity(capacity: usize) -> Writer {
        Writer {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Encodes one value, interning repeated field names within this call
    /// only.
    pub fn write(&mut self, value: &Bvon) -> Result<&[u8], Error> {
        self.out.clear();
        let mut encode = Encode::new(&mut self.out);
        encode.write_block(value)?;
        Ok(&self.out)
    }

    /// Encodes one value with field names pre-interned from a schema.
    pub fn write_with(&mut self, value: &Bvon, schema: &Schema) -> Result<&[u8], Error> {
        self.out.clear();
        let mut encode = Encode::with_schema(&mut self.out, schema);
        encode.write_block(value)?;
        Ok(&self.out)
    }

    /// Encodes a sequence of values into independent byte ranges, with the
    /// interning state reset between elements and the schema (when given)
    /// re-applied to every element.
    pub fn write_collection(
        &mut self,
        values: &[Bvon],
        schema: Option<&Schema>,
    ) -> Result<Vec<Vec<u8>>, Error> {
        let mut chunks = Vec::with_capacity(values.len());
        for value in values {
            let chunk = match schema {
                Some(schema) => self.write_with(value, schema)?,
                None => self.write(value)?,
            };
            chunks.push(chunk.to_vec());
        }
        Ok(chunks)
    }
}

pub(crate) struct Encode<'a, S: Serializer> {
    out: &'a mut S,
    refs: HashMap<String, u32>,
    ref_index: u32,
}

impl<'a, S: Serializer> Encode<'a, S> {
    pub(crate) fn new(out: &'a mut S) -> Encode<'a, S> {
        Encode {
            out,
            refs: HashMap::new(),
            ref_index: 0,
        }
    }

    pub(crate) fn with_schema(out: &'a mut S, schema: &Schema) -> Encode<'a, S> {
        Encode {
            out,
            refs: schema.clone_ids(),
            ref_index: schema.len() as u32,
        }
    }

    pub(crate) fn write_block(&mut self, value: &Bvon) -> Result<(), Error> {
        match value {
            // absent and null share a wire representation
            Bvon::Undefined | Bvon::Null => self.out.put_u8(TAG_NULL),
            Bvon::Bool(b) => {
                self.out.put_u8(TAG_BOOLEAN);
                self.out.put_u8(*b as u8);
            }
            Bvon::Int32(i) => {
                self.out.put_u8(TAG_INT32);
                self.out.put_i32_le(*i);
            }
            Bvon::Int64(i) => {
                self.out.put_u8(TAG_INT64);
                self.out.put_int64(*i);
            }
            Bvon::Double(bits) => {
                self.out.put_u8(TAG_DOUBLE);
                self.out.put_f64_le(f64::from_bits(*bits));
            }
            Bvon::BigInt(n) => {
                self.out.put_u8(TAG_BIGINT);
                self.out.put_biguint(n)?;
            }
            Bvon::String(s) => {
                self.out.put_u8(TAG_STRING);
                self.out.put_str(s)?;
            }
            Bvon::Bytes(b) => {
                self.out.put_u8(TAG_BYTEVIEW);
                self.out.put_header(b.len())?;
                self.out.put_slice(b);
            }
            Bvon::Date(d) => {
                self.out.put_u8(TAG_DATE);
                self.out.put_int64(Int64::from(d.timestamp_millis()));
            }
            Bvon::Object(map) => {
                self.out.put_u8(TAG_OBJECT);
                self.out.put_header(map.len())?;
                for (key, field) in map.iter() {
                    self.write_key(key)?;
                    self.write_block(field)?;
                }
            }
            Bvon::Array(items) => {
                self.out.put_u8(TAG_ARRAY);
                self.out.put_header(items.len())?;
                for item in items {
                    self.write_block(item)?;
                }
            }
            Bvon::Set(set) => {
                self.out.put_u8(TAG_SET);
                self.out.put_header(set.len())?;
                for member in set.iter() {
                    self.write_block(member)?;
                }
            }
            Bvon::Map(entries) => {
                self.out.put_u8(TAG_MAP);
                self.out.put_header(entries.len())?;
                for (key, val) in entries {
                    self.write_block(key)?;
                    self.write_block(val)?;
                }
            }
            Bvon::Regex(regex) => {
                self.out.put_u8(TAG_REGEX);
                self.out.put_u8(TAG_STRING);
                self.out.put_str(&regex.source)?;
                self.out.put_u8(TAG_STRING);
                self.out.put_str(&regex.flags)?;
            }
            Bvon::Uoid(id) => {
                self.out.put_u8(TAG_UOID);
                self.out.put_str(&id.to_string())?;
            }
            Bvon::Ext(code, args) => {
                self.out.put_u8(TAG_CONSTRUCTOR);
                self.out.put_header(*code as usize)?;
                self.write_block(args)?;
            }
        }
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<(), Error> {
        if let Some(&id) = self.refs.get(key) {
            self.out.put_u8(TAG_DB_REF);
            self.out.put_header(id as usize)?;
        } else {
            self.ref_index += 1;
            self.refs.insert(key.to_string(), self.ref_index);
            self.out.put_u8(TAG_STRING);
            self.out.put_str(key)?;
        }
        Ok(())
    }
}
