use super::constants::*;
use crate::{
    errors::BvonError, registry::Constructors, schema::Schema, Bvon, Int64, Regex, Uoid, VecMap,
    VecSet,
};
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use failure::{bail, Error};
use num_bigint::BigUint;
use std::ops::{Deref, DerefMut};

/// Input buffer wrapper with byte-level read primitives.
pub(crate) struct BvonBytes(Bytes);

impl Deref for BvonBytes {
    type Target = Bytes;

    fn deref(&self) -> &Bytes {
        &self.0
    }
}

impl DerefMut for BvonBytes {
    fn deref_mut(&mut self) -> &mut Bytes {
        &mut self.0
    }
}

impl From<Bytes> for BvonBytes {
    fn from(b: Bytes) -> Self {
        BvonBytes(b)
    }
}

impl From<Vec<u8>> for BvonBytes {
    fn from(v: Vec<u8>) -> Self {
        BvonBytes(Bytes::from(v))
    }
}

impl<'a> From<&'a [u8]> for BvonBytes {
    fn from(s: &'a [u8]) -> Self {
        BvonBytes(Bytes::from(s))
    }
}

impl BvonBytes {
    #[inline]
    fn take_byte(&mut self) -> Result<u8, Error> {
        if self.is_empty() {
            bail!("buffer was empty, couldn't get byte")
        }
        let byte = self[0];
        let _ = self.split_to(1);
        Ok(byte)
    }

    #[inline]
    fn read_many(&mut self, len: usize) -> Result<Bytes, Error> {
        if self.len() < len {
            bail!(
                "tried to read {} bytes from buffer of size {}",
                len,
                self.len()
            )
        }
        Ok(self.split_to(len))
    }

    #[inline]
    fn read_u16_le(&mut self) -> Result<u16, Error> {
        let bs = self.read_many(2)?;
        Ok(LittleEndian::read_u16(&bs))
    }

    #[inline]
    fn read_u32_le(&mut self) -> Result<u32, Error> {
        let bs = self.read_many(4)?;
        Ok(LittleEndian::read_u32(&bs))
    }

    #[inline]
    fn read_i32_le(&mut self) -> Result<i32, Error> {
        let bs = self.read_many(4)?;
        Ok(LittleEndian::read_i32(&bs))
    }

    #[inline]
    fn read_f64_le(&mut self) -> Result<f64, Error> {
        let bs = self.read_many(8)?;
        Ok(LittleEndian::read_f64(&bs))
    }

    #[inline]
    fn read_int64(&mut self) -> Result<Int64, Error> {
        let bs = self.read_many(8)?;
        Ok(Int64::new(
            LittleEndian::read_i32(&bs[0..4]),
            LittleEndian::read_i32(&bs[4..8]),
            false,
        ))
    }

    /// Reads a length header: selector byte, then the length itself.
    fn read_header(&mut self) -> Result<usize, Error> {
        let selector = self.take_byte()?;
        match selector {
            HEADER_U8 => Ok(self.take_byte()? as usize),
            HEADER_U16 => Ok(self.read_u16_le()? as usize),
            HEADER_U32 => Ok(self.read_u32_le()? as usize),
            unknown => {
                Err(BvonError::Format(format!("invalid length selector {:#x}", unknown)).into())
            }
        }
    }

    fn read_str(&mut self, len: usize) -> Result<String, Error> {
        let bs = self.read_many(len)?;
        String::from_utf8(bs.to_vec())
            .map_err(|e| Error::from(BvonError::Format(format!("invalid text payload: {}", e))))
    }
}

/// The deserializer: reconstructs one value per call from a tagged byte
/// stream.
///
/// A reader owns the [`Constructors`] table used to rebuild extension
/// values; all per-call state (offset, inverse name table, next reference
/// id) is rebuilt for every top-level read, seeded from a [`Schema`] when
/// one is supplied.
#[derive(Debug, Default)]
pub struct Reader {
    constructors: Constructors,
}

impl Reader {
    /// Creates a reader with no registered extension constructors.
    pub fn new() -> Reader {
        Reader::default()
    }

    /// Creates a reader that rebuilds extension values through the given
    /// table.
    pub fn with_constructors(constructors: Constructors) -> Reader {
        Reader { constructors }
    }

    /// Decodes one complete value from the start of the buffer.
    pub fn read(&self, buffer: &[u8]) -> Result<Bvon, Error> {
        Decode::new(buffer.into(), &self.constructors).read_block()
    }

    /// Decodes one complete value with field names pre-interned from a
    /// schema.
    pub fn read_with(&self, buffer: &[u8], schema: &Schema) -> Result<Bvon, Error> {
        Decode::with_schema(buffer.into(), &self.constructors, schema).read_block()
    }

    /// Decodes a sequence of independently encoded values, resetting state
    /// between elements and re-applying the schema (when given) to each.
    pub fn read_collection<B: AsRef<[u8]>>(
        &self,
        buffers: &[B],
        schema: Option<&Schema>,
    ) -> Result<Vec<Bvon>, Error> {
        let mut out = Vec::with_capacity(buffers.len());
        for buffer in buffers {
            let value = match schema {
                Some(schema) => self.read_with(buffer.as_ref(), schema)?,
                None => self.read(buffer.as_ref())?,
            };
            out.push(value);
        }
        Ok(out)
    }
}

struct Decode<'a> {
    buf: BvonBytes,
    names: Vec<String>,
    constructors: &'a Constructors,
}

impl<'a> Decode<'a> {
    fn new(buf: BvonBytes, constructors: &'a Constructors) -> Decode<'a> {
        Decode {
            buf,
            names: Vec::new(),
            constructors,
        }
    }

    fn with_schema(buf: BvonBytes, constructors: &'a Constructors, schema: &Schema) -> Decode<'a> {
        Decode {
            buf,
            names: schema.clone_names(),
            constructors,
        }
    }

    fn read_block(&mut self) -> Result<Bvon, Error> {
        let tag = self.buf.take_byte()?;
        match tag {
            TAG_UNDEFINED => Ok(Bvon::Undefined),
            TAG_NULL => Ok(Bvon::Null),
            TAG_BOOLEAN => Ok(Bvon::Bool(self.buf.take_byte()? != 0)),
            TAG_INT32 => Ok(Bvon::Int32(self.buf.read_i32_le()?)),
            TAG_INT64 => Ok(Bvon::Int64(self.buf.read_int64()?)),
            TAG_DOUBLE => Ok(Bvon::Double(self.buf.read_f64_le()?.to_bits())),
            TAG_DATE => {
                let millis = self.buf.read_int64()?.to_i64();
                match Utc.timestamp_millis_opt(millis).single() {
                    Some(date) => Ok(Bvon::Date(date)),
                    None => bail!("date value {} out of range", millis),
                }
            }
            TAG_BIGINT => {
                let len = self.buf.read_header()?;
                let digits = self.buf.read_many(len)?;
                Ok(Bvon::BigInt(BigUint::from_bytes_be(&digits)))
            }
            TAG_STRING => {
                let len = self.buf.read_header()?;
                Ok(Bvon::String(self.buf.read_str(len)?))
            }
            TAG_UOID => {
                let len = self.buf.read_header()?;
                let text = self.buf.read_str(len)?;
                Ok(Bvon::Uoid(text.parse::<Uoid>()?))
            }
            TAG_BYTEVIEW => {
                let len = self.buf.read_header()?;
                Ok(Bvon::Bytes(self.buf.read_many(len)?))
            }
            TAG_OBJECT => {
                let count = self.buf.read_header()?;
                let mut map = VecMap::with_capacity(count.min(self.buf.len()));
                for _ in 0..count {
                    let key_tag = self.buf.take_byte()?;
                    let key = self.read_key(key_tag)?;
                    let value = self.read_block()?;
                    map.insert(key, value);
                }
                Ok(Bvon::Object(map))
            }
            TAG_ARRAY => {
                let len = self.buf.read_header()?;
                let mut items = Vec::with_capacity(len.min(self.buf.len()));
                for _ in 0..len {
                    items.push(self.read_block()?);
                }
                Ok(Bvon::Array(items))
            }
            TAG_SET => {
                let size = self.buf.read_header()?;
                let mut set = VecSet::new();
                for _ in 0..size {
                    set.insert(self.read_block()?);
                }
                Ok(Bvon::Set(set))
            }
            TAG_MAP => {
                let size = self.buf.read_header()?;
                let mut entries = Vec::with_capacity(size.min(self.buf.len()));
                for _ in 0..size {
                    let key = self.read_block()?;
                    let value = self.read_block()?;
                    entries.push((key, value));
                }
                Ok(Bvon::Map(entries))
            }
            TAG_REGEX => {
                let source = match self.read_block()? {
                    Bvon::String(s) => s,
                    other => {
                        return Err(BvonError::Format(format!(
                            "regex source must be a string, found {:?}",
                            other
                        ))
                        .into());
                    }
                };
                let flags = match self.read_block()? {
                    Bvon::String(s) => s,
                    other => {
                        return Err(BvonError::Format(format!(
                            "regex flags must be a string, found {:?}",
                            other
                        ))
                        .into());
                    }
                };
                Ok(Bvon::Regex(Regex::new(source, flags)))
            }
            TAG_CONSTRUCTOR => {
                let code = self.buf.read_header()? as u32;
                let args = self.read_block()?;
                let build = self.constructors.get(code).ok_or_else(|| {
                    BvonError::Format(format!("constructor {} is unknown", code))
                })?;
                let args = match args {
                    Bvon::Array(items) => items,
                    other => vec![other],
                };
                build(args)
            }
            unknown => {
                Err(BvonError::Format(format!("unsupported tag {:#x}", unknown)).into())
            }
        }
    }

    fn read_key(&mut self, key_tag: u8) -> Result<String, Error> {
        match key_tag {
            TAG_DB_REF => {
                let id = self.buf.read_header()?;
                if id == 0 || id > self.names.len() {
                    return Err(BvonError::Format(format!(
                        "unknown field-name reference {}",
                        id
                    ))
                    .into());
                }
                Ok(self.names[id - 1].clone())
            }
            TAG_STRING => {
                let len = self.buf.read_header()?;
                let name = self.buf.read_str(len)?;
                self.names.push(name.clone());
                Ok(name)
            }
            unknown => {
                Err(BvonError::Format(format!("invalid key tag {:#x}", unknown)).into())
            }
        }
    }
}
