/// Absent-value tag, 0x0. Accepted on decode, never emitted.
pub(crate) const TAG_UNDEFINED: u8 = 0x0;
/// Null tag, 0x1. Also emitted for absent values.
pub(crate) const TAG_NULL: u8 = 0x1;
/// 32-bit signed integer tag, 0x2.
pub(crate) const TAG_INT32: u8 = 0x2;
/// 64-bit integer tag, 0x3.
pub(crate) const TAG_INT64: u8 = 0x3;
/// IEEE-754 double tag, 0x4.
pub(crate) const TAG_DOUBLE: u8 = 0x4;
/// Arbitrary-precision integer tag, 0x5.
pub(crate) const TAG_BIGINT: u8 = 0x5;
/// UTF-8 string tag, 0x6.
pub(crate) const TAG_STRING: u8 = 0x6;
/// Boolean tag, 0x7.
pub(crate) const TAG_BOOLEAN: u8 = 0x7;
/// Millisecond-instant tag, 0x8.
pub(crate) const TAG_DATE: u8 = 0x8;
/// Ordered record tag, 0x9.
pub(crate) const TAG_OBJECT: u8 = 0x9;
/// Sequence tag, 0xa.
pub(crate) const TAG_ARRAY: u8 = 0xa;
/// Binary blob tag, 0xb.
pub(crate) const TAG_BYTEVIEW: u8 = 0xb;
/// Unique-collection tag, 0xc.
pub(crate) const TAG_SET: u8 = 0xc;
/// Key-value collection tag, 0xd.
pub(crate) const TAG_MAP: u8 = 0xd;
/// Field-name back-reference tag, 0xe.
pub(crate) const TAG_DB_REF: u8 = 0xe;
/// Regular-expression tag, 0xf.
pub(crate) const TAG_REGEX: u8 = 0xf;
/// Unique-identifier tag, 0x10.
pub(crate) const TAG_UOID: u8 = 0x10;
/// Extension-value tag, 0xff.
pub(crate) const TAG_CONSTRUCTOR: u8 = 0xff;

/// Length-header selector for a 1-byte length.
pub(crate) const HEADER_U8: u8 = 8;
/// Length-header selector for a 2-byte little-endian length.
pub(crate) const HEADER_U16: u8 = 16;
/// Length-header selector for a 4-byte little-endian length.
pub(crate) const HEADER_U32: u8 = 32;
