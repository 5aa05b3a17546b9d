pub use crate::{
    deserialize, deserialize_collection, deserialize_with, encoding::Reader, encoding::Writer,
    rep::BvonRep, serialize, serialize_collection, serialize_with, Bvon, Constructors, Int64,
    Regex, Schema, Uoid, VecMap, VecSet,
};
pub use bytes::Bytes;
pub use num_bigint::BigUint;
pub use std::{convert::TryFrom, str::FromStr};
