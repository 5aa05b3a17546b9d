//! Conversions between Rust values and [`Bvon`].
//!
//! [`BvonRep`] is the opt-in "to-wire" conversion capability: application
//! types describe how they become a [`Bvon`] value (often a
//! [`Bvon::Ext`]) and how they come back. Containers compose: a
//! `Vec<HashMap<String, u32>>` round-trips without any manual plumbing.

use crate::{vecmap::VecMap, Bvon, Int64, Regex, Uoid};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use num_bigint::BigUint;
use std::convert::TryFrom;

/// A value representable as [`Bvon`].
pub trait BvonRep: Clone + Sized {
    /// Converts the value into [`Bvon`].
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::rep::BvonRep;
    ///
    /// let b_num = 1.to_bvon();
    /// ```
    fn to_bvon(&self) -> Bvon {
        self.clone().into_bvon()
    }

    /// Consumes the value, converting it into [`Bvon`].
    fn into_bvon(self) -> Bvon {
        self.to_bvon()
    }

    /// Converts the value back from [`Bvon`].
    ///
    /// # Example
    ///
    /// ```
    /// use bvon::rep::BvonRep;
    ///
    /// let b = "foo".to_string().into_bvon();
    /// assert_eq!(String::from_bvon(b).unwrap(), "foo");
    /// ```
    fn from_bvon(value: Bvon) -> Option<Self>;
}

macro_rules! int_rep {
    ($t:ty) => {
        impl BvonRep for $t {
            fn into_bvon(self) -> Bvon {
                Bvon::from(self as i64)
            }

            fn from_bvon(value: Bvon) -> Option<Self> {
                let wide = match value {
                    Bvon::Int32(i) => i as i64,
                    Bvon::Int64(i) => i.to_i64(),
                    _ => return None,
                };
                <$t>::try_from(wide).ok()
            }
        }
    };
}

int_rep!(i8);
int_rep!(i16);
int_rep!(i32);
int_rep!(i64);
int_rep!(isize);
int_rep!(u8);
int_rep!(u16);
int_rep!(u32);
int_rep!(usize);

impl BvonRep for u64 {
    fn into_bvon(self) -> Bvon {
        Bvon::from(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Int32(i) => u64::try_from(i).ok(),
            Bvon::Int64(i) => {
                if i.is_negative() {
                    None
                } else {
                    Some(i.to_i64() as u64)
                }
            }
            _ => None,
        }
    }
}

impl BvonRep for bool {
    fn into_bvon(self) -> Bvon {
        Bvon::Bool(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl BvonRep for f64 {
    fn into_bvon(self) -> Bvon {
        // always a double: the narrowing conversion is `From<f64>`
        Bvon::Double(self.to_bits())
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Double(bits) => Some(f64::from_bits(bits)),
            Bvon::Int32(i) => Some(i as f64),
            Bvon::Int64(i) => Some(i.to_f64()),
            _ => None,
        }
    }
}

impl BvonRep for Bvon {
    fn into_bvon(self) -> Bvon {
        self
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        Some(value)
    }
}

impl BvonRep for String {
    fn into_bvon(self) -> Bvon {
        Bvon::String(self)
    }

    fn to_bvon(&self) -> Bvon {
        Bvon::String(self.clone())
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::String(s) => Some(s),
            _ => None,
        }
    }
}

impl BvonRep for Bytes {
    fn into_bvon(self) -> Bvon {
        Bvon::Bytes(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl BvonRep for Int64 {
    fn into_bvon(self) -> Bvon {
        Bvon::Int64(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Int64(i) => Some(i),
            Bvon::Int32(i) => Some(Int64::from(i)),
            _ => None,
        }
    }
}

impl BvonRep for BigUint {
    fn into_bvon(self) -> Bvon {
        Bvon::BigInt(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::BigInt(n) => Some(n),
            _ => None,
        }
    }
}

impl BvonRep for DateTime<Utc> {
    fn into_bvon(self) -> Bvon {
        Bvon::from(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl BvonRep for Uoid {
    fn into_bvon(self) -> Bvon {
        Bvon::Uoid(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Uoid(id) => Some(id),
            _ => None,
        }
    }
}

impl BvonRep for Regex {
    fn into_bvon(self) -> Bvon {
        Bvon::Regex(self)
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Regex(r) => Some(r),
            _ => None,
        }
    }
}

impl<T: BvonRep> BvonRep for Vec<T> {
    fn into_bvon(self) -> Bvon {
        Bvon::Array(self.into_iter().map(T::into_bvon).collect())
    }

    fn to_bvon(&self) -> Bvon {
        Bvon::Array(self.iter().map(T::to_bvon).collect())
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        value.into_array().ok()?.into_iter().map(T::from_bvon).collect()
    }
}

impl<T: BvonRep> BvonRep for VecMap<String, T> {
    fn into_bvon(self) -> Bvon {
        Bvon::Object(self.into_iter().map(|(k, v)| (k, v.into_bvon())).collect())
    }

    fn to_bvon(&self) -> Bvon {
        Bvon::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_bvon()))
                .collect(),
        )
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        let map = value.into_object().ok()?;
        let mut out = VecMap::with_capacity(map.len());
        for (k, v) in map {
            out.insert(k, T::from_bvon(v)?);
        }
        Some(out)
    }
}

impl<T: BvonRep, S: std::hash::BuildHasher + Default + Clone> BvonRep for HashMap<String, T, S> {
    fn into_bvon(self) -> Bvon {
        Bvon::Object(self.into_iter().map(|(k, v)| (k, v.into_bvon())).collect())
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        value
            .into_object()
            .ok()?
            .into_iter()
            .map(|(k, v)| Some((k, T::from_bvon(v)?)))
            .collect()
    }
}

impl<T: BvonRep> BvonRep for Option<T> {
    fn into_bvon(self) -> Bvon {
        match self {
            Some(v) => v.into_bvon(),
            None => Bvon::Null,
        }
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        match value {
            Bvon::Null | Bvon::Undefined => Some(None),
            other => Some(Some(T::from_bvon(other)?)),
        }
    }
}

impl BvonRep for () {
    fn into_bvon(self) -> Bvon {
        Bvon::Array(vec![])
    }

    fn from_bvon(value: Bvon) -> Option<()> {
        if value.into_array().ok()?.is_empty() {
            Some(())
        } else {
            None
        }
    }
}

impl<A: BvonRep, B: BvonRep> BvonRep for (A, B) {
    fn into_bvon(self) -> Bvon {
        Bvon::Array(vec![self.0.into_bvon(), self.1.into_bvon()])
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        let arr = value.into_array().ok()?;
        if arr.len() != 2 {
            return None;
        }
        let mut iter = arr.into_iter();
        let a = A::from_bvon(iter.next()?)?;
        let b = B::from_bvon(iter.next()?)?;
        Some((a, b))
    }
}

impl<A: BvonRep, B: BvonRep, C: BvonRep> BvonRep for (A, B, C) {
    fn into_bvon(self) -> Bvon {
        Bvon::Array(vec![
            self.0.into_bvon(),
            self.1.into_bvon(),
            self.2.into_bvon(),
        ])
    }

    fn from_bvon(value: Bvon) -> Option<Self> {
        let arr = value.into_array().ok()?;
        if arr.len() != 3 {
            return None;
        }
        let mut iter = arr.into_iter();
        let a = A::from_bvon(iter.next()?)?;
        let b = B::from_bvon(iter.next()?)?;
        let c = C::from_bvon(iter.next()?)?;
        Some((a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_narrow_and_return() {
        assert_eq!(u8::from_bvon(250u8.into_bvon()), Some(250));
        assert_eq!(u8::from_bvon(300i64.into_bvon()), None);
        assert_eq!(i64::from_bvon(Bvon::from(1i64 << 40)), Some(1i64 << 40));
        assert_eq!(u64::from_bvon(Bvon::from(u64::max_value())), Some(u64::max_value()));
    }

    #[test]
    fn options_map_to_null() {
        assert_eq!(None::<u8>.into_bvon(), Bvon::Null);
        assert_eq!(Option::<u8>::from_bvon(Bvon::Null), Some(None));
        assert_eq!(Option::<u8>::from_bvon(Bvon::from(7)), Some(Some(7)));
    }

    #[test]
    fn containers_compose() {
        let mut map: HashMap<String, Vec<u32>> = HashMap::new();
        map.insert("xs".to_string(), vec![1, 2, 3]);

        let round: HashMap<String, Vec<u32>> =
            HashMap::from_bvon(map.clone().into_bvon()).unwrap();
        assert_eq!(round, map);
    }

    #[test]
    fn tuples_travel_as_arrays() {
        let pair = ("id".to_string(), 9u32);
        assert_eq!(<(String, u32)>::from_bvon(pair.clone().into_bvon()), Some(pair));
    }
}
