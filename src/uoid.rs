//! Opaque unique object identifiers.
//!
//! A [`Uoid`] is a 17-byte identity: a 4-byte big-endian unix-seconds
//! timestamp, 6 process-unique random bytes, 3 random bytes, a 3-byte
//! big-endian counter, and a version byte. Its canonical text form is 28
//! characters of a custom base32 alphabet with no padding.

use crate::errors::BvonError;
use chrono::{DateTime, TimeZone, Utc};
use failure::Error;
use lazy_static::lazy_static;
use rand::RngCore;
use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};

const BASE32_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
const ID_LEN: usize = 17;
const TEXT_LEN: usize = 28;
const VERSION: u8 = 1;

lazy_static! {
    static ref PROCESS_UNIQUE: [u8; 6] = {
        let mut bytes = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    };
    static ref COUNTER: AtomicU32 = {
        let mut bytes = [0u8; 3];
        rand::thread_rng().fill_bytes(&mut bytes);
        AtomicU32::new(
            (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32,
        )
    };
}

fn next_counter() -> u32 {
    (COUNTER.fetch_add(1, Ordering::Relaxed) + 1) % 0xff_ffff
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8 + 4) / 5);
    let mut value = 0u32;
    let mut bits = 0u32;

    for &byte in bytes {
        value = (value << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            out.push(BASE32_ALPHABET[((value >> (bits - 5)) & 0x1f) as usize] as char);
            bits -= 5;
        }
    }

    if bits > 0 {
        out.push(BASE32_ALPHABET[((value << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}

fn decode_base32(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut value = 0u32;
    let mut bits = 0u32;

    for ch in text.bytes() {
        let digit = BASE32_ALPHABET.iter().position(|&c| c == ch)?;
        value = (value << 5) | digit as u32;
        bits += 5;
        if bits >= 8 {
            out.push(((value >> (bits - 8)) & 0xff) as u8);
            bits -= 8;
        }
    }

    Some(out)
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
/// A fixed-length unique identifier with a canonical base32 text form.
///
/// # Example
///
/// ```
/// use bvon::Uoid;
///
/// let id = Uoid::generate();
/// let text = id.to_string();
///
/// assert_eq!(text.len(), 28);
/// assert_eq!(text.parse::<Uoid>().unwrap(), id);
/// ```
pub struct Uoid {
    id: [u8; ID_LEN],
}

impl Uoid {
    /// Generates a fresh identifier stamped with the current time.
    pub fn generate() -> Uoid {
        Uoid::generate_at(Utc::now().timestamp() as u32)
    }

    /// Generates a fresh identifier stamped with the given unix seconds.
    pub fn generate_at(seconds: u32) -> Uoid {
        let mut id = [0u8; ID_LEN];
        id[0..4].copy_from_slice(&seconds.to_be_bytes());
        id[4..10].copy_from_slice(&PROCESS_UNIQUE[..]);

        let mut random = [0u8; 3];
        rand::thread_rng().fill_bytes(&mut random);
        id[10..13].copy_from_slice(&random);

        let inc = next_counter();
        id[13] = (inc >> 16) as u8;
        id[14] = (inc >> 8) as u8;
        id[15] = inc as u8;
        id[16] = VERSION;

        Uoid { id }
    }

    /// Wraps raw identifier bytes.
    pub fn from_bytes(id: [u8; ID_LEN]) -> Uoid {
        Uoid { id }
    }

    /// The raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.id
    }

    /// The creation instant, at second resolution.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.id[0], self.id[1], self.id[2], self.id[3]]);
        Utc.timestamp(seconds as i64, 0)
    }

    /// The format version byte.
    pub fn version(&self) -> u8 {
        self.id[ID_LEN - 1]
    }
}

impl fmt::Display for Uoid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", encode_base32(&self.id))
    }
}

impl fmt::Debug for Uoid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Uoid({})", self)
    }
}

impl FromStr for Uoid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Uoid, Error> {
        if s.len() != TEXT_LEN {
            return Err(BvonError::Format(format!(
                "identifier text must be {} characters, got {}",
                TEXT_LEN,
                s.len()
            ))
            .into());
        }
        let bytes = decode_base32(s)
            .ok_or_else(|| BvonError::Format(format!("invalid identifier text {:?}", s)))?;
        let mut id = [0u8; ID_LEN];
        id.copy_from_slice(&bytes[..ID_LEN]);
        Ok(Uoid { id })
    }
}
