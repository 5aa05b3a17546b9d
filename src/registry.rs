//! Extension-type constructor registry.
//!
//! An extension value travels as a registry code plus an argument value
//! (canonically an array). The writer emits [`Bvon::Ext`](crate::Bvon::Ext)
//! directly — application types opt in by converting themselves through
//! [`BvonRep::to_bvon`](crate::rep::BvonRep::to_bvon) — while the reader
//! resolves codes through the [`Constructors`] table it was built with.
//! Decoding a code with no registered constructor is a fatal format error.
//!
//! # Example
//!
//! ```
//! use bvon::{Bvon, Constructors, Reader, serialize};
//!
//! let mut constructors = Constructors::new();
//! constructors.register(1, |args| {
//!     let mut args = args.into_iter();
//!     Ok(Bvon::Object(
//!         vec![
//!             ("x".to_string(), args.next().unwrap_or(Bvon::Null)),
//!             ("y".to_string(), args.next().unwrap_or(Bvon::Null)),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     ))
//! });
//!
//! let point = Bvon::ext(1, vec![Bvon::from(3), Bvon::from(4)]);
//! let bytes = serialize(&point).unwrap();
//!
//! let reader = Reader::with_constructors(constructors);
//! let rebuilt = reader.read(&bytes).unwrap();
//!
//! assert_eq!(rebuilt.to_object().unwrap().get("x"), Some(&Bvon::from(3)));
//! ```

use crate::Bvon;
use failure::Error;
use hashbrown::HashMap;

/// Rebuilds a decoded extension value from its positional arguments.
pub type BuildFn = fn(Vec<Bvon>) -> Result<Bvon, Error>;

#[derive(Clone, Default)]
/// A table of extension rebuild functions keyed by registry code.
///
/// Each [`Reader`](crate::Reader) owns its table; there is no process-wide
/// registry.
pub struct Constructors {
    builders: HashMap<u32, BuildFn>,
}

impl Constructors {
    /// Creates an empty table.
    pub fn new() -> Constructors {
        Constructors::default()
    }

    /// Registers a rebuild function for a code. A later registration for
    /// the same code replaces the earlier one.
    pub fn register(&mut self, code: u32, build: BuildFn) {
        self.builders.insert(code, build);
    }

    /// Looks up the rebuild function for a code.
    pub fn get(&self, code: u32) -> Option<BuildFn> {
        self.builders.get(&code).copied()
    }
}

impl std::fmt::Debug for Constructors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut codes: Vec<u32> = self.builders.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("Constructors").field("codes", &codes).finish()
    }
}
