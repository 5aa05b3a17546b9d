//! Precomputed field-name reference tables.
//!
//! A [`Schema`] maps field names to small integer reference ids so that
//! repeated keys across one or many encoded values compress into
//! back-references instead of repeated text. Build one from a
//! representative value, then pass it to every write and read of documents
//! with that shape.
//!
//! # Example
//!
//! ```
//! use bvon::{Bvon, Schema, VecMap};
//!
//! let sample = Bvon::Object(
//!     vec![("id".to_string(), Bvon::from(1)), ("name".to_string(), Bvon::from("a"))]
//!         .into_iter()
//!         .collect::<VecMap<_, _>>(),
//! );
//!
//! let schema = Schema::build(&sample);
//! assert_eq!(schema.id_of("id"), Some(1));
//! assert_eq!(schema.id_of("name"), Some(2));
//! assert_eq!(schema.name_of(2), Some("name"));
//! ```

use crate::Bvon;
use hashbrown::HashMap;

#[derive(Clone, Debug, Default)]
/// A field-name interning table: name → id and id → name, with ids
/// assigned sequentially from 1 in first-discovery order.
///
/// A schema is immutable once built and can be shared read-only across any
/// number of concurrent writers and readers. It has no relationship to the
/// values it was built from beyond the name set.
pub struct Schema {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl Schema {
    /// Builds a schema by walking a sample value depth-first, registering
    /// every previously-unseen field name of an ordered record.
    ///
    /// The walk recurses into record values and sequence elements
    /// (including sequences of sequences) but does not descend into other
    /// container kinds.
    pub fn build(sample: &Bvon) -> Schema {
        let mut schema = Schema::default();
        schema.walk(sample);
        schema
    }

    fn walk(&mut self, value: &Bvon) {
        match value {
            Bvon::Object(map) => {
                for (key, field) in map.iter() {
                    if !self.ids.contains_key(key.as_str()) {
                        let id = self.names.len() as u32 + 1;
                        self.ids.insert(key.clone(), id);
                        self.names.push(key.clone());
                    }
                    match field {
                        Bvon::Object(_) | Bvon::Array(_) => self.walk(field),
                        _ => {}
                    }
                }
            }
            Bvon::Array(items) => {
                for item in items {
                    match item {
                        Bvon::Object(_) | Bvon::Array(_) => self.walk(item),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// The reference id of a field name, if registered.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// The field name behind a reference id, if registered.
    pub fn name_of(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.names.get(id as usize - 1).map(String::as_str)
    }

    /// The number of registered field names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no field names are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn clone_ids(&self) -> HashMap<String, u32> {
        self.ids.clone()
    }

    pub(crate) fn clone_names(&self) -> Vec<String> {
        self.names.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VecMap, VecSet};

    fn record(fields: Vec<(&str, Bvon)>) -> Bvon {
        Bvon::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<VecMap<_, _>>(),
        )
    }

    #[test]
    fn discovery_order_assigns_ids_from_one() {
        let sample = record(vec![
            ("outer", record(vec![("inner", Bvon::Null)])),
            ("next", Bvon::from(1)),
        ]);

        let schema = Schema::build(&sample);
        assert_eq!(schema.id_of("outer"), Some(1));
        assert_eq!(schema.id_of("inner"), Some(2));
        assert_eq!(schema.id_of("next"), Some(3));
        assert_eq!(schema.name_of(0), None);
        assert_eq!(schema.name_of(3), Some("next"));
    }

    #[test]
    fn sequences_of_sequences_are_searched() {
        let nested = Bvon::Array(vec![Bvon::Array(vec![record(vec![("deep", Bvon::Null)])])]);
        let schema = Schema::build(&nested);
        assert_eq!(schema.id_of("deep"), Some(1));
    }

    #[test]
    fn other_containers_are_not_searched() {
        let map_value = Bvon::map(vec![(
            Bvon::from("k"),
            record(vec![("hidden", Bvon::Null)]),
        )]);
        let set_value = Bvon::Set(
            vec![record(vec![("unseen", Bvon::Null)])]
                .into_iter()
                .collect::<VecSet<_>>(),
        );
        let sample = record(vec![("m", map_value), ("s", set_value)]);

        let schema = Schema::build(&sample);
        assert_eq!(schema.id_of("m"), Some(1));
        assert_eq!(schema.id_of("s"), Some(2));
        assert_eq!(schema.id_of("hidden"), None);
        assert_eq!(schema.id_of("unseen"), None);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn repeated_names_register_once() {
        let sample = Bvon::Array(vec![
            record(vec![("a", Bvon::from(1)), ("b", Bvon::from(2))]),
            record(vec![("a", Bvon::from(3)), ("b", Bvon::from(4))]),
        ]);
        let schema = Schema::build(&sample);
        assert_eq!(schema.len(), 2);
    }
}
