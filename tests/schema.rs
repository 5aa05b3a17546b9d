use bvon::prelude::*;

fn record(fields: Vec<(&str, Bvon)>) -> Bvon {
    Bvon::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<VecMap<_, _>>(),
    )
}

fn count_db_refs(bytes: &[u8]) -> usize {
    // 0xe appears in these fixtures only as the DB_REF tag
    bytes.iter().filter(|&&b| b == 0xe).count()
}

#[test]
fn shared_schema_compresses_repeated_keys() {
    let docs = vec![
        record(vec![("a", Bvon::from(1)), ("b", Bvon::from(2))]),
        record(vec![("a", Bvon::from(3)), ("b", Bvon::from(4))]),
        record(vec![("a", Bvon::from(5)), ("b", Bvon::from(6))]),
    ];

    let schema = Schema::build(&docs[0]);
    let chunks = serialize_collection(&docs, Some(&schema)).unwrap();

    for chunk in &chunks {
        // both keys arrive as back-references, never as text
        assert_eq!(count_db_refs(chunk), 2);
        assert!(!chunk.contains(&b'a'));
        assert!(!chunk.contains(&b'b'));
    }

    let decoded = deserialize_collection(&chunks, Some(&schema)).unwrap();
    assert_eq!(decoded, docs);
}

#[test]
fn schema_round_trips_nested_documents() {
    let doc = record(vec![
        (
            "user",
            record(vec![("id", Bvon::from(7)), ("name", Bvon::from("ada"))]),
        ),
        (
            "history",
            Bvon::Array(vec![
                record(vec![("id", Bvon::from(1))]),
                record(vec![("id", Bvon::from(2))]),
            ]),
        ),
    ]);

    let schema = Schema::build(&doc);
    let bytes = serialize_with(&doc, &schema).unwrap();
    assert_eq!(deserialize_with(&bytes, &schema).unwrap(), doc);

    // the same bytes are unreadable without the table that names the refs
    assert!(deserialize(&bytes).is_err());
}

#[test]
fn writes_without_schema_never_leak_interning_state() {
    let doc = record(vec![("key", Bvon::from(1)), ("other", Bvon::from(2))]);

    let mut writer = Writer::new();
    let first = writer.write(&doc).unwrap().to_vec();
    let second = writer.write(&doc).unwrap().to_vec();

    // keys reappear as fresh text entries, not back-references
    assert_eq!(first, second);
    assert_eq!(count_db_refs(&second), 0);

    assert_eq!(deserialize(&second).unwrap(), doc);
}

#[test]
fn schema_is_not_mutated_by_unknown_keys() {
    let schema = Schema::build(&record(vec![("known", Bvon::from(1))]));
    let doc = record(vec![("known", Bvon::from(1)), ("fresh", Bvon::from(2))]);

    let mut writer = Writer::new();
    let first = writer.write_with(&doc, &schema).unwrap().to_vec();
    let second = writer.write_with(&doc, &schema).unwrap().to_vec();

    // "fresh" is spelled out both times: its mid-call id never became
    // part of the shared schema
    assert_eq!(first, second);
    assert_eq!(schema.len(), 1);
    assert_eq!(schema.id_of("fresh"), None);

    let reader = Reader::new();
    assert_eq!(reader.read_with(&first, &schema).unwrap(), doc);
}

#[test]
fn mixed_seen_and_unseen_keys_decode_in_order() {
    let docs = vec![
        record(vec![("a", Bvon::from(1))]),
        record(vec![("a", Bvon::from(2)), ("b", Bvon::from(3))]),
    ];

    let schema = Schema::build(&docs[0]);
    let chunks = serialize_collection(&docs, Some(&schema)).unwrap();
    let decoded = deserialize_collection(&chunks, Some(&schema)).unwrap();
    assert_eq!(decoded, docs);
}
