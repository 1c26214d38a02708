//! Snapshot export/import through the public API.

use oxvec::{
    Collection, CollectionConfig, CollectionSnapshot, Database, DotProductSimilarity,
};
use std::io::Cursor;

fn bits(c: &Collection) -> Vec<(String, Vec<u64>)> {
    c.entries()
        .into_iter()
        .map(|e| {
            let bits = e.vector().as_slice().iter().map(|x| x.to_bits()).collect();
            (e.id().to_string(), bits)
        })
        .collect()
}

fn awkward_collection() -> Collection {
    let mut c = Collection::with_config("awkward", CollectionConfig::with_dimension(3));
    c.add_vector("third", [1.0 / 3.0, 2.0 / 3.0, 0.1 + 0.2]).unwrap();
    c.add_vector("tiny", [f64::MIN_POSITIVE, 5e-324, -0.0]).unwrap();
    c.add_vector("huge", [f64::MAX, -f64::MAX, 1e308]).unwrap();
    c.add_vector("tie", [1.0 / 3.0, 2.0 / 3.0, 0.1 + 0.2]).unwrap();
    c
}

#[test]
fn test_json_writer_reader_roundtrip_is_bit_exact() {
    let original = awkward_collection();
    let mut buf = Vec::new();
    original.snapshot().write_json(&mut buf).unwrap();

    let restored = Collection::from_snapshot(CollectionSnapshot::read_json(Cursor::new(buf)).unwrap())
        .unwrap();
    assert_eq!(restored.name(), "awkward");
    assert_eq!(restored.config(), original.config());
    assert_eq!(bits(&restored), bits(&original));
}

#[test]
fn test_bincode_roundtrip_is_bit_exact() {
    let original = awkward_collection();
    let bytes = original.snapshot().to_bincode().unwrap();
    let restored = Collection::from_snapshot(CollectionSnapshot::from_bincode(&bytes).unwrap()).unwrap();
    assert_eq!(bits(&restored), bits(&original));
}

#[test]
fn test_restored_collection_keeps_tie_break_order() {
    let original = awkward_collection();
    let restored = Collection::from_snapshot(original.snapshot()).unwrap();

    let query = [1.0, 1.0, 1.0];
    let before = original.query(query, &DotProductSimilarity, 2).unwrap();
    let after = restored.query(query, &DotProductSimilarity, 4).unwrap();
    assert_eq!(before[..], after[..2]);

    let ids: Vec<&str> = after.iter().map(|e| e.id()).collect();
    let third = ids.iter().position(|id| *id == "third").unwrap();
    let tie = ids.iter().position(|id| *id == "tie").unwrap();
    assert!(third < tie);
}

#[test]
fn test_restored_collection_registers_in_database() {
    let mut db = Database::new();
    let json = br#"{
        "name": "imported",
        "entries": [
            { "id": "a", "vector": [1.0, 0.0] },
            { "id": "b", "vector": [0.0, 1.0] }
        ]
    }"#;
    let collection = Collection::from_snapshot(CollectionSnapshot::from_json(json).unwrap()).unwrap();
    db.insert_collection(collection).unwrap();

    let handle = db.get_collection("imported").unwrap();
    assert_eq!(handle.read().ids(), vec!["a", "b"]);
    assert_eq!(handle.read().dimension(), Some(2));
}
