use store_locator_etl::decoder::{decode_all, decode_category, decode_record};
use store_locator_etl::selector::select;
use store_locator_etl::{
    AttributeDictionary, DecodeError, DictionaryEntry, NamedAttribute, NormalizedStore, RawStore,
};

fn entries(n: usize) -> Vec<DictionaryEntry> {
    (0..n)
        .map(|i| DictionaryEntry::new(i.to_string(), format!("Name {}", i), format!("icon-{}", i)))
        .collect()
}

fn dictionary() -> AttributeDictionary {
    AttributeDictionary {
        business_hours: entries(2),
        services: entries(10),
        products: entries(3),
        payments: entries(4),
        ..Default::default()
    }
}

fn raw(id: i64) -> RawStore {
    RawStore {
        id,
        name: format!("Store {}", id),
        business_hours: "01".to_string(),
        services: "1000000000".to_string(),
        products: "101".to_string(),
        payments: "0110".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_all_zero_and_all_one_bitstrings() {
    for n in [0, 1, 5, 32] {
        let dict = entries(n);
        assert!(decode_category(&"0".repeat(n), &dict).unwrap().is_empty());

        let all = decode_category(&"1".repeat(n), &dict).unwrap();
        let expected: Vec<NamedAttribute> = dict.iter().map(NamedAttribute::from).collect();
        assert_eq!(all, expected);
    }
}

#[test]
fn test_bit_to_name_mapping() {
    let dict = vec![
        DictionaryEntry::new("1", "A", "a"),
        DictionaryEntry::new("2", "B", "b"),
        DictionaryEntry::new("3", "C", "c"),
    ];
    let decoded = decode_category("101", &dict).unwrap();
    assert_eq!(
        decoded,
        vec![
            NamedAttribute { name: "A".to_string(), icon: "a".to_string() },
            NamedAttribute { name: "C".to_string(), icon: "c".to_string() },
        ]
    );
}

#[test]
fn test_length_mismatch_both_directions() {
    assert!(matches!(
        decode_category("10", &entries(3)),
        Err(DecodeError::LengthMismatch { bits: 2, entries: 3 })
    ));
    assert!(matches!(
        decode_category("101", &entries(2)),
        Err(DecodeError::LengthMismatch { bits: 3, entries: 2 })
    ));
}

#[test]
fn test_decoding_is_idempotent() {
    let dict = dictionary();
    let store = raw(1);
    assert_eq!(decode_record(&store, &dict).unwrap(), decode_record(&store, &dict).unwrap());
}

#[test]
fn test_decode_all_keeps_input_order() {
    let stores = decode_all(&[raw(10), raw(20), raw(30)], &dictionary()).unwrap();
    let ids: Vec<i64> = stores.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn test_empty_inputs() {
    assert!(select(vec![]).is_empty());
    assert!(decode_all(&[], &dictionary()).unwrap().is_empty());
}

#[test]
fn test_export_round_trip_keeps_attribute_order() {
    let stores = decode_all(&[raw(1), raw(2)], &dictionary()).unwrap();

    let json = serde_json::to_string(&stores).unwrap();
    let parsed: Vec<NormalizedStore> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, stores);
    let payments: Vec<&str> = parsed[0].payments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(payments, vec!["Name 1", "Name 2"]);
}
