use odict::{
    CaselessOrderedMultiMap, Entry, Identity, OdictError, OrderedMultiMap, State, StateObject,
};

fn headers(pairs: &[(&str, &str)]) -> OrderedMultiMap {
    pairs.iter().copied().collect()
}

#[test]
fn test_add_order_is_items_order() {
    let mut map = OrderedMultiMap::<Identity>::new();
    let input = [("Accept", "*/*"), ("Host", "a"), ("Accept", "text/html"), ("Via", "1")];
    for (key, value) in input {
        map.add(key, value);
    }

    assert_eq!(map.items(), input.to_vec());
}

#[test]
fn test_set_values_overwrite_then_append() {
    let mut map = headers(&[("a", "1"), ("b", "x"), ("a", "2")]);
    map.set_values("a", vec!["9", "8", "7"]).unwrap();

    assert_eq!(
        map.items(),
        vec![("a", "9"), ("b", "x"), ("a", "8"), ("a", "7")]
    );
}

#[test]
fn test_set_values_truncation() {
    let mut map = headers(&[("a", "1"), ("a", "2"), ("a", "3")]);
    map.set_values("a", vec!["9"]).unwrap();

    assert_eq!(map.items(), vec![("a", "9")]);
}

#[test]
fn test_caseless_equivalence() {
    let mut map = CaselessOrderedMultiMap::new();
    map.add("HOST", "x");

    assert!(map.contains("Host"));
    assert_eq!(map.get_all("host"), vec!["x"]);
    assert_eq!(map.get_first("hOsT"), Some("x"));
}

#[test]
fn test_format_wire_bytes() {
    let map = headers(&[("Content-Length", "5"), ("Host", "example.com")]);
    assert_eq!(
        map.format(),
        b"Content-Length: 5\r\nHost: example.com\r\n".to_vec()
    );
}

#[test]
fn test_snapshot_round_trip_through_trait() {
    fn restore<T: StateObject>(state: State) -> T {
        T::from_state(state)
    }

    let original = headers(&[("Host", "a"), ("Accept", "*/*"), ("Host", "b")]);
    let mut restored: OrderedMultiMap = restore(StateObject::get_state(&original, false));

    assert_eq!(restored, original);

    restored.add("Via", "1");
    restored.delete("Host");
    assert_eq!(original.len(), 3);
    assert_eq!(original.get_all("Host"), vec!["a", "b"]);
}

#[test]
fn test_snapshot_survives_json_persistence() {
    let original = headers(&[("Set-Cookie", "a=1"), ("Set-Cookie", "b=2")]);
    let json = serde_json::to_string(&original.get_state(false)).unwrap();
    let state: State = serde_json::from_str(&json).unwrap();

    let mut restored = CaselessOrderedMultiMap::new();
    restored.load_state(state);
    assert_eq!(restored, original);
}

#[test]
fn test_replace_count() {
    let mut map = headers(&[("a", "a")]);
    assert_eq!(map.replace(r"a", "b").unwrap(), 2);
    assert_eq!(map.items(), vec![("b", "b")]);
}

#[test]
fn test_invalid_set_values() {
    let mut map = headers(&[]);
    let result = map.set_values("Host", "example.com");

    assert!(matches!(result, Err(OdictError::InvalidArgument { .. })));
    assert!(map.is_empty());
}

#[test]
fn test_extend_and_equality_across_variants() {
    let mut base = headers(&[("X", "1")]);
    let mut extra = CaselessOrderedMultiMap::new();
    extra.add("x", "2");

    base.extend_from(&extra);

    assert_eq!(base.entries(), &[Entry::new("X", "1"), Entry::new("x", "2")]);
    assert_eq!(base.get_all("X"), vec!["1"]);
    assert_eq!(extra.len(), 1);
}
